//! Cost-percentile context: where a resource's total cost ranks within
//! its (provider, service) peer group. Presentation context only; the
//! severity scorer never reads these.

use crate::features::{ResourceKey, ServiceKey};
use crate::record::BillingRecord;
use std::collections::BTreeMap;

/// Rank each resource's total cost as a percentile (0-100) within its
/// service, using fractional (average) ranks so ties share a value.
/// Rounded to one decimal.
pub fn build_cost_percentiles(records: &[BillingRecord]) -> BTreeMap<ResourceKey, f64> {
    let mut totals: BTreeMap<ResourceKey, f64> = BTreeMap::new();
    for record in records {
        if let Some(key) = record.resource_key() {
            *totals.entry(key).or_insert(0.0) += record.cost;
        }
    }

    let mut by_service: BTreeMap<ServiceKey, Vec<(ResourceKey, f64)>> = BTreeMap::new();
    for (key, total) in totals {
        by_service
            .entry((key.0, key.1.clone()))
            .or_default()
            .push((key, total));
    }

    let mut percentiles = BTreeMap::new();
    for (_, mut group) in by_service {
        group.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        let n = group.len() as f64;

        let mut i = 0;
        while i < group.len() {
            // Average the 1-based ranks of a tie run.
            let mut j = i;
            while j + 1 < group.len() && group[j + 1].1 == group[i].1 {
                j += 1;
            }
            let avg_rank = (i + 1 + j + 1) as f64 / 2.0;
            let pct = (avg_rank / n * 1000.0).round() / 10.0;
            for (key, _) in &group[i..=j] {
                percentiles.insert(key.clone(), pct);
            }
            i = j + 1;
        }
    }

    percentiles
}

use crate::features::{
    CostTrend, DailyServiceCost, ResourceKey, ResourceLifespan, ServiceKey, ServiceTrend,
    UsageCostRatio,
};
use crate::record::BillingRecord;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// All derived signals for one record set, computed in a single pass
/// hierarchy and held read-only for the detectors.
///
/// Grouping uses `BTreeMap` keys throughout so iteration order -- and
/// therefore every downstream list -- is deterministic.
#[derive(Debug)]
pub struct FeatureSet {
    daily: BTreeMap<ServiceKey, Vec<(NaiveDate, f64)>>,
    lifespans: BTreeMap<ResourceKey, u32>,
    ratios: BTreeMap<ResourceKey, Option<f64>>,
    resource_mean_cost: BTreeMap<ResourceKey, f64>,
    total_days: u32,
}

impl FeatureSet {
    /// Derive every feature family from the record set.
    pub fn compute(records: &[BillingRecord]) -> Self {
        let mut daily_sums: BTreeMap<(NaiveDate, ServiceKey), f64> = BTreeMap::new();
        let mut resource_dates: BTreeMap<ResourceKey, BTreeSet<NaiveDate>> = BTreeMap::new();
        let mut usage_totals: BTreeMap<ResourceKey, (Option<f64>, f64)> = BTreeMap::new();
        let mut cost_rows: BTreeMap<ResourceKey, (f64, u32)> = BTreeMap::new();
        let mut all_dates: BTreeSet<NaiveDate> = BTreeSet::new();

        for record in records {
            all_dates.insert(record.date);
            *daily_sums
                .entry((record.date, record.service_key()))
                .or_insert(0.0) += record.cost;

            let Some(key) = record.resource_key() else {
                continue;
            };

            resource_dates
                .entry(key.clone())
                .or_default()
                .insert(record.date);

            let (usage_sum, cost_sum) = usage_totals.entry(key.clone()).or_insert((None, 0.0));
            if let Some(usage) = record.usage {
                *usage_sum = Some(usage_sum.unwrap_or(0.0) + usage);
            }
            *cost_sum += record.cost;

            let (total, rows) = cost_rows.entry(key).or_insert((0.0, 0));
            *total += record.cost;
            *rows += 1;
        }

        let mut daily: BTreeMap<ServiceKey, Vec<(NaiveDate, f64)>> = BTreeMap::new();
        for ((date, key), cost) in daily_sums {
            daily.entry(key).or_default().push((date, cost));
        }

        let lifespans = resource_dates
            .into_iter()
            .map(|(key, dates)| (key, dates.len() as u32))
            .collect();

        let ratios = usage_totals
            .into_iter()
            .map(|(key, (usage, cost))| {
                let ratio = match usage {
                    Some(u) if cost > 0.0 => Some(u / cost),
                    _ => None,
                };
                (key, ratio)
            })
            .collect();

        let resource_mean_cost = cost_rows
            .into_iter()
            .map(|(key, (total, rows))| (key, total / f64::from(rows.max(1))))
            .collect();

        Self {
            daily,
            lifespans,
            ratios,
            resource_mean_cost,
            total_days: all_dates.len() as u32,
        }
    }

    /// Daily cost aggregates ordered by (date, provider, service).
    pub fn daily_cost_per_service(&self) -> Vec<DailyServiceCost> {
        let mut out: Vec<DailyServiceCost> = self
            .daily
            .iter()
            .flat_map(|((provider, service), days)| {
                days.iter().map(|(date, cost)| DailyServiceCost {
                    date: *date,
                    provider: *provider,
                    service: service.clone(),
                    daily_cost: *cost,
                })
            })
            .collect();
        out.sort_by(|a, b| {
            (a.date, a.provider, &a.service).cmp(&(b.date, b.provider, &b.service))
        });
        out
    }

    /// First-vs-last daily cost comparison per service; fewer than two
    /// daily points means FLAT. Equal endpoints are FLAT -- exact
    /// comparison, not a rounding window.
    pub fn cost_trend_per_service(&self) -> Vec<ServiceTrend> {
        self.daily
            .iter()
            .map(|((provider, service), days)| {
                let trend = if days.len() < 2 {
                    CostTrend::Flat
                } else {
                    let first = days[0].1;
                    let last = days[days.len() - 1].1;
                    if last > first {
                        CostTrend::Increasing
                    } else if last < first {
                        CostTrend::Decreasing
                    } else {
                        CostTrend::Flat
                    }
                };
                ServiceTrend {
                    provider: *provider,
                    service: service.clone(),
                    trend,
                }
            })
            .collect()
    }

    /// Distinct-day lifespans for rows that carry a resource_id.
    pub fn resource_lifespan(&self) -> Vec<ResourceLifespan> {
        self.lifespans
            .iter()
            .map(|((provider, service, rid), days)| ResourceLifespan {
                provider: *provider,
                service: service.clone(),
                resource_id: rid.clone(),
                days_active: *days,
            })
            .collect()
    }

    /// Usage-to-cost ratios per resource, with the `None` sentinel for
    /// missing usage or zero total cost.
    pub fn usage_cost_ratio(&self) -> Vec<UsageCostRatio> {
        self.ratios
            .iter()
            .map(|((provider, service, rid), ratio)| UsageCostRatio {
                provider: *provider,
                service: service.clone(),
                resource_id: rid.clone(),
                ratio: *ratio,
            })
            .collect()
    }

    // ---- Lookups used by the detectors ----

    /// Date-ascending daily costs for one service.
    pub fn daily_costs(&self, key: &ServiceKey) -> Option<&[(NaiveDate, f64)]> {
        self.daily.get(key).map(Vec::as_slice)
    }

    /// Mean of the service's daily cost aggregates.
    pub fn mean_daily_cost(&self, key: &ServiceKey) -> Option<f64> {
        let days = self.daily.get(key)?;
        if days.is_empty() {
            return None;
        }
        Some(days.iter().map(|(_, c)| c).sum::<f64>() / days.len() as f64)
    }

    /// Number of distinct days on which the service billed anything.
    pub fn days_present(&self, key: &ServiceKey) -> u32 {
        self.daily.get(key).map_or(0, |days| days.len() as u32)
    }

    /// Distinct days across the whole dataset.
    pub fn total_days(&self) -> u32 {
        self.total_days
    }

    /// Ratio for one resource; `None` when absent or undefined.
    pub fn usage_ratio(&self, key: &ResourceKey) -> Option<f64> {
        self.ratios.get(key).copied().flatten()
    }

    /// Mean of the defined per-resource ratios across one service.
    pub fn service_mean_ratio(&self, key: &ServiceKey) -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0u32;
        for ((provider, service, _), ratio) in &self.ratios {
            if (*provider, service.as_str()) == (key.0, key.1.as_str()) {
                if let Some(r) = ratio {
                    sum += r;
                    count += 1;
                }
            }
        }
        (count > 0).then(|| sum / f64::from(count))
    }

    /// Mean per-row cost of one resource.
    pub fn resource_mean_cost(&self, key: &ResourceKey) -> Option<f64> {
        self.resource_mean_cost.get(key).copied()
    }

    /// Iterate lifespans without materializing the public list.
    pub(crate) fn lifespan_entries(&self) -> impl Iterator<Item = (&ResourceKey, u32)> {
        self.lifespans.iter().map(|(k, v)| (k, *v))
    }

    /// Iterate service keys that have any daily aggregate.
    pub(crate) fn service_keys(&self) -> impl Iterator<Item = &ServiceKey> {
        self.daily.keys()
    }
}

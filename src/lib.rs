//! Leakhound -- multi-cloud cost-leak detection.
//!
//! This crate provides the core library for normalizing billing exports,
//! deriving per-resource behavioral features, running the leak-detector
//! battery, and scoring and ranking the findings.

pub mod config;
pub mod detect;
pub mod features;
pub mod ingest;
pub mod normalize;
pub mod record;
pub mod report;
pub mod score;

use crate::config::AnalyzerConfig;
use crate::features::percentile::build_cost_percentiles;
use crate::features::FeatureSet;
use crate::record::BillingRecord;
use crate::report::AnalysisReport;

/// Run the full analysis pipeline over an already normalized record set:
/// feature engineering, detection, scoring, and primary-leak selection.
///
/// Callers must only pass records that satisfy the canonical-schema
/// invariants (the normalizers enforce them on the CSV path).
pub fn analyze(records: &[BillingRecord], config: &AnalyzerConfig) -> AnalysisReport {
    tracing::info!(records = records.len(), "Starting cost-leak analysis");

    let features = FeatureSet::compute(records);
    let candidates = detect::aggregator::run_detectors(records, &features, config);
    tracing::info!(candidates = candidates.len(), "Detection complete");

    let all_scored = score::scorer::score_leaks(candidates);
    let mut selected = score::select::select_primary_leaks(all_scored.clone());

    // Presentation context only; scores are already final.
    let percentiles = build_cost_percentiles(records);
    for leak in &mut selected {
        if let Some(rid) = &leak.candidate.resource_id {
            let key = (
                leak.candidate.provider,
                leak.candidate.service.clone(),
                rid.clone(),
            );
            leak.cost_percentile = percentiles.get(&key).copied();
        }
    }

    AnalysisReport::build(selected, all_scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Provider;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    #[test]
    fn test_analyze_empty_records_is_clean() {
        let report = analyze(&[], &AnalyzerConfig::default());
        assert!(report.is_clean());
    }

    #[test]
    fn test_analyze_annotates_percentile_context() {
        let rows: Vec<BillingRecord> = (0..20)
            .map(|i| BillingRecord {
                date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
                    + chrono::Duration::days(i64::from(i)),
                provider: Provider::Aws,
                service: "EC2".to_string(),
                cost: 5.0,
                usage: Some(0.1),
                resource_id: Some("i-zombie".to_string()),
                region: None,
                tags: BTreeMap::new(),
            })
            .collect();

        let report = analyze(&rows, &AnalyzerConfig::default());
        assert!(!report.is_clean());
        let top = &report.leaks[0];
        assert_eq!(top.cost_percentile, Some(100.0));
    }
}

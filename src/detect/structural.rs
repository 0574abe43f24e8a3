//! Structural detectors: cross-referencing scans over the record set that
//! look for resources with no live parent or no ownership metadata.

use crate::config::AnalyzerConfig;
use crate::detect::category::{service_category, ServiceCategory};
use crate::detect::waste;
use crate::detect::{LeakCandidate, LeakSignals, LeakType};
use crate::features::FeatureSet;
use crate::record::{has_ownership, BillingRecord, Provider};
use std::collections::HashSet;

/// Storage resources whose resource_id never shows up under a
/// compute-classified service -- unattached volumes, forgotten buckets.
pub fn detect_orphaned_storage(
    records: &[BillingRecord],
    config: &AnalyzerConfig,
) -> Vec<LeakCandidate> {
    let mut compute_seen: HashSet<&str> = HashSet::new();
    let mut storage_order: Vec<(&str, Provider, &str)> = Vec::new();
    let mut storage_seen: HashSet<&str> = HashSet::new();

    for record in records {
        let Some(rid) = record.resource_id.as_deref() else {
            continue;
        };

        if config.structural.compute.matches(record.provider, &record.service) {
            compute_seen.insert(rid);
        } else if config.structural.storage.matches(record.provider, &record.service) {
            // First sighting fixes the reported provider/service.
            if storage_seen.insert(rid) {
                storage_order.push((rid, record.provider, &record.service));
            }
        }
    }

    storage_order
        .into_iter()
        .filter(|(rid, _, _)| !compute_seen.contains(rid))
        .map(|(rid, provider, service)| LeakCandidate {
            leak_type: LeakType::OrphanedStorage,
            provider,
            service: service.to_string(),
            resource_id: Some(rid.to_string()),
            reason: "Storage resource generating cost with no attached compute".to_string(),
            estimated_monthly_waste: None,
            signals: LeakSignals {
                storage_related: true,
                ..LeakSignals::default()
            },
        })
        .collect()
}

/// Databases billing steadily while their usage stays near zero.
pub fn detect_idle_databases(
    features: &FeatureSet,
    config: &AnalyzerConfig,
) -> Vec<LeakCandidate> {
    let thresholds = &config.thresholds.idle_database;
    let mut leaks = Vec::new();

    for ((provider, service, resource_id), days_active) in features.lifespan_entries() {
        if service_category(&config.categories, service) != ServiceCategory::Database {
            continue;
        }
        if days_active < thresholds.min_days_active {
            continue;
        }

        let key = (*provider, service.clone(), resource_id.clone());
        let Some(ratio) = features.usage_ratio(&key) else {
            continue;
        };
        if ratio > thresholds.max_usage_ratio {
            continue;
        }

        let Some(daily_cost) = features.resource_mean_cost(&key) else {
            continue;
        };
        if daily_cost < thresholds.min_daily_cost {
            continue;
        }

        leaks.push(LeakCandidate {
            leak_type: LeakType::IdleDatabase,
            provider: *provider,
            service: service.clone(),
            resource_id: Some(resource_id.clone()),
            reason: format!(
                "Database active {} days with minimal usage (usage-to-cost ratio {:.2})",
                days_active, ratio
            ),
            estimated_monthly_waste: Some(waste::flat_monthly_waste(daily_cost)),
            signals: LeakSignals {
                duration_days: Some(days_active),
                ..LeakSignals::default()
            },
        });
    }

    leaks
}

/// Snapshots and backups whose resource_id has no active compute or
/// database parent anywhere in the record set.
pub fn detect_snapshot_sprawl(
    records: &[BillingRecord],
    config: &AnalyzerConfig,
) -> Vec<LeakCandidate> {
    let mut active: HashSet<&str> = HashSet::new();
    let mut snapshot_order: Vec<(&str, Provider, &str)> = Vec::new();
    let mut snapshot_seen: HashSet<&str> = HashSet::new();

    for record in records {
        let Some(rid) = record.resource_id.as_deref() else {
            continue;
        };

        let category = service_category(&config.categories, &record.service);
        if matches!(category, ServiceCategory::Compute | ServiceCategory::Database) {
            active.insert(rid);
        }

        if config.structural.snapshot.matches(record.provider, &record.service)
            && snapshot_seen.insert(rid)
        {
            snapshot_order.push((rid, record.provider, &record.service));
        }
    }

    snapshot_order
        .into_iter()
        .filter(|(rid, _, _)| !active.contains(rid))
        .map(|(rid, provider, service)| LeakCandidate {
            leak_type: LeakType::SnapshotSprawl,
            provider,
            service: service.to_string(),
            resource_id: Some(rid.to_string()),
            reason: "Snapshot or backup generating cost with no active parent resource"
                .to_string(),
            estimated_monthly_waste: None,
            signals: LeakSignals {
                storage_related: true,
                ..LeakSignals::default()
            },
        })
        .collect()
}

/// Resources carrying no populated ownership tag on any of their rows.
/// At most one leak per distinct resource_id.
pub fn detect_untagged_resources(records: &[BillingRecord]) -> Vec<LeakCandidate> {
    let mut owned: HashSet<&str> = HashSet::new();
    for record in records {
        if let Some(rid) = record.resource_id.as_deref() {
            if has_ownership(record) {
                owned.insert(rid);
            }
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut leaks = Vec::new();
    for record in records {
        let Some(rid) = record.resource_id.as_deref() else {
            continue;
        };
        if owned.contains(rid) || !seen.insert(rid) {
            continue;
        }

        leaks.push(LeakCandidate {
            leak_type: LeakType::UntaggedResource,
            provider: record.provider,
            service: record.service.clone(),
            resource_id: Some(rid.to_string()),
            reason: "Resource has no ownership tags (owner / project / environment missing)"
                .to_string(),
            estimated_monthly_waste: None,
            signals: LeakSignals {
                missing_ownership: true,
                ..LeakSignals::default()
            },
        });
    }

    leaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn record(service: &str, resource_id: Option<&str>) -> BillingRecord {
        dated_record("2026-01-01", service, 1.0, None, resource_id)
    }

    fn dated_record(
        date: &str,
        service: &str,
        cost: f64,
        usage: Option<f64>,
        resource_id: Option<&str>,
    ) -> BillingRecord {
        BillingRecord {
            date: date.parse().unwrap(),
            provider: Provider::Aws,
            service: service.to_string(),
            cost,
            usage,
            resource_id: resource_id.map(String::from),
            region: None,
            tags: BTreeMap::new(),
        }
    }

    #[test]
    fn test_orphaned_storage_flags_unattached_volume() {
        let records = vec![
            record("EBS Volumes", Some("vol-orphan")),
            record("EC2", Some("i-live")),
        ];
        let leaks = detect_orphaned_storage(&records, &AnalyzerConfig::default());
        assert_eq!(leaks.len(), 1);
        assert_eq!(leaks[0].resource_id.as_deref(), Some("vol-orphan"));
        assert!(leaks[0].signals.storage_related);
    }

    #[test]
    fn test_orphaned_storage_emits_once_per_resource() {
        let records = vec![
            record("EBS Volumes", Some("vol-1")),
            record("EBS Volumes", Some("vol-1")),
            record("EBS Volumes", Some("vol-1")),
        ];
        let leaks = detect_orphaned_storage(&records, &AnalyzerConfig::default());
        assert_eq!(leaks.len(), 1);
    }

    #[test]
    fn test_orphaned_storage_spares_attached_resources() {
        // Same id appears under both a storage and a compute service.
        let records = vec![
            record("EBS Volumes", Some("vol-attached")),
            record("EC2", Some("vol-attached")),
        ];
        assert!(detect_orphaned_storage(&records, &AnalyzerConfig::default()).is_empty());
    }

    #[test]
    fn test_idle_database_attaches_monthly_waste() {
        let records: Vec<BillingRecord> = (0..8)
            .map(|i| {
                let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
                    + chrono::Duration::days(i64::from(i));
                dated_record(&date.to_string(), "Amazon RDS", 12.0, Some(1.0), Some("db-1"))
            })
            .collect();
        let features = FeatureSet::compute(&records);
        let leaks = detect_idle_databases(&features, &AnalyzerConfig::default());

        assert_eq!(leaks.len(), 1);
        assert_eq!(leaks[0].leak_type, LeakType::IdleDatabase);
        // ratio = 8 / 96 = 0.08, under the 0.2 bound.
        assert!(leaks[0].reason.contains("8 days"));
        assert_eq!(leaks[0].estimated_monthly_waste, Some(360.0));
    }

    #[test]
    fn test_idle_database_needs_seven_days() {
        let records: Vec<BillingRecord> = (0..6)
            .map(|i| {
                let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
                    + chrono::Duration::days(i64::from(i));
                dated_record(&date.to_string(), "Amazon RDS", 12.0, Some(1.0), Some("db-1"))
            })
            .collect();
        let features = FeatureSet::compute(&records);
        assert!(detect_idle_databases(&features, &AnalyzerConfig::default()).is_empty());
    }

    #[test]
    fn test_snapshot_sprawl_flags_parentless_snapshots() {
        let records = vec![
            record("EBS Snapshot", Some("snap-old")),
            record("EC2", Some("i-parent")),
            record("EBS Snapshot", Some("i-parent")),
        ];
        let leaks = detect_snapshot_sprawl(&records, &AnalyzerConfig::default());
        assert_eq!(leaks.len(), 1);
        assert_eq!(leaks[0].resource_id.as_deref(), Some("snap-old"));
    }

    #[test]
    fn test_untagged_emits_one_leak_per_resource() {
        let records = vec![
            record("EC2", Some("i-1")),
            record("EC2", Some("i-1")),
            record("S3", Some("bkt-1")),
        ];
        let leaks = detect_untagged_resources(&records);
        assert_eq!(leaks.len(), 2);
    }

    #[test]
    fn test_untagged_spares_resources_tagged_on_any_row() {
        let mut tagged = record("EC2", Some("i-1"));
        tagged
            .tags
            .insert("labels.environment".to_string(), "prod".to_string());
        let records = vec![record("EC2", Some("i-1")), tagged];
        assert!(detect_untagged_resources(&records).is_empty());
    }

    #[test]
    fn test_untagged_treats_placeholders_as_missing() {
        let mut r = record("EC2", Some("i-1"));
        r.tags.insert("owner".to_string(), "none".to_string());
        let leaks = detect_untagged_resources(&[r]);
        assert_eq!(leaks.len(), 1);
        assert!(leaks[0].signals.missing_ownership);
    }
}

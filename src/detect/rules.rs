//! Threshold-based detectors: zombie, idle, runaway, and always-on rules.

use crate::config::AnalyzerConfig;
use crate::detect::category::{service_category, ServiceCategory};
use crate::detect::waste;
use crate::detect::{LeakCandidate, LeakSignals, LeakType};
use crate::features::FeatureSet;
use crate::record::{has_ownership, BillingRecord};
use std::collections::HashSet;

/// Long-running compute resources whose usage never justified their cost.
///
/// The usage-ratio bound is per-provider: GCP usage units run orders of
/// magnitude hotter than AWS/Azure, so the same rule needs a different
/// cutoff there.
pub fn detect_zombie_resources(
    features: &FeatureSet,
    config: &AnalyzerConfig,
) -> Vec<LeakCandidate> {
    let thresholds = &config.thresholds.zombie;
    let mut zombies = Vec::new();

    for ((provider, service, resource_id), days_active) in features.lifespan_entries() {
        if service_category(&config.categories, service) != ServiceCategory::Compute {
            continue;
        }
        if days_active < thresholds.min_days_active {
            continue;
        }

        let key = (*provider, service.clone(), resource_id.clone());
        let Some(ratio) = features.usage_ratio(&key) else {
            continue;
        };
        if ratio >= thresholds.usage_ratio.for_provider(*provider) {
            continue;
        }

        let estimated = features
            .resource_mean_cost(&key)
            .map(|avg| waste::lifespan_adjusted_waste(avg, days_active));

        zombies.push(LeakCandidate {
            leak_type: LeakType::ZombieResource,
            provider: *provider,
            service: service.clone(),
            resource_id: Some(resource_id.clone()),
            reason: format!(
                "Compute resource running {} days with low usage",
                days_active
            ),
            estimated_monthly_waste: estimated,
            signals: LeakSignals {
                duration_days: Some(days_active),
                ..LeakSignals::default()
            },
        });
    }

    zombies
}

/// Compute resources with sustained low usage and meaningful spend.
///
/// `excluded` carries the resource ids already flagged as zombies, so the
/// same waste is never classified twice.
pub fn detect_idle_resources(
    features: &FeatureSet,
    config: &AnalyzerConfig,
    excluded: &HashSet<String>,
) -> Vec<LeakCandidate> {
    let thresholds = &config.thresholds.idle;
    let mut idle = Vec::new();

    for ((provider, service, resource_id), days_active) in features.lifespan_entries() {
        if service_category(&config.categories, service) != ServiceCategory::Compute {
            continue;
        }
        if excluded.contains(resource_id.as_str()) {
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

        let service_key = (*provider, service.clone());
        let avg_daily_cost = features.mean_daily_cost(&service_key).unwrap_or(0.0);
        if avg_daily_cost < thresholds.min_daily_cost {
            continue;
        }

        idle.push(LeakCandidate {
            leak_type: LeakType::IdleResource,
            provider: *provider,
            service: service.clone(),
            resource_id: Some(resource_id.clone()),
            reason: format!(
                "Compute resource with sustained low usage and daily cost ${:.2}",
                avg_daily_cost
            ),
            estimated_monthly_waste: None,
            signals: LeakSignals {
                duration_days: Some(days_active),
                ..LeakSignals::default()
            },
        });
    }

    idle
}

/// Services whose cost grew sharply without proportional usage growth.
pub fn detect_runaway_costs(
    features: &FeatureSet,
    config: &AnalyzerConfig,
) -> Vec<LeakCandidate> {
    let thresholds = &config.thresholds.runaway;
    let mut runaways = Vec::new();

    for key in features.service_keys() {
        let Some(days) = features.daily_costs(key) else {
            continue;
        };
        if days.len() < thresholds.min_days {
            continue;
        }

        let mean = days.iter().map(|(_, c)| c).sum::<f64>() / days.len() as f64;
        if mean < thresholds.min_daily_cost {
            continue;
        }

        let first = days[0].1;
        let last = days[days.len() - 1].1;
        // Guard the baseline so a near-zero first day cannot blow up the
        // growth figure.
        let growth = (last - first) / first.max(0.01) * 100.0;
        if growth < thresholds.growth_percent {
            continue;
        }

        // Growth backed by usage is legitimate scale-up, not a leak.
        if let Some(ratio) = features.service_mean_ratio(key) {
            if ratio > thresholds.max_usage_ratio {
                continue;
            }
        }

        runaways.push(LeakCandidate {
            leak_type: LeakType::RunawayCost,
            provider: key.0,
            service: key.1.clone(),
            resource_id: None,
            reason: format!(
                "Cost increased {:.1}% over {} days without matching usage growth",
                growth,
                days.len()
            ),
            estimated_monthly_waste: Some(waste::runaway_projected_waste(
                first,
                last,
                days.len() as u32,
            )),
            signals: LeakSignals {
                growth_percent: Some(growth),
                duration_days: Some(days.len() as u32),
                ..LeakSignals::default()
            },
        });
    }

    runaways
}

/// Expensive, continuously billed compute/database services that no tag
/// claims ownership of.
pub fn detect_always_on_high_cost(
    features: &FeatureSet,
    records: &[BillingRecord],
    config: &AnalyzerConfig,
) -> Vec<LeakCandidate> {
    let thresholds = &config.thresholds.always_on;
    let total_days = features.total_days().max(1);
    let mut leaks = Vec::new();

    for key in features.service_keys() {
        let category = service_category(&config.categories, &key.1);
        if !matches!(category, ServiceCategory::Compute | ServiceCategory::Database) {
            continue;
        }

        let Some(avg_cost) = features.mean_daily_cost(key) else {
            continue;
        };
        if avg_cost < thresholds.min_daily_cost {
            continue;
        }

        let presence = f64::from(features.days_present(key)) / f64::from(total_days);
        if presence < thresholds.presence_ratio {
            continue;
        }

        let owned = records
            .iter()
            .filter(|r| r.provider == key.0 && r.service == key.1)
            .any(has_ownership);
        if owned {
            continue;
        }

        leaks.push(LeakCandidate {
            leak_type: LeakType::AlwaysOnHighCost,
            provider: key.0,
            service: key.1.clone(),
            resource_id: None,
            reason: format!(
                "Service costs ${:.2}/day and runs continuously with no clear ownership",
                avg_cost
            ),
            estimated_monthly_waste: Some(waste::flat_monthly_waste(avg_cost)),
            signals: LeakSignals {
                duration_days: Some(features.days_present(key)),
                missing_ownership: true,
                ..LeakSignals::default()
            },
        });
    }

    leaks
}

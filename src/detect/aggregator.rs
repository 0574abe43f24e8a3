//! Detector sequencing and candidate deduplication.
//!
//! Detectors run in a fixed dependency order: the zombie pass runs first
//! because its matches form the exclusion set the idle pass reads.
//! Everything else is order-independent, but the order is still fixed so
//! that first-occurrence-wins deduplication is deterministic.

use crate::config::AnalyzerConfig;
use crate::detect::{rules, structural, LeakCandidate};
use crate::features::FeatureSet;
use crate::record::BillingRecord;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, warn};

/// Run the full detector battery and return the deduplicated union of
/// their candidates.
///
/// A panicking detector is isolated and logged; the remaining detectors
/// still contribute their leaks.
pub fn run_detectors(
    records: &[BillingRecord],
    features: &FeatureSet,
    config: &AnalyzerConfig,
) -> Vec<LeakCandidate> {
    let zombies = isolate("zombie_resources", || {
        rules::detect_zombie_resources(features, config)
    });

    let zombie_ids: HashSet<String> = zombies
        .iter()
        .filter_map(|leak| leak.resource_id.clone())
        .collect();

    let mut candidates = zombies;
    candidates.extend(isolate("idle_resources", || {
        rules::detect_idle_resources(features, config, &zombie_ids)
    }));
    candidates.extend(isolate("runaway_costs", || {
        rules::detect_runaway_costs(features, config)
    }));
    candidates.extend(isolate("always_on_high_cost", || {
        rules::detect_always_on_high_cost(features, records, config)
    }));
    candidates.extend(isolate("idle_databases", || {
        structural::detect_idle_databases(features, config)
    }));
    candidates.extend(isolate("orphaned_storage", || {
        structural::detect_orphaned_storage(records, config)
    }));
    candidates.extend(isolate("snapshot_sprawl", || {
        structural::detect_snapshot_sprawl(records, config)
    }));
    candidates.extend(isolate("untagged_resources", || {
        structural::detect_untagged_resources(records)
    }));

    let total = candidates.len();
    let deduped = dedupe(candidates);
    debug!(
        candidates = total,
        unique = deduped.len(),
        "Detector battery complete"
    );
    deduped
}

/// Drop later candidates that share an identity with an earlier one.
/// Idempotent: running it over its own output changes nothing.
pub fn dedupe(candidates: Vec<LeakCandidate>) -> Vec<LeakCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|leak| seen.insert(leak.identity()))
        .collect()
}

/// Run one detector, converting a panic into an empty contribution so a
/// single bad rule cannot abort the whole pipeline.
fn isolate<F>(name: &'static str, detector: F) -> Vec<LeakCandidate>
where
    F: FnOnce() -> Vec<LeakCandidate>,
{
    match catch_unwind(AssertUnwindSafe(detector)) {
        Ok(leaks) => leaks,
        Err(_) => {
            warn!(detector = name, "Detector panicked; skipping its results");
            Vec::new()
        }
    }
}

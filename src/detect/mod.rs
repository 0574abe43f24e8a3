//! Leak detection -- independent fixed-threshold rule evaluators over the
//! feature set, sequenced and deduplicated by the aggregator.

pub mod aggregator;
pub mod category;
pub mod rules;
pub mod structural;
pub mod waste;

use crate::record::Provider;
use serde::Serialize;

/// The waste patterns the rule battery can flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeakType {
    ZombieResource,
    IdleResource,
    RunawayCost,
    AlwaysOnHighCost,
    IdleDatabase,
    OrphanedStorage,
    SnapshotSprawl,
    UntaggedResource,
}

impl std::fmt::Display for LeakType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LeakType::ZombieResource => "ZOMBIE_RESOURCE",
            LeakType::IdleResource => "IDLE_RESOURCE",
            LeakType::RunawayCost => "RUNAWAY_COST",
            LeakType::AlwaysOnHighCost => "ALWAYS_ON_HIGH_COST",
            LeakType::IdleDatabase => "IDLE_DATABASE",
            LeakType::OrphanedStorage => "ORPHANED_STORAGE",
            LeakType::SnapshotSprawl => "SNAPSHOT_SPRAWL",
            LeakType::UntaggedResource => "UNTAGGED_RESOURCE",
        };
        write!(f, "{}", name)
    }
}

/// Typed risk signals a detector attaches to its candidates.
///
/// The severity scorer reads these flags instead of re-parsing the
/// human-readable reason text, so rephrasing a reason can never change
/// a score.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LeakSignals {
    /// Percent cost growth over the window, when growth triggered the rule.
    pub growth_percent: Option<f64>,
    /// Days the resource or service has been billing.
    pub duration_days: Option<u32>,
    /// Storage, snapshot, or backup related finding.
    pub storage_related: bool,
    /// No populated ownership tag was found.
    pub missing_ownership: bool,
}

/// One detector finding, before scoring.
#[derive(Debug, Clone, Serialize)]
pub struct LeakCandidate {
    pub leak_type: LeakType,
    pub provider: Provider,
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_monthly_waste: Option<f64>,
    pub signals: LeakSignals,
}

impl LeakCandidate {
    /// Deduplication identity: two candidates with the same identity are
    /// the same leak regardless of which detector produced them.
    pub fn identity(&self) -> (LeakType, Provider, String, Option<String>) {
        (
            self.leak_type,
            self.provider,
            self.service.clone(),
            self.resource_id.clone(),
        )
    }
}

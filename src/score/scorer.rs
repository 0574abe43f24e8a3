//! Additive severity scoring.
//!
//! Deterministic by construction: the only inputs are the leak's type and
//! its typed signal flags. Base confidence weight per type, fixed bonuses
//! for risk signals, a penalty for the low-confidence types, clamp to
//! [0, 100], then map to a tier.

use crate::detect::{LeakCandidate, LeakType};
use crate::score::{ScoredLeak, Severity};
use tracing::debug;

/// Base confidence weight per leak type. Zombie and runaway findings are
/// the strongest waste signals; untagged is the weakest.
fn base_weight(leak_type: LeakType) -> i32 {
    match leak_type {
        LeakType::ZombieResource => 65,
        LeakType::RunawayCost => 65,
        LeakType::AlwaysOnHighCost => 60,
        LeakType::IdleDatabase => 50,
        LeakType::IdleResource => 40,
        LeakType::OrphanedStorage => 35,
        LeakType::SnapshotSprawl => 30,
        LeakType::UntaggedResource => 20,
    }
}

const GROWTH_BONUS: i32 = 15;
const LONG_DURATION_BONUS: i32 = 10;
const LONG_DURATION_DAYS: u32 = 14;
const STORAGE_BONUS: i32 = 5;
const NO_OWNERSHIP_BONUS: i32 = 10;
const LOW_CONFIDENCE_PENALTY: i32 = 10;

const HIGH_THRESHOLD: u8 = 70;
const MEDIUM_THRESHOLD: u8 = 35;

fn low_confidence(leak_type: LeakType) -> bool {
    matches!(
        leak_type,
        LeakType::UntaggedResource | LeakType::SnapshotSprawl
    )
}

/// Score one candidate into [0, 100].
pub fn severity_score(candidate: &LeakCandidate) -> u8 {
    let mut score = base_weight(candidate.leak_type);

    if candidate.signals.growth_percent.is_some() {
        score += GROWTH_BONUS;
    }
    if candidate
        .signals
        .duration_days
        .is_some_and(|d| d >= LONG_DURATION_DAYS)
    {
        score += LONG_DURATION_BONUS;
    }
    if candidate.signals.storage_related {
        score += STORAGE_BONUS;
    }
    if candidate.signals.missing_ownership {
        score += NO_OWNERSHIP_BONUS;
    }
    if low_confidence(candidate.leak_type) {
        score -= LOW_CONFIDENCE_PENALTY;
    }

    score.clamp(0, 100) as u8
}

/// Map a score to its tier; boundaries are inclusive.
pub fn severity_tier(score: u8) -> Severity {
    if score >= HIGH_THRESHOLD {
        Severity::High
    } else if score >= MEDIUM_THRESHOLD {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// The recommended action is a function of the tier alone.
pub fn recommended_action(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "Investigate immediately and decommission or right-size the resource",
        Severity::Medium => "Review this resource and optimize or schedule a cleanup",
        Severity::Low => "Track this finding and revisit during the next cost review",
    }
}

/// Score every candidate and return the list sorted by descending score.
/// The sort is stable, so equal scores keep their detector order.
pub fn score_leaks(candidates: Vec<LeakCandidate>) -> Vec<ScoredLeak> {
    let mut scored: Vec<ScoredLeak> = candidates
        .into_iter()
        .map(|candidate| {
            let score = severity_score(&candidate);
            let severity = severity_tier(score);
            ScoredLeak {
                candidate,
                severity_score: score,
                severity,
                recommended_action: recommended_action(severity).to_string(),
                cost_percentile: None,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.severity_score.cmp(&a.severity_score));
    debug!(leaks = scored.len(), "Severity scoring complete");
    scored
}

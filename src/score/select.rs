//! Primary-leak selection: collapse multiple findings against the same
//! resource or service into the single most important one.

use crate::detect::LeakType;
use crate::record::Provider;
use crate::score::ScoredLeak;
use std::collections::HashMap;

/// Grouping key: by resource when the leak names one, else by service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Resource(String),
    Service(Provider, String),
}

fn group_key(leak: &ScoredLeak) -> GroupKey {
    match &leak.candidate.resource_id {
        Some(rid) => GroupKey::Resource(rid.clone()),
        None => GroupKey::Service(leak.candidate.provider, leak.candidate.service.clone()),
    }
}

/// Fixed tie-break ranking between leak types; lower ranks win when
/// severity scores are equal.
fn selection_priority(leak_type: LeakType) -> u8 {
    match leak_type {
        LeakType::RunawayCost => 0,
        LeakType::AlwaysOnHighCost => 1,
        LeakType::ZombieResource => 2,
        LeakType::IdleDatabase => 3,
        LeakType::IdleResource => 4,
        LeakType::OrphanedStorage => 5,
        LeakType::SnapshotSprawl => 6,
        LeakType::UntaggedResource => 7,
    }
}

/// True when `challenger` should replace `incumbent` as its group's
/// representative.
fn outranks(challenger: &ScoredLeak, incumbent: &ScoredLeak) -> bool {
    let by_score = challenger.severity_score.cmp(&incumbent.severity_score);
    match by_score {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => {
            selection_priority(challenger.candidate.leak_type)
                < selection_priority(incumbent.candidate.leak_type)
        }
    }
}

/// Keep one representative leak per group, then re-sort by descending
/// score (stable, so first-appearance order breaks remaining ties).
pub fn select_primary_leaks(scored: Vec<ScoredLeak>) -> Vec<ScoredLeak> {
    let mut best: HashMap<GroupKey, usize> = HashMap::new();
    let mut order: Vec<GroupKey> = Vec::new();

    for (index, leak) in scored.iter().enumerate() {
        let key = group_key(leak);
        match best.get(&key).copied() {
            Some(held) if !outranks(leak, &scored[held]) => {}
            Some(_) => {
                best.insert(key, index);
            }
            None => {
                best.insert(key.clone(), index);
                order.push(key);
            }
        }
    }

    let mut selected: Vec<ScoredLeak> = order
        .into_iter()
        .map(|key| scored[best[&key]].clone())
        .collect();
    selected.sort_by(|a, b| b.severity_score.cmp(&a.severity_score));
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{LeakCandidate, LeakSignals};
    use crate::score::{scorer, Severity};

    fn scored(
        leak_type: LeakType,
        service: &str,
        rid: Option<&str>,
        score: u8,
    ) -> ScoredLeak {
        ScoredLeak {
            candidate: LeakCandidate {
                leak_type,
                provider: Provider::Aws,
                service: service.to_string(),
                resource_id: rid.map(String::from),
                reason: "test".to_string(),
                estimated_monthly_waste: None,
                signals: LeakSignals::default(),
            },
            severity_score: score,
            severity: scorer::severity_tier(score),
            recommended_action: String::new(),
            cost_percentile: None,
        }
    }

    #[test]
    fn test_one_leak_per_resource() {
        let selected = select_primary_leaks(vec![
            scored(LeakType::ZombieResource, "EC2", Some("i-1"), 75),
            scored(LeakType::UntaggedResource, "EC2", Some("i-1"), 20),
            scored(LeakType::OrphanedStorage, "S3", Some("vol-2"), 40),
        ]);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].candidate.leak_type, LeakType::ZombieResource);
    }

    #[test]
    fn test_highest_score_wins_within_group() {
        let selected = select_primary_leaks(vec![
            scored(LeakType::UntaggedResource, "EC2", Some("i-1"), 20),
            scored(LeakType::ZombieResource, "EC2", Some("i-1"), 75),
        ]);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].severity_score, 75);
    }

    #[test]
    fn test_ties_break_by_type_priority() {
        let selected = select_primary_leaks(vec![
            scored(LeakType::ZombieResource, "EC2", Some("i-1"), 70),
            scored(LeakType::RunawayCost, "EC2", Some("i-1"), 70),
        ]);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].candidate.leak_type, LeakType::RunawayCost);
    }

    #[test]
    fn test_service_level_leaks_group_by_service() {
        let selected = select_primary_leaks(vec![
            scored(LeakType::RunawayCost, "CloudFront", None, 80),
            scored(LeakType::AlwaysOnHighCost, "CloudFront", None, 70),
            scored(LeakType::RunawayCost, "RDS", None, 80),
        ]);
        assert_eq!(selected.len(), 2);
        assert!(selected
            .iter()
            .all(|l| l.candidate.leak_type == LeakType::RunawayCost));
    }

    #[test]
    fn test_output_sorted_by_score() {
        let selected = select_primary_leaks(vec![
            scored(LeakType::SnapshotSprawl, "EBS Snapshot", Some("snap-1"), 25),
            scored(LeakType::RunawayCost, "CloudFront", None, 80),
            scored(LeakType::IdleResource, "EC2", Some("i-1"), 40),
        ]);
        let scores: Vec<u8> = selected.iter().map(|l| l.severity_score).collect();
        assert_eq!(scores, vec![80, 40, 25]);
    }

    #[test]
    fn test_empty_input_selects_nothing() {
        assert!(select_primary_leaks(Vec::new()).is_empty());
        // Sanity: severity plumbing for the empty case.
        assert_eq!(scorer::severity_tier(0), Severity::Low);
    }
}

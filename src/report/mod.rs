//! Analysis report assembly -- the pipeline's output contract.

pub mod insights;

use crate::score::{ScoredLeak, Severity};
use serde::Serialize;

/// Leak counts per severity tier.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SeveritySummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeveritySummary {
    pub fn tally(leaks: &[ScoredLeak]) -> Self {
        let mut summary = Self::default();
        for leak in leaks {
            match leak.severity {
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
        }
        summary
    }
}

/// The final product of one analysis run: the selected primary leaks,
/// the full pre-selection candidate list for diagnostics, and totals.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub leaks: Vec<ScoredLeak>,
    pub all_candidates: Vec<ScoredLeak>,
    pub summary: SeveritySummary,
    pub estimated_monthly_waste: f64,
}

impl AnalysisReport {
    pub fn build(selected: Vec<ScoredLeak>, all_candidates: Vec<ScoredLeak>) -> Self {
        let summary = SeveritySummary::tally(&selected);
        let estimated_monthly_waste = selected
            .iter()
            .filter_map(|l| l.candidate.estimated_monthly_waste)
            .sum::<f64>();
        let estimated_monthly_waste = (estimated_monthly_waste * 100.0).round() / 100.0;
        Self {
            leaks: selected,
            all_candidates,
            summary,
            estimated_monthly_waste,
        }
    }

    /// Explicit "no leaks" signal, distinct from an empty rendering.
    pub fn is_clean(&self) -> bool {
        self.leaks.is_empty()
    }
}

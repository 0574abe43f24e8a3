//! Severity scoring and primary-leak selection.

pub mod scorer;
pub mod select;

use crate::detect::LeakCandidate;
use serde::Serialize;

/// Severity tiers for scored leaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::High => write!(f, "HIGH"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::Low => write!(f, "LOW"),
        }
    }
}

/// A leak candidate with its severity verdict attached.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredLeak {
    #[serde(flatten)]
    pub candidate: LeakCandidate,
    pub severity_score: u8,
    pub severity: Severity,
    pub recommended_action: String,
    /// Where this resource's total cost ranks within its service
    /// (presentation context, filled in after selection).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_percentile: Option<f64>,
}

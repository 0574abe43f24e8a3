use crate::ingest::{IngestError, RawTable};
use serde::Serialize;

/// What kind of export a CSV looks like, judged from column names only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableKind {
    Invoice,
    CostUsage,
    Unknown,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Invoice => write!(f, "INVOICE"),
            TableKind::CostUsage => write!(f, "COST_USAGE"),
            TableKind::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

const INVOICE_KEYWORDS: [&str; 5] = ["invoice", "due", "balance", "payer", "billing period"];
const USAGE_KEYWORDS: [&str; 5] = ["usage", "resource", "service", "meter", "cost"];
const COST_LIKE_KEYWORDS: [&str; 4] = ["cost", "amount", "usage", "quantity"];

/// Structural checks before any normalization: the table must be
/// non-empty and carry at least one cost-like column.
pub fn validate_table(table: &RawTable) -> Result<(), IngestError> {
    if table.is_empty() {
        return Err(IngestError::Empty);
    }

    let has_cost_signal = table.headers.iter().any(|header| {
        let lower = header.to_lowercase();
        COST_LIKE_KEYWORDS.iter().any(|k| lower.contains(k))
    });
    if !has_cost_signal {
        return Err(IngestError::NoCostColumns);
    }

    Ok(())
}

/// Classify the export by column-name keywords. Invoice columns win over
/// usage columns: an invoice export is not analyzable line-item data.
pub fn detect_table_kind(headers: &[String]) -> TableKind {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let any_match = |keywords: &[&str]| {
        lowered
            .iter()
            .any(|col| keywords.iter().any(|k| col.contains(k)))
    };

    if any_match(&INVOICE_KEYWORDS) {
        TableKind::Invoice
    } else if any_match(&USAGE_KEYWORDS) {
        TableKind::CostUsage
    } else {
        TableKind::Unknown
    }
}

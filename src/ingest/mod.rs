//! CSV ingestion -- raw table loading and structural validation.

pub mod csv;
pub mod validate;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: ::csv::Error,
    },

    #[error("CSV file is empty")]
    Empty,

    #[error("CSV does not contain cost or usage data")]
    NoCostColumns,
}

/// An untyped CSV table: headers plus string cells, exactly as read.
/// Provider-specific meaning is assigned later by the normalizers.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

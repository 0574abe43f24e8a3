//! Canonical billing records -- the normalized input to the analysis pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cloud providers recognized by the normalizers and detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Aws => write!(f, "AWS"),
            Provider::Azure => write!(f, "AZURE"),
            Provider::Gcp => write!(f, "GCP"),
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aws" => Ok(Provider::Aws),
            "azure" => Ok(Provider::Azure),
            "gcp" => Ok(Provider::Gcp),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

/// One normalized cost line-item.
///
/// Rows missing `date`, `service`, or `cost` are dropped by the
/// normalization layer and never reach the pipeline. Ownership-like
/// columns (owner / project / environment, including namespaced
/// variants) are carried in `tags`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingRecord {
    pub date: NaiveDate,
    pub provider: Provider,
    pub service: String,
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl BillingRecord {
    /// Grouping key for service-level aggregates.
    pub fn service_key(&self) -> (Provider, String) {
        (self.provider, self.service.clone())
    }

    /// Grouping key for resource-level aggregates, when the row carries one.
    pub fn resource_key(&self) -> Option<(Provider, String, String)> {
        self.resource_id
            .as_ref()
            .map(|rid| (self.provider, self.service.clone(), rid.clone()))
    }
}

/// Tag values that count as "no ownership information".
pub const PLACEHOLDER_TAG_VALUES: [&str; 4] = ["", "unknown", "none", "nan"];

/// True when the column name looks like an ownership tag
/// (owner / project / environment, any namespacing).
pub fn is_ownership_column(name: &str) -> bool {
    let lower = name.to_lowercase();
    ["owner", "project", "environment"]
        .iter()
        .any(|k| lower.contains(k))
}

/// True when a tag value actually identifies an owner, i.e. it is not
/// empty or a placeholder like "unknown".
pub fn is_populated_tag(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    !PLACEHOLDER_TAG_VALUES.contains(&lower.as_str())
}

/// True when any ownership-like tag on the record holds a real value.
pub fn has_ownership(record: &BillingRecord) -> bool {
    record
        .tags
        .iter()
        .any(|(k, v)| is_ownership_column(k) && is_populated_tag(v))
}

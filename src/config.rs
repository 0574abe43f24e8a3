//! Analyzer configuration -- detector thresholds and service keyword tables.
//!
//! All tunables live in one immutable [`AnalyzerConfig`] value handed to the
//! feature engine and detectors, so tests can inject alternate thresholds
//! without touching process-wide state. Defaults match the shipped rules;
//! a TOML file with the same shape can override any subset.

use crate::record::Provider;
use serde::{Deserialize, Serialize};

/// Per-provider usage-to-cost ratio bounds.
///
/// GCP usage units are on a different scale than AWS/Azure, so its
/// bound is far larger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerProviderRatio {
    pub aws: f64,
    pub azure: f64,
    pub gcp: f64,
}

impl PerProviderRatio {
    pub fn for_provider(&self, provider: Provider) -> f64 {
        match provider {
            Provider::Aws => self.aws,
            Provider::Azure => self.azure,
            Provider::Gcp => self.gcp,
        }
    }
}

impl Default for PerProviderRatio {
    fn default() -> Self {
        Self {
            aws: 0.05,
            azure: 0.10,
            gcp: 3.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZombieThresholds {
    pub min_days_active: u32,
    pub usage_ratio: PerProviderRatio,
}

impl Default for ZombieThresholds {
    fn default() -> Self {
        Self {
            min_days_active: 14,
            usage_ratio: PerProviderRatio::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleThresholds {
    pub min_days_active: u32,
    pub max_usage_ratio: f64,
    pub min_daily_cost: f64,
}

impl Default for IdleThresholds {
    fn default() -> Self {
        Self {
            min_days_active: 3,
            max_usage_ratio: 5.0,
            min_daily_cost: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunawayThresholds {
    pub min_days: usize,
    pub min_daily_cost: f64,
    pub growth_percent: f64,
    pub max_usage_ratio: f64,
}

impl Default for RunawayThresholds {
    fn default() -> Self {
        Self {
            min_days: 3,
            min_daily_cost: 2.0,
            growth_percent: 30.0,
            max_usage_ratio: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlwaysOnThresholds {
    pub min_daily_cost: f64,
    pub presence_ratio: f64,
}

impl Default for AlwaysOnThresholds {
    fn default() -> Self {
        Self {
            min_daily_cost: 50.0,
            presence_ratio: 0.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleDatabaseThresholds {
    pub min_days_active: u32,
    pub max_usage_ratio: f64,
    pub min_daily_cost: f64,
}

impl Default for IdleDatabaseThresholds {
    fn default() -> Self {
        Self {
            min_days_active: 7,
            max_usage_ratio: 0.2,
            min_daily_cost: 10.0,
        }
    }
}

/// Keyword sets for coarse service categorization
/// (case-insensitive substring match, any provider).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryKeywords {
    pub compute: Vec<String>,
    pub storage: Vec<String>,
    pub serverless: Vec<String>,
    pub database: Vec<String>,
}

impl Default for CategoryKeywords {
    fn default() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }
        Self {
            compute: owned(&["ec2", "virtual machines", "compute engine"]),
            storage: owned(&["s3", "storage", "cloud storage"]),
            serverless: owned(&["lambda", "functions", "cloud functions"]),
            database: owned(&["rds", "sql", "cosmos", "cloud sql"]),
        }
    }
}

/// Per-provider keyword table used by the structural detectors to decide
/// whether a resource row is compute, storage, or a snapshot/backup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderKeywords {
    pub aws: Vec<String>,
    pub azure: Vec<String>,
    pub gcp: Vec<String>,
}

impl ProviderKeywords {
    fn owned(aws: &[&str], azure: &[&str], gcp: &[&str]) -> Self {
        let to_vec = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            aws: to_vec(aws),
            azure: to_vec(azure),
            gcp: to_vec(gcp),
        }
    }

    pub fn for_provider(&self, provider: Provider) -> &[String] {
        match provider {
            Provider::Aws => &self.aws,
            Provider::Azure => &self.azure,
            Provider::Gcp => &self.gcp,
        }
    }

    /// Case-insensitive substring match of any keyword in the service name.
    pub fn matches(&self, provider: Provider, service: &str) -> bool {
        let lower = service.to_lowercase();
        self.for_provider(provider).iter().any(|k| lower.contains(k))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralKeywords {
    pub compute: ProviderKeywords,
    pub storage: ProviderKeywords,
    pub snapshot: ProviderKeywords,
}

impl Default for StructuralKeywords {
    fn default() -> Self {
        Self {
            compute: ProviderKeywords::owned(&["ec2"], &["virtual machines"], &["compute engine"]),
            storage: ProviderKeywords::owned(
                &["ebs", "s3"],
                &["disk", "storage"],
                &["persistent disk", "cloud storage"],
            ),
            snapshot: ProviderKeywords::owned(
                &["snapshot"],
                &["snapshot", "backup"],
                &["snapshot"],
            ),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub zombie: ZombieThresholds,
    pub idle: IdleThresholds,
    pub runaway: RunawayThresholds,
    pub always_on: AlwaysOnThresholds,
    pub idle_database: IdleDatabaseThresholds,
}

/// Immutable configuration for one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub thresholds: Thresholds,
    pub categories: CategoryKeywords,
    pub structural: StructuralKeywords,
}

impl AnalyzerConfig {
    /// Load overrides from a TOML file; unset keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

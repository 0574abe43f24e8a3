//! Feature engineering -- per-service and per-resource behavioral signals
//! derived fresh from the canonical record set on every run.

pub mod engine;
pub mod percentile;

use crate::record::Provider;
use chrono::NaiveDate;
use serde::Serialize;

pub use engine::FeatureSet;

/// (provider, service) grouping key.
pub type ServiceKey = (Provider, String);

/// (provider, service, resource_id) grouping key.
pub type ResourceKey = (Provider, String, String);

/// Summed cost for one service on one calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct DailyServiceCost {
    pub date: NaiveDate,
    pub provider: Provider,
    pub service: String,
    pub daily_cost: f64,
}

/// Direction of a service's cost over the observed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CostTrend {
    Increasing,
    Decreasing,
    Flat,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceTrend {
    pub provider: Provider,
    pub service: String,
    pub trend: CostTrend,
}

/// Count of distinct billed days for one resource.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceLifespan {
    pub provider: Provider,
    pub service: String,
    pub resource_id: String,
    pub days_active: u32,
}

/// Total usage divided by total cost for one resource.
///
/// `ratio` is `None` when usage was never observed for the group or its
/// total cost is exactly zero -- a sentinel distinct from a ratio of zero.
#[derive(Debug, Clone, Serialize)]
pub struct UsageCostRatio {
    pub provider: Provider,
    pub service: String,
    pub resource_id: String,
    pub ratio: Option<f64>,
}

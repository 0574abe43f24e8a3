//! Provider-specific normalization into canonical billing records.
//!
//! Each provider's export names the same concepts differently; a static
//! alias table maps its columns onto the unified schema. Rows missing a
//! required field (date, service, cost) are dropped and counted, never a
//! failure. Ownership-like columns ride along in `tags`.

use crate::ingest::RawTable;
use crate::record::{is_ownership_column, BillingRecord, Provider};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Canonical meaning assigned to one source column.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ColumnRole {
    Date,
    Service,
    Cost,
    Usage,
    ResourceId,
    Region,
    Tag(String),
    Ignored,
}

/// (source column, canonical field) aliases, matched case-insensitively.
fn alias_table(provider: Provider) -> &'static [(&'static str, &'static str)] {
    match provider {
        Provider::Aws => &[
            ("usagestartdate", "date"),
            ("service", "service"),
            ("resourceid", "resource_id"),
            ("usagequantity", "usage"),
            ("unblendedcost", "cost"),
            ("region", "region"),
        ],
        Provider::Azure => &[
            ("usagedate", "date"),
            ("servicename", "service"),
            ("resourceid", "resource_id"),
            ("usagequantity", "usage"),
            ("cost", "cost"),
            ("resourcelocation", "region"),
        ],
        Provider::Gcp => &[
            ("usage_start_time", "date"),
            ("service.description", "service"),
            ("usage.amount", "usage"),
            ("cost", "cost"),
            ("resource.name", "resource_id"),
            ("location.region", "region"),
        ],
    }
}

/// Canonical column names pass through for any provider, so already
/// normalized exports re-ingest cleanly.
const CANONICAL_NAMES: [&str; 6] = ["date", "service", "cost", "usage", "resource_id", "region"];

fn role_for(field: &str) -> ColumnRole {
    match field {
        "date" => ColumnRole::Date,
        "service" => ColumnRole::Service,
        "cost" => ColumnRole::Cost,
        "usage" => ColumnRole::Usage,
        "resource_id" => ColumnRole::ResourceId,
        "region" => ColumnRole::Region,
        _ => ColumnRole::Ignored,
    }
}

fn column_roles(headers: &[String], provider: Provider) -> Vec<ColumnRole> {
    let aliases = alias_table(provider);
    headers
        .iter()
        .map(|header| {
            let lower = header.to_lowercase();
            if let Some((_, field)) = aliases.iter().find(|(alias, _)| *alias == lower) {
                return role_for(field);
            }
            if CANONICAL_NAMES.contains(&lower.as_str()) {
                return role_for(&lower);
            }
            if is_ownership_column(header) {
                return ColumnRole::Tag(header.clone());
            }
            ColumnRole::Ignored
        })
        .collect()
}

/// Accept plain dates and the timestamp shapes the provider exports use;
/// timestamps truncate to the calendar day.
fn parse_day(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Result of normalizing one table: the valid records plus how many rows
/// were dropped for missing required fields.
#[derive(Debug)]
pub struct NormalizeOutcome {
    pub records: Vec<BillingRecord>,
    pub skipped_rows: usize,
}

/// Map a raw table into canonical records for one provider.
pub fn normalize(table: &RawTable, provider: Provider) -> NormalizeOutcome {
    let roles = column_roles(&table.headers, provider);
    let mut records = Vec::with_capacity(table.rows.len());
    let mut skipped_rows = 0usize;

    for row in &table.rows {
        let mut date = None;
        let mut service = None;
        let mut cost = None;
        let mut usage = None;
        let mut resource_id = None;
        let mut region = None;
        let mut tags = BTreeMap::new();

        for (role, cell) in roles.iter().zip(row) {
            if cell.is_empty() {
                continue;
            }
            match role {
                ColumnRole::Date => date = parse_day(cell),
                ColumnRole::Service => service = Some(cell.clone()),
                ColumnRole::Cost => cost = cell.parse::<f64>().ok(),
                ColumnRole::Usage => usage = cell.parse::<f64>().ok(),
                ColumnRole::ResourceId => resource_id = Some(cell.clone()),
                ColumnRole::Region => region = Some(cell.clone()),
                ColumnRole::Tag(name) => {
                    tags.insert(name.clone(), cell.clone());
                }
                ColumnRole::Ignored => {}
            }
        }

        // Required fields; a negative cost is as invalid as a missing one.
        let (Some(date), Some(service), Some(cost)) = (date, service, cost) else {
            skipped_rows += 1;
            continue;
        };
        if cost < 0.0 {
            skipped_rows += 1;
            continue;
        }

        records.push(BillingRecord {
            date,
            provider,
            service,
            cost,
            usage,
            resource_id,
            region,
            tags,
        });
    }

    if skipped_rows > 0 {
        warn!(
            provider = %provider,
            skipped = skipped_rows,
            kept = records.len(),
            "Dropped rows missing required fields"
        );
    } else {
        debug!(provider = %provider, kept = records.len(), "Normalized table");
    }

    NormalizeOutcome {
        records,
        skipped_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_aws_aliases_map_to_canonical_fields() {
        let outcome = normalize(
            &table(
                &["UsageStartDate", "Service", "ResourceId", "UnblendedCost", "Region"],
                &[&["2026-01-05", "EC2", "i-1", "3.25", "us-east-1"]],
            ),
            Provider::Aws,
        );
        assert_eq!(outcome.skipped_rows, 0);
        let record = &outcome.records[0];
        assert_eq!(record.date.to_string(), "2026-01-05");
        assert_eq!(record.service, "EC2");
        assert_eq!(record.resource_id.as_deref(), Some("i-1"));
        assert_eq!(record.cost, 3.25);
        assert_eq!(record.region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn test_gcp_timestamps_truncate_to_day() {
        let outcome = normalize(
            &table(
                &["usage_start_time", "service.description", "cost"],
                &[&["2026-01-05T13:45:00+00:00", "Compute Engine", "1.0"]],
            ),
            Provider::Gcp,
        );
        assert_eq!(outcome.records[0].date.to_string(), "2026-01-05");
    }

    #[test]
    fn test_rows_missing_required_fields_are_dropped_not_fatal() {
        let outcome = normalize(
            &table(
                &["UsageDate", "ServiceName", "Cost"],
                &[
                    &["2026-01-05", "SQL Database", "9.5"],
                    &["", "SQL Database", "9.5"],
                    &["2026-01-06", "", "9.5"],
                    &["2026-01-07", "SQL Database", "not-a-number"],
                ],
            ),
            Provider::Azure,
        );
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.skipped_rows, 3);
    }

    #[test]
    fn test_negative_cost_is_invalid() {
        let outcome = normalize(
            &table(&["date", "service", "cost"], &[&["2026-01-05", "EC2", "-1.0"]]),
            Provider::Aws,
        );
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.skipped_rows, 1);
    }

    #[test]
    fn test_ownership_columns_become_tags() {
        let outcome = normalize(
            &table(
                &["date", "service", "cost", "resource_tags_user_owner"],
                &[&["2026-01-05", "EC2", "1.0", "platform-team"]],
            ),
            Provider::Aws,
        );
        assert_eq!(
            outcome.records[0].tags.get("resource_tags_user_owner"),
            Some(&"platform-team".to_string())
        );
    }

    #[test]
    fn test_canonical_headers_pass_through_for_any_provider() {
        let outcome = normalize(
            &table(
                &["date", "service", "cost", "usage", "resource_id"],
                &[&["2026-01-05", "Cloud SQL", "2.0", "14.5", "db-1"]],
            ),
            Provider::Gcp,
        );
        let record = &outcome.records[0];
        assert_eq!(record.usage, Some(14.5));
        assert_eq!(record.resource_id.as_deref(), Some("db-1"));
    }
}

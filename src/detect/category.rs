use crate::config::CategoryKeywords;

/// Coarse service category used to gate the rule-based detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceCategory {
    Compute,
    Storage,
    Serverless,
    Database,
    Other,
}

/// Classify a service name by case-insensitive substring match against
/// the configured keyword sets. Unmatched services are `Other` and are
/// skipped by every category-gated rule.
pub fn service_category(keywords: &CategoryKeywords, service: &str) -> ServiceCategory {
    if service.is_empty() {
        return ServiceCategory::Other;
    }

    let lower = service.to_lowercase();
    let contains_any = |set: &[String]| set.iter().any(|k| lower.contains(k));

    if contains_any(&keywords.compute) {
        ServiceCategory::Compute
    } else if contains_any(&keywords.storage) {
        ServiceCategory::Storage
    } else if contains_any(&keywords.serverless) {
        ServiceCategory::Serverless
    } else if contains_any(&keywords.database) {
        ServiceCategory::Database
    } else {
        ServiceCategory::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> CategoryKeywords {
        CategoryKeywords::default()
    }

    #[test]
    fn test_compute_matches_each_provider() {
        assert_eq!(service_category(&keywords(), "Amazon EC2"), ServiceCategory::Compute);
        assert_eq!(
            service_category(&keywords(), "Virtual Machines"),
            ServiceCategory::Compute
        );
        assert_eq!(
            service_category(&keywords(), "Compute Engine"),
            ServiceCategory::Compute
        );
    }

    #[test]
    fn test_database_and_storage() {
        assert_eq!(service_category(&keywords(), "Amazon RDS"), ServiceCategory::Database);
        assert_eq!(service_category(&keywords(), "Cloud SQL"), ServiceCategory::Database);
        assert_eq!(service_category(&keywords(), "S3"), ServiceCategory::Storage);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert_eq!(service_category(&keywords(), "AMAZON ec2 spot"), ServiceCategory::Compute);
    }

    #[test]
    fn test_unmatched_is_other() {
        assert_eq!(service_category(&keywords(), "CloudWatch"), ServiceCategory::Other);
        assert_eq!(service_category(&keywords(), ""), ServiceCategory::Other);
    }

    #[test]
    fn test_compute_wins_over_later_sets() {
        // "ec2 storage" matches compute first; category order is fixed.
        assert_eq!(
            service_category(&keywords(), "ec2 storage"),
            ServiceCategory::Compute
        );
    }
}

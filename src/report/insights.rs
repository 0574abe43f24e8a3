//! Human-readable insight lines rendered from a finished report.

use crate::report::AnalysisReport;

/// One insight block per selected leak; a healthy dataset yields the
/// single all-clear line rather than nothing.
pub fn generate_insights(report: &AnalysisReport) -> Vec<String> {
    if report.is_clean() {
        return vec!["✅ No cost leaks detected. Your cloud usage looks healthy.".to_string()];
    }

    report
        .leaks
        .iter()
        .map(|leak| {
            let resource = leak.candidate.resource_id.as_deref().unwrap_or("N/A");
            format!(
                "[{}] {} detected in {} {}\n→ Resource: {}\n→ Reason: {}\n→ Recommended action: {}",
                leak.severity,
                leak.candidate.leak_type,
                leak.candidate.provider,
                leak.candidate.service,
                resource,
                leak.candidate.reason,
                leak.recommended_action,
            )
        })
        .collect()
}

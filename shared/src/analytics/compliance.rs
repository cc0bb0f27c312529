//! Compliance completeness ratios

use crate::models::{BatchRecord, ComplianceCategory, ComplianceMetric};

/// Percentage of `count` over `total`, rounded half-up and clamped to 0-100.
///
/// A zero `total` is treated as one so an empty population scores 0.
pub fn percent_of(count: usize, total: usize) -> u8 {
    let total = total.max(1) as u64;
    let count = count as u64;
    let rounded = (count * 200 + total) / (total * 2);
    rounded.min(100) as u8
}

/// Traceability, processing and data completeness scores for a snapshot
pub fn compliance_metrics(records: &[BatchRecord]) -> [ComplianceMetric; 3] {
    let total = records.len();
    let traced = records.iter().filter(|r| r.has_owner_history()).count();
    let processed = records.iter().filter(|r| r.has_processing_steps()).count();
    let complete = records.iter().filter(|r| r.has_essential_fields()).count();

    [
        ComplianceMetric::new(ComplianceCategory::Traceability, percent_of(traced, total)),
        ComplianceMetric::new(
            ComplianceCategory::ProcessingLogged,
            percent_of(processed, total),
        ),
        ComplianceMetric::new(
            ComplianceCategory::DataCompleteness,
            percent_of(complete, total),
        ),
    ]
}

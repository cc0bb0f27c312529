//! Batch analytics aggregator
//!
//! Four independent, pure transforms over a batch snapshot. None of them
//! fail: malformed or partial records degrade to "unknown" or "absent".

mod activity;
mod compliance;
mod flow;
mod species;
mod stats;

pub use activity::*;
pub use compliance::*;
pub use flow::*;
pub use species::*;
pub use stats::*;

use crate::models::{BatchRecord, DashboardView};

/// Compute every dashboard view from one snapshot
pub fn build_dashboard(records: &[BatchRecord]) -> DashboardView {
    let summary = summarize(records);
    let flow = monthly_flow(records);
    let stats = dashboard_stats(&summary, &flow);

    DashboardView {
        summary,
        species_distribution: group_by_species(records),
        monthly_flow: flow,
        compliance: compliance_metrics(records),
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DashboardStats;

    #[test]
    fn test_build_dashboard_on_empty_snapshot() {
        let view = build_dashboard(&[]);

        assert_eq!(view.summary.total_batches, 0);
        assert_eq!(view.summary.distinct_farmers, 0);
        assert!(view.summary.recent.is_empty());
        assert!(view.species_distribution.is_empty());
        assert!(view.monthly_flow.iter().all(|m| m.batch_count == 0));
        assert!(view.compliance.iter().all(|c| c.percent == 0));
        assert_eq!(view.stats, DashboardStats::default());
    }
}

//! Derived dashboard percentages

use super::compliance::percent_of;
use super::{monthly_flow, summarize};
use crate::models::{ActivitySummary, BatchRecord, DashboardStats, MonthlyFlow};

/// Peak-month throughput and farmer/batch ratio from already computed views.
///
/// Both divide by the batch total, so an empty snapshot scores 0.
pub fn dashboard_stats(summary: &ActivitySummary, flow: &[MonthlyFlow; 12]) -> DashboardStats {
    let peak = flow.iter().map(|m| m.batch_count).max().unwrap_or(0);

    DashboardStats {
        peak_month_throughput: percent_of(peak, summary.total_batches),
        farmer_batch_ratio: percent_of(summary.distinct_farmers, summary.total_batches),
    }
}

/// Compute [`DashboardStats`] straight from a snapshot
pub fn derived_stats(records: &[BatchRecord]) -> DashboardStats {
    dashboard_stats(&summarize(records), &monthly_flow(records))
}

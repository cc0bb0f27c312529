//! Monthly batch flow

use chrono::Datelike;

use crate::models::{BatchRecord, MonthlyFlow};
use crate::types::Month;

/// Histogram of batches per calendar month, January first.
///
/// Each batch is placed by [`BatchRecord::activity_timestamp`] using its UTC
/// month. Batches without a parseable timestamp are left out. Years are not
/// distinguished: March 2023 and March 2024 share one bucket.
pub fn monthly_flow(records: &[BatchRecord]) -> [MonthlyFlow; 12] {
    let mut flow = Month::ALL.map(MonthlyFlow::empty);

    for timestamp in records.iter().filter_map(BatchRecord::activity_timestamp) {
        flow[timestamp.month0() as usize].batch_count += 1;
    }

    flow
}

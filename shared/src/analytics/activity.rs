//! Headline counters and recent activity feed

use std::collections::HashSet;

use crate::models::{ActivityStatus, ActivitySummary, BatchRecord, RecentActivity};

/// Number of batches shown in the recent activity feed
pub const RECENT_ACTIVITY_LIMIT: usize = 4;

impl From<&BatchRecord> for RecentActivity {
    fn from(record: &BatchRecord) -> Self {
        Self {
            id: record.batch_id.clone(),
            herb_name: record.species.clone(),
            farmer_name: record.farmer_id.clone(),
            created_at: record.created_at.clone(),
            status: ActivityStatus::Compliant,
        }
    }
}

/// Totals, distinct farmers and the most recent batches.
///
/// `records` is taken to be in ascending creation order already; the feed
/// is its last [`RECENT_ACTIVITY_LIMIT`] entries in that order. Batches
/// without a farmer count together as one extra "unknown farmer".
pub fn summarize(records: &[BatchRecord]) -> ActivitySummary {
    let farmers: HashSet<Option<&str>> = records.iter().map(BatchRecord::farmer_key).collect();

    let start = records.len().saturating_sub(RECENT_ACTIVITY_LIMIT);
    let recent = records[start..].iter().map(RecentActivity::from).collect();

    ActivitySummary {
        total_batches: records.len(),
        distinct_farmers: farmers.len(),
        recent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(id: &str, farmer: Option<&str>) -> BatchRecord {
        BatchRecord {
            batch_id: id.into(),
            farmer_id: farmer.map(String::from),
            species: Some("Shatavari".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_batches, 0);
        assert_eq!(summary.distinct_farmers, 0);
        assert!(summary.recent.is_empty());
    }

    #[test]
    fn test_distinct_farmers_counts_unknown_once() {
        let records = vec![
            batch("B1", Some("F1")),
            batch("B2", Some("F1")),
            batch("B3", None),
            batch("B4", Some("")),
            batch("B5", Some("F2")),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.total_batches, 5);
        assert_eq!(summary.distinct_farmers, 3);
    }

    #[test]
    fn test_single_farmerless_batch_counts_one_farmer() {
        assert_eq!(summarize(&[batch("B1", None)]).distinct_farmers, 1);
    }

    #[test]
    fn test_recent_is_last_four_in_input_order() {
        let records: Vec<_> = (1..=6)
            .map(|i| batch(&format!("B{}", i), Some("F1")))
            .collect();
        let ids: Vec<_> = summarize(&records)
            .recent
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["B3", "B4", "B5", "B6"]);
    }

    #[test]
    fn test_recent_projection() {
        let summary = summarize(&[batch("B9", Some("F7"))]);
        let entry = &summary.recent[0];
        assert_eq!(entry.id, "B9");
        assert_eq!(entry.herb_name.as_deref(), Some("Shatavari"));
        assert_eq!(entry.farmer_name.as_deref(), Some("F7"));
        assert_eq!(entry.status, ActivityStatus::Compliant);
    }
}

//! Batch detail projection for the lookup and detail pages

use serde::{Deserialize, Serialize};

use super::BatchRecord;
use crate::types::RecordedTime;

/// Fallback label for custody entries without an owner
pub const DEFAULT_OWNER_LABEL: &str = "Owner";

/// Display-ready view of a single batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchDetailView {
    pub batch_id: String,
    pub species: Option<String>,
    pub farmer_id: Option<String>,
    pub cultivation_location: Option<String>,
    pub current_owner: Option<String>,
    pub harvest_date: Option<RecordedTime>,
    pub created_at: Option<RecordedTime>,
    pub updated_at: Option<RecordedTime>,
    pub owner_history: Vec<CustodyEntry>,
    pub processing_steps: Vec<ProcessingEntry>,
}

/// One custody transfer, positioned 1-based in recorded order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustodyEntry {
    pub position: usize,
    pub owner: String,
    pub timestamp: Option<RecordedTime>,
    pub note: Option<String>,
}

/// One processing step, positioned 1-based in recorded order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessingEntry {
    pub position: usize,
    pub step: String,
    pub details: Option<String>,
    pub timestamp: Option<RecordedTime>,
}

/// Project a batch record into its detail view
pub fn describe_batch(record: &BatchRecord) -> BatchDetailView {
    let owner_history = record
        .owner_history
        .iter()
        .flatten()
        .enumerate()
        .map(|(idx, event)| CustodyEntry {
            position: idx + 1,
            owner: event.custodian().unwrap_or(DEFAULT_OWNER_LABEL).to_string(),
            timestamp: RecordedTime::from_raw(event.timestamp.as_deref()),
            note: event.note.clone().filter(|n| !n.is_empty()),
        })
        .collect();

    let processing_steps = record
        .processing_steps
        .iter()
        .flatten()
        .enumerate()
        .map(|(idx, step)| ProcessingEntry {
            position: idx + 1,
            step: step
                .label()
                .map(String::from)
                .unwrap_or_else(|| format!("Step {}", idx + 1)),
            details: step.details.clone().filter(|d| !d.is_empty()),
            timestamp: RecordedTime::from_raw(step.timestamp.as_deref()),
        })
        .collect();

    BatchDetailView {
        batch_id: record.batch_id.clone(),
        species: record.species.clone(),
        farmer_id: record.farmer_id.clone(),
        cultivation_location: record.cultivation_location.clone(),
        current_owner: record.current_owner.clone(),
        harvest_date: RecordedTime::from_raw(record.harvest_date.as_deref()),
        created_at: RecordedTime::from_raw(record.created_at.as_deref()),
        updated_at: RecordedTime::from_raw(record.updated_at.as_deref()),
        owner_history,
        processing_steps,
    }
}

impl From<&BatchRecord> for BatchDetailView {
    fn from(record: &BatchRecord) -> Self {
        describe_batch(record)
    }
}

//! Single-batch lookup and stale-response sequencing

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::BatchRecord;

/// Why a lookup over a batch list produced no record
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("batch {0} not found")]
    NotFound(String),

    /// The list is inconsistent; no record is picked
    #[error("batch id {batch_id} appears {occurrences} times")]
    DuplicateBatchId { batch_id: String, occurrences: usize },
}

/// Find the batch whose id matches `batch_id` exactly (case-sensitive).
///
/// Duplicate ids are reported as [`LookupError::DuplicateBatchId`] rather
/// than resolved to the first or last match.
pub fn find_batch<'a>(
    records: &'a [BatchRecord],
    batch_id: &str,
) -> Result<&'a BatchRecord, LookupError> {
    let mut matches = records.iter().filter(|r| r.batch_id == batch_id);

    let found = matches
        .next()
        .ok_or_else(|| LookupError::NotFound(batch_id.to_string()))?;

    let extra = matches.count();
    if extra > 0 {
        return Err(LookupError::DuplicateBatchId {
            batch_id: batch_id.to_string(),
            occurrences: extra + 1,
        });
    }

    Ok(found)
}

/// An id shared by more than one batch in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DuplicateBatchId {
    pub batch_id: String,
    pub occurrences: usize,
}

/// Every id that occurs more than once, in first-seen order
pub fn duplicate_batch_ids(records: &[BatchRecord]) -> Vec<DuplicateBatchId> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for record in records {
        let count = seen.entry(record.batch_id.as_str()).or_insert(0);
        if *count == 0 {
            order.push(record.batch_id.as_str());
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter_map(|id| {
            let occurrences = seen[id];
            (occurrences > 1).then(|| DuplicateBatchId {
                batch_id: id.to_string(),
                occurrences,
            })
        })
        .collect()
}

/// Identifies one lookup request issued by a [`LookupSequencer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }

    pub fn from_value(value: u64) -> Self {
        Self(value)
    }
}

/// Result of one lookup as presented to the user
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome<T> {
    Found(T),
    /// Normal empty state: the batch does not exist
    NotFound,
    /// Retryable error state
    Failed(String),
}

/// Whether a completed response was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request was issued (or this one was already applied); the response is dropped
    Stale,
}

/// Last-request-wins bookkeeping for lookups issued in quick succession.
///
/// Every lookup takes a token from [`begin`](Self::begin). Only the response
/// carrying the latest token is applied; a late response for a superseded
/// request is discarded instead of overwriting newer state.
#[derive(Debug)]
pub struct LookupSequencer<T> {
    latest: u64,
    applied: u64,
    current: Option<LookupOutcome<T>>,
}

impl<T> Default for LookupSequencer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LookupSequencer<T> {
    pub fn new() -> Self {
        Self {
            latest: 0,
            applied: 0,
            current: None,
        }
    }

    /// Issue the token for a new lookup, superseding any in flight
    pub fn begin(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// A request has been issued whose response has not been applied yet
    pub fn is_loading(&self) -> bool {
        self.latest > self.applied
    }

    /// Apply `outcome` if `token` belongs to the latest, not yet applied request
    pub fn complete(&mut self, token: RequestToken, outcome: LookupOutcome<T>) -> Completion {
        if token.0 != self.latest || token.0 <= self.applied {
            return Completion::Stale;
        }
        self.applied = token.0;
        self.current = Some(outcome);
        Completion::Applied
    }

    /// Outcome of the most recent applied lookup
    pub fn current(&self) -> Option<&LookupOutcome<T>> {
        self.current.as_ref()
    }
}

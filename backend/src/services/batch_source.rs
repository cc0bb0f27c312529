//! Data-access capability for herb batches
//!
//! The dashboard depends only on [`BatchSource`]. Which implementation backs
//! it (direct database query or the batch API) is decided once in `main`.

use crate::error::AppResult;
use crate::models::BatchRecord;

/// Read-only access to the batch store
#[axum::async_trait]
pub trait BatchSource: Send + Sync {
    /// Short name for logs and health output
    fn name(&self) -> &'static str;

    /// Fetch every batch, oldest first. Fails on any transport error.
    async fn fetch_all_batches(&self) -> AppResult<Vec<BatchRecord>>;

    /// Fetch one batch. `Ok(None)` means the batch does not exist.
    async fn fetch_batch_by_id(&self, batch_id: &str) -> AppResult<Option<BatchRecord>>;
}

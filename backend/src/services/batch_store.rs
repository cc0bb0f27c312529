//! PostgreSQL-backed batch source

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};

use crate::error::AppResult;
use crate::models::{find_batch, parse_batch, BatchRecord, LookupError};
use crate::services::batch_source::BatchSource;

/// Reads batches straight from the `herb_batches` table
#[derive(Clone)]
pub struct PgBatchStore {
    db: PgPool,
}

/// Row shape of `herb_batches`
#[derive(Debug, FromRow)]
struct BatchRow {
    batch_id: String,
    species: Option<String>,
    farmer_id: Option<String>,
    cultivation_location: Option<String>,
    harvest_date: Option<NaiveDate>,
    current_owner: Option<String>,
    owner_history: Option<serde_json::Value>,
    processing_steps: Option<serde_json::Value>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<BatchRow> for BatchRecord {
    /// Rows go through the same lenient decoding as API payloads, so both
    /// sources produce identical records.
    fn from(row: BatchRow) -> Self {
        let payload = json!({
            "batch_id": row.batch_id,
            "species": row.species,
            "farmer_id": row.farmer_id,
            "cultivation_location": row.cultivation_location,
            "harvest_date": row.harvest_date.map(|d| d.format("%Y-%m-%d").to_string()),
            "current_owner": row.current_owner,
            "owner_history": row.owner_history,
            "processing_steps": row.processing_steps,
            "created_at": row.created_at.map(|t| t.to_rfc3339()),
            "updated_at": row.updated_at.map(|t| t.to_rfc3339()),
        });
        parse_batch(payload).unwrap_or_default()
    }
}

const SELECT_BATCHES: &str = r#"
    SELECT batch_id, species, farmer_id, cultivation_location, harvest_date,
           current_owner, owner_history, processing_steps, created_at, updated_at
    FROM herb_batches
"#;

impl PgBatchStore {
    /// Create a new PgBatchStore instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[axum::async_trait]
impl BatchSource for PgBatchStore {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn fetch_all_batches(&self) -> AppResult<Vec<BatchRecord>> {
        let query = format!(
            "{} ORDER BY created_at ASC NULLS FIRST, batch_id ASC",
            SELECT_BATCHES
        );

        let rows = sqlx::query_as::<_, BatchRow>(&query)
            .fetch_all(&self.db)
            .await?;

        tracing::debug!(count = rows.len(), "Loaded batches from database");

        Ok(rows.into_iter().map(BatchRecord::from).collect())
    }

    async fn fetch_batch_by_id(&self, batch_id: &str) -> AppResult<Option<BatchRecord>> {
        let query = format!("{} WHERE batch_id = $1", SELECT_BATCHES);

        // All matches are fetched so that duplicate ids surface as an error
        let records: Vec<BatchRecord> = sqlx::query_as::<_, BatchRow>(&query)
            .bind(batch_id)
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(BatchRecord::from)
            .collect();

        match find_batch(&records, batch_id) {
            Ok(record) => Ok(Some(record.clone())),
            Err(LookupError::NotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

//! Dashboard service
//!
//! Fetches one batch snapshot per call and runs the shared analytics over it.
//! Lookups go through the batch source directly so a single batch can be
//! served without loading the full list.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::{
    build_dashboard, compliance_metrics, derived_stats, describe_batch, duplicate_batch_ids,
    group_by_species, monthly_flow, summarize, validate_batch_id, ActivitySummary,
    BatchDetailView, BatchRecord, ComplianceMetric, DashboardStats, DashboardView, MonthlyFlow,
    SpeciesCount,
};
use crate::services::batch_source::BatchSource;

/// Dashboard service
#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn BatchSource>,
}

impl DashboardService {
    /// Create a new DashboardService instance
    pub fn new(source: Arc<dyn BatchSource>) -> Self {
        Self { source }
    }

    /// Fetch the current batch list
    async fn snapshot(&self) -> AppResult<Vec<BatchRecord>> {
        let records = self.source.fetch_all_batches().await?;

        for duplicate in duplicate_batch_ids(&records) {
            tracing::warn!(
                batch_id = %duplicate.batch_id,
                occurrences = duplicate.occurrences,
                "Batch id appears more than once in the snapshot"
            );
        }

        tracing::debug!(
            source = self.source.name(),
            count = records.len(),
            "Fetched batch snapshot"
        );

        Ok(records)
    }

    /// Get every dashboard view
    pub async fn get_dashboard(&self) -> AppResult<DashboardView> {
        let records = self.snapshot().await?;
        Ok(build_dashboard(&records))
    }

    /// Get batch counts per species
    pub async fn get_species_distribution(&self) -> AppResult<Vec<SpeciesCount>> {
        let records = self.snapshot().await?;
        Ok(group_by_species(&records))
    }

    /// Get batch counts per calendar month
    pub async fn get_monthly_flow(&self) -> AppResult<[MonthlyFlow; 12]> {
        let records = self.snapshot().await?;
        Ok(monthly_flow(&records))
    }

    /// Get the compliance percentages
    pub async fn get_compliance(&self) -> AppResult<[ComplianceMetric; 3]> {
        let records = self.snapshot().await?;
        Ok(compliance_metrics(&records))
    }

    /// Get headline counters and the recent activity feed
    pub async fn get_activity(&self) -> AppResult<ActivitySummary> {
        let records = self.snapshot().await?;
        Ok(summarize(&records))
    }

    /// Get peak-month throughput and the farmer/batch ratio
    pub async fn get_stats(&self) -> AppResult<DashboardStats> {
        let records = self.snapshot().await?;
        Ok(derived_stats(&records))
    }

    /// Look up one batch by exact id
    pub async fn find_batch(&self, batch_id: &str) -> AppResult<BatchDetailView> {
        validate_batch_id(batch_id).map_err(|msg| AppError::ValidationError(msg.to_string()))?;

        match self.source.fetch_batch_by_id(batch_id).await? {
            Some(record) => Ok(describe_batch(&record)),
            None => {
                tracing::debug!(batch_id, source = self.source.name(), "Batch not found");
                Err(AppError::NotFound(format!("Batch {}", batch_id)))
            }
        }
    }

    /// Export rows to CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}

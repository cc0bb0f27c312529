//! HTTP handlers for single-batch lookup

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::BatchDetailView,
    services::DashboardService,
    AppState,
};

/// Get one batch with its custody chain and processing steps
pub async fn get_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<String>,
) -> AppResult<Json<BatchDetailView>> {
    let service = DashboardService::new(state.source.clone());
    let detail = service.find_batch(&batch_id).await?;
    Ok(Json(detail))
}

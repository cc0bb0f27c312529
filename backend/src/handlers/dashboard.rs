//! Dashboard handlers for analytics views and CSV export

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::{ActivitySummary, DashboardStats, DashboardView};
use crate::services::DashboardService;
use crate::AppState;

#[derive(Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>, // "json" or "csv"
}

impl ExportQuery {
    fn wants_csv(&self) -> bool {
        self.format
            .as_deref()
            .map_or(false, |f| f.eq_ignore_ascii_case("csv"))
    }
}

/// Render rows as JSON, or as a CSV attachment when requested
fn respond<T: Serialize>(query: &ExportQuery, rows: &[T], filename: &str) -> AppResult<Response> {
    if query.wants_csv() {
        let csv = DashboardService::export_to_csv(rows)?;
        let disposition = format!("attachment; filename=\"{}\"", filename);
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(rows).into_response())
    }
}

/// Get every dashboard view from one snapshot
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardView>> {
    let service = DashboardService::new(state.source.clone());
    let view = service.get_dashboard().await?;
    Ok(Json(view))
}

/// Get the species distribution
pub async fn get_species_distribution(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> AppResult<Response> {
    let service = DashboardService::new(state.source.clone());
    let data = service.get_species_distribution().await?;
    respond(&query, &data, "species_distribution.csv")
}

/// Get the monthly batch flow
pub async fn get_monthly_flow(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> AppResult<Response> {
    let service = DashboardService::new(state.source.clone());
    let data = service.get_monthly_flow().await?;
    respond(&query, &data, "monthly_flow.csv")
}

/// Get the compliance metrics
pub async fn get_compliance(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> AppResult<Response> {
    let service = DashboardService::new(state.source.clone());
    let data = service.get_compliance().await?;
    respond(&query, &data, "compliance.csv")
}

/// Get headline counters and recent activity
pub async fn get_activity(State(state): State<AppState>) -> AppResult<Json<ActivitySummary>> {
    let service = DashboardService::new(state.source.clone());
    let summary = service.get_activity().await?;
    Ok(Json(summary))
}

/// Get the derived dashboard percentages
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let service = DashboardService::new(state.source.clone());
    let stats = service.get_stats().await?;
    Ok(Json(stats))
}

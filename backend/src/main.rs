//! AyurChain Supply-Chain Dashboard - Backend Server
//!
//! Read-only analytics over herb batches: species distribution, monthly
//! flow, compliance percentages, recent activity and single-batch lookup.

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod models;
mod routes;
mod services;

pub use config::Config;

use config::DataSourceKind;
use error::AppError;
use external::HttpBatchSource;
use services::{BatchSource, PgBatchStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn BatchSource>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Load configuration
    let config = config::Config::load()?;
    config.validate()?;

    tracing::info!("Starting AyurChain Dashboard Server");
    tracing::info!("Environment: {}", config.environment);

    let source = build_batch_source(&config).await?;
    tracing::info!("Batch source: {}", source.name());

    // Create application state
    let state = AppState {
        source,
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize tracing, with JSON output when `AYUR_LOG_FORMAT=json`
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ayurchain_server=debug,tower_http=debug,sqlx=warn".into());

    let json = std::env::var("AYUR_LOG_FORMAT").map_or(false, |f| f == "json");
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Select the batch source named by `data_source.kind`
async fn build_batch_source(config: &Config) -> anyhow::Result<Arc<dyn BatchSource>> {
    match config.data_source.kind {
        DataSourceKind::Database => {
            let url = config.database.url.as_deref().ok_or_else(|| {
                AppError::Configuration("database.url is not set".to_string())
            })?;

            tracing::info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
                .connect(url)
                .await?;
            tracing::info!("Database connection established");

            // Run migrations in development
            if config.environment == "development" {
                tracing::info!("Running database migrations...");
                sqlx::migrate!("./migrations").run(&db_pool).await?;
                tracing::info!("Migrations completed");
            }

            Ok(Arc::new(PgBatchStore::new(db_pool)))
        }
        DataSourceKind::Http => {
            tracing::info!("Using batch API at {}", config.batch_api.base_url);
            Ok(Arc::new(HttpBatchSource::new(&config.batch_api)?))
        }
    }
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "AyurChain Supply-Chain Dashboard API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::models::parse_batch_list;
    use crate::services::batch_source::testing::InMemoryBatchSource;

    fn test_config() -> Config {
        Config::defaults("test")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    fn app_with(source: InMemoryBatchSource) -> Router {
        create_app(AppState {
            source: Arc::new(source),
            config: Arc::new(test_config()),
        })
    }

    fn app() -> Router {
        let records = parse_batch_list(json!([
            {
                "batchID": "AYU-1",
                "species": "Tulsi",
                "farmerID": "F1",
                "createdAt": "2024-01-15T09:30:00Z",
                "ownerHistory": [{"owner": "F1", "timestamp": "2024-01-15T09:30:00Z"}]
            },
            {"batch_id": "AYU-2", "species": "Neem", "farmer_id": "F2"}
        ]))
        .unwrap();
        app_with(InMemoryBatchSource::new(records))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = get(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_liveness() {
        let (status, body) = get(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn test_api_health_reports_source() {
        let (status, body) = get_json(app(), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data_source"], "memory");
        assert_eq!(body["environment"], "test");
    }

    #[tokio::test]
    async fn test_dashboard_endpoint() {
        let (status, body) = get_json(app(), "/api/v1/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["total_batches"], 2);
        assert_eq!(body["summary"]["distinct_farmers"], 2);
        assert_eq!(body["monthly_flow"].as_array().unwrap().len(), 12);
        assert_eq!(body["monthly_flow"][0]["batch_count"], 1);
        assert_eq!(body["compliance"][0]["percent"], 50);
        assert_eq!(body["stats"]["peak_month_throughput"], 50);
        assert_eq!(body["stats"]["farmer_batch_ratio"], 100);
    }

    #[tokio::test]
    async fn test_stats_endpoint_on_empty_snapshot() {
        let (status, body) =
            get_json(app_with(InMemoryBatchSource::new(Vec::new())), "/api/v1/dashboard/stats")
                .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["peak_month_throughput"], 0);
        assert_eq!(body["farmer_batch_ratio"], 0);
    }

    #[tokio::test]
    async fn test_species_csv_export() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/dashboard/species?format=csv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"name,count\nTulsi,1\nNeem,1\n");
    }

    #[tokio::test]
    async fn test_batch_lookup() {
        let (status, body) = get_json(app(), "/api/v1/batches/AYU-1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["batch_id"], "AYU-1");
        assert_eq!(body["owner_history"][0]["owner"], "F1");
    }

    #[tokio::test]
    async fn test_batch_lookup_not_found() {
        let (status, body) = get_json(app(), "/api/v1/batches/X").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["retryable"], false);
    }

    #[tokio::test]
    async fn test_blank_batch_id_rejected() {
        let (status, body) = get_json(app(), "/api/v1/batches/%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Please enter a batch ID");
    }

    #[tokio::test]
    async fn test_transport_failure_is_bad_gateway() {
        let (status, body) =
            get_json(app_with(InMemoryBatchSource::failing()), "/api/v1/dashboard").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["retryable"], true);
    }
}

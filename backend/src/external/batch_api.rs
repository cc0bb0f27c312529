//! Batch API client
//!
//! Fetches herb batches from the AyurChain batch service
//! (`GET /api/batches`, `GET /api/batches/{id}`). Requests are single-shot:
//! a failure is reported to the caller immediately, without retries.

use std::time::Duration;

use reqwest::{header::CACHE_CONTROL, Client, StatusCode, Url};
use serde_json::Value;

use crate::config::BatchApiConfig;
use crate::error::{AppError, AppResult};
use crate::models::{parse_batch, parse_batch_list, BatchRecord};
use crate::services::batch_source::BatchSource;

/// HTTP-backed batch source
#[derive(Clone)]
pub struct HttpBatchSource {
    client: Client,
    base_url: Url,
}

impl HttpBatchSource {
    /// Create a new HttpBatchSource from configuration
    pub fn new(config: &BatchApiConfig) -> AppResult<Self> {
        Self::with_timeout(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Create a new HttpBatchSource with an explicit timeout (for testing)
    pub fn with_timeout(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            AppError::Configuration(format!("Invalid batch API URL {}: {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Configuration(format!(
                "Batch API URL {} cannot carry a path",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json(&self, url: Url) -> AppResult<(StatusCode, Option<Value>)> {
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Ok((status, None));
        }

        let payload = response.json::<Value>().await.map_err(|e| {
            AppError::TransportFailure(format!("Failed to parse batch API response: {}", e))
        })?;

        Ok((status, Some(payload)))
    }
}

#[axum::async_trait]
impl BatchSource for HttpBatchSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_all_batches(&self) -> AppResult<Vec<BatchRecord>> {
        let url = self.endpoint(&["api", "batches"]);

        match self.get_json(url).await? {
            (_, Some(payload)) => {
                let records = parse_batch_list(payload)?;
                tracing::debug!(count = records.len(), "Fetched batches from batch API");
                Ok(records)
            }
            (status, None) => Err(AppError::TransportFailure(format!(
                "Failed to fetch batches: {}",
                status
            ))),
        }
    }

    async fn fetch_batch_by_id(&self, batch_id: &str) -> AppResult<Option<BatchRecord>> {
        let url = self.endpoint(&["api", "batches", batch_id]);

        match self.get_json(url).await? {
            (_, Some(payload)) => Ok(Some(parse_batch(payload)?)),
            (StatusCode::NOT_FOUND, None) => {
                tracing::debug!(batch_id, "Batch API reported no such batch");
                Ok(None)
            }
            (status, None) => Err(AppError::TransportFailure(format!(
                "Failed to fetch batch: {}",
                status
            ))),
        }
    }
}

use serde_json::Value;
use std::time::Duration;
use tariff_core::{normalize_countries, Normalized};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DataSource;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(12);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("could not read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("invalid dataset: {0}")]
    Body(String),
}

pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()
}

/// Fetches the raw dataset. No retries.
pub async fn fetch_dataset(
    client: &reqwest::Client,
    source: &DataSource,
) -> Result<Value, FetchError> {
    let body = match source {
        DataSource::Url(url) => {
            debug!(%url, "fetching dataset");
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            response
                .text()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?
        }
        DataSource::File(path) => {
            debug!(path = %path.display(), "reading dataset");
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| FetchError::Read {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?
        }
    };

    serde_json::from_str(&body).map_err(|e| FetchError::Body(e.to_string()))
}

/// Fetches and normalizes. The error is the page-level message.
pub async fn load_dataset(
    client: &reqwest::Client,
    source: &DataSource,
) -> Result<Normalized, String> {
    let raw = fetch_dataset(client, source).await.map_err(|e| {
        warn!(source = %source.describe(), error = %e, "dataset fetch failed");
        e.to_string()
    })?;

    let normalized = normalize_countries(&raw).map_err(|e| {
        warn!(error = %e, "dataset rejected");
        e.to_string()
    })?;

    info!(
        source = %source.describe(),
        countries = normalized.records.len(),
        dropped = normalized.dropped.len(),
        "dataset loaded"
    );
    Ok(normalized)
}

//! BoardGameGeek XML API2 client.
//!
//! BGG requires no credentials. Both endpoints answer in XML:
//! - `/search?query=..&type=boardgame` for candidate ids
//! - `/thing?id=1,2,3` for full records, many ids per call

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::parser::{parse_search_response, parse_thing_response};
use super::types::{GameRecord, GameSummary};
use super::{BoardGameCatalog, CatalogError};
use crate::config::BggConfig;
use crate::metrics::{EXTERNAL_SERVICE_DURATION, EXTERNAL_SERVICE_REQUESTS};

const SERVICE_LABEL: &str = "bgg";

/// BGG XML API2 client.
pub struct BggClient {
    client: Client,
    base_url: String,
}

impl BggClient {
    /// Create a new BGG client from configuration.
    pub fn new(config: &BggConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| CatalogError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the search URL for a free-text query.
    fn build_search_url(&self, query: &str) -> String {
        format!(
            "{}/search?query={}&type=boardgame",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    /// Build the batch detail URL for a list of ids.
    fn build_thing_url(&self, ids: &[u64]) -> String {
        let ids = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!("{}/thing?id={}", self.base_url, ids)
    }

    /// GET a URL and return the body text, classifying failures.
    async fn fetch(&self, url: &str, operation: &str) -> Result<String, CatalogError> {
        let start = Instant::now();
        let result = self.fetch_inner(url).await;

        EXTERNAL_SERVICE_DURATION
            .with_label_values(&[SERVICE_LABEL, operation])
            .observe(start.elapsed().as_secs_f64());
        let status = if result.is_ok() { "success" } else { "error" };
        EXTERNAL_SERVICE_REQUESTS
            .with_label_values(&[SERVICE_LABEL, operation, status])
            .inc();

        if let Err(ref e) = result {
            warn!(operation = operation, error = %e, "BGG request failed");
        }
        result
    }

    async fn fetch_inner(&self, url: &str) -> Result<String, CatalogError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Unavailable {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        response.text().await.map_err(classify_transport_error)
    }
}

fn classify_transport_error(e: reqwest::Error) -> CatalogError {
    if e.is_timeout() {
        CatalogError::Timeout
    } else {
        CatalogError::Transport(e.to_string())
    }
}

#[async_trait]
impl BoardGameCatalog for BggClient {
    async fn search(&self, query: &str) -> Result<Vec<GameSummary>, CatalogError> {
        debug!(query = query, "BGG search");
        let body = self.fetch(&self.build_search_url(query), "search").await?;
        Ok(parse_search_response(&body))
    }

    async fn fetch_details(&self, ids: &[u64]) -> Result<Vec<GameRecord>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        debug!(ids = ?ids, "BGG thing lookup");
        let body = self.fetch(&self.build_thing_url(ids), "thing").await?;
        Ok(parse_thing_response(&body))
    }
}

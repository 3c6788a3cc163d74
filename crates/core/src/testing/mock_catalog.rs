//! Mock board game catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::bgg::{BoardGameCatalog, CatalogError, GameRecord, GameSummary};

/// A recorded catalog call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Search { query: String },
    FetchDetails { ids: Vec<u64> },
}

/// Mock implementation of the BoardGameCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return a fixed list of search hits for every query
/// - Serve detail records by id, in requested order
/// - Track calls for assertions
/// - Simulate failures per operation
#[derive(Debug, Default)]
pub struct MockBoardGameCatalog {
    /// Hits returned by every search.
    search_results: Arc<RwLock<Vec<GameSummary>>>,
    /// Detail records by BGG id.
    records: Arc<RwLock<HashMap<u64, GameRecord>>>,
    /// Recorded calls.
    calls: Arc<RwLock<Vec<RecordedCall>>>,
    /// Error returned by every search while set.
    search_error: Arc<RwLock<Option<CatalogError>>>,
    /// Error returned by every detail lookup while set.
    details_error: Arc<RwLock<Option<CatalogError>>>,
}

impl MockBoardGameCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hits returned by search.
    pub async fn set_search_results(&self, results: Vec<GameSummary>) {
        *self.search_results.write().await = results;
    }

    /// Add a detail record.
    pub async fn add_record(&self, record: GameRecord) {
        self.records
            .write()
            .await
            .insert(record.upstream_id, record);
    }

    /// Add several detail records.
    pub async fn add_records(&self, records: Vec<GameRecord>) {
        let mut map = self.records.write().await;
        for record in records {
            map.insert(record.upstream_id, record);
        }
    }

    /// Make every search fail with `error`.
    pub async fn set_search_error(&self, error: CatalogError) {
        *self.search_error.write().await = Some(error);
    }

    /// Make every detail lookup fail with `error`.
    pub async fn set_details_error(&self, error: CatalogError) {
        *self.details_error.write().await = Some(error);
    }

    /// Clear injected errors.
    pub async fn clear_errors(&self) {
        *self.search_error.write().await = None;
        *self.details_error.write().await = None;
    }

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    async fn record(&self, call: RecordedCall) {
        self.calls.write().await.push(call);
    }
}

#[async_trait]
impl BoardGameCatalog for MockBoardGameCatalog {
    async fn search(&self, query: &str) -> Result<Vec<GameSummary>, CatalogError> {
        self.record(RecordedCall::Search {
            query: query.to_string(),
        })
        .await;

        if let Some(error) = self.search_error.read().await.clone() {
            return Err(error);
        }

        Ok(self.search_results.read().await.clone())
    }

    async fn fetch_details(&self, ids: &[u64]) -> Result<Vec<GameRecord>, CatalogError> {
        self.record(RecordedCall::FetchDetails { ids: ids.to_vec() })
            .await;

        if let Some(error) = self.details_error.read().await.clone() {
            return Err(error);
        }

        let records = self.records.read().await;
        Ok(ids.iter().filter_map(|id| records.get(id).cloned()).collect())
    }
}

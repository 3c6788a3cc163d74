use std::sync::Arc;

use meeplelog_core::{Config, GameSearchService, GameStore, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    search: GameSearchService,
    store: Arc<dyn GameStore>,
}

impl AppState {
    pub fn new(config: Config, search: GameSearchService, store: Arc<dyn GameStore>) -> Self {
        Self {
            config,
            search,
            store,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn search(&self) -> &GameSearchService {
        &self.search
    }

    pub fn store(&self) -> &dyn GameStore {
        self.store.as_ref()
    }
}

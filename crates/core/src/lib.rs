pub mod bgg;
pub mod config;
pub mod games;
pub mod metrics;
pub mod search;
pub mod testing;

pub use bgg::{BggClient, BoardGameCatalog, CatalogError, GameRecord, GameSummary};
pub use config::{
    load_config, load_config_from_str, validate_config, BggConfig, Config, ConfigError,
    SanitizedConfig,
};
pub use games::{GameStats, GameStore, PersistedGame, SqliteGameStore, StoreError};
pub use search::{CacheResolver, GameSearchService, SearchError, SearchResultItem};

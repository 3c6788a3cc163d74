use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub bgg: BggConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("meeplelog.db")
}

/// BoardGameGeek XML API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BggConfig {
    /// XML API2 base URL (default: "https://boardgamegeek.com/xmlapi2")
    #[serde(default = "default_bgg_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Maximum number of search hits forwarded to the detail call (default: 10)
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// User-Agent sent with every upstream request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for BggConfig {
    fn default() -> Self {
        Self {
            base_url: default_bgg_base_url(),
            timeout_secs: default_timeout(),
            max_results: default_max_results(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_bgg_base_url() -> String {
    "https://boardgamegeek.com/xmlapi2".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_max_results() -> u32 {
    10
}

fn default_user_agent() -> String {
    format!("MeepleLog/{}", env!("CARGO_PKG_VERSION"))
}

/// Config view returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub bgg: SanitizedBggConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedBggConfig {
    pub base_url: String,
    pub timeout_secs: u32,
    pub max_results: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            bgg: SanitizedBggConfig {
                base_url: config.bgg.base_url.clone(),
                timeout_secs: config.bgg.timeout_secs,
                max_results: config.bgg.max_results,
            },
        }
    }
}

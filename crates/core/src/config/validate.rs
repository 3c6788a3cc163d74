use super::{types::Config, ConfigError};

/// Largest id batch the BGG `thing` endpoint accepts in a single call.
pub const MAX_BGG_BATCH: u32 = 20;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - BGG base URL is an http(s) URL
/// - BGG timeout is at least one second
/// - BGG max_results fits in one detail batch
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if !config.bgg.base_url.starts_with("http://") && !config.bgg.base_url.starts_with("https://")
    {
        return Err(ConfigError::ValidationError(format!(
            "bgg.base_url must be an http(s) URL, got '{}'",
            config.bgg.base_url
        )));
    }

    if config.bgg.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "bgg.timeout_secs must be at least 1".to_string(),
        ));
    }

    if config.bgg.max_results == 0 || config.bgg.max_results > MAX_BGG_BATCH {
        return Err(ConfigError::ValidationError(format!(
            "bgg.max_results must be between 1 and {}",
            MAX_BGG_BATCH
        )));
    }

    Ok(())
}

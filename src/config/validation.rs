use crate::constants::concurrency::MAX_CONCURRENT_REQUESTS;
use crate::data_fetcher::api::parse_timezone;
use crate::data_fetcher::models::League;
use crate::error::AppError;
use std::collections::HashSet;
use std::path::Path;

use super::{CacheConfig, Config};

/// Validates the configuration settings
///
/// # Validation Rules
/// - API key cannot be empty
/// - Base URL must be an http(s) URL
/// - Timezone must be a known IANA identifier
/// - Concurrency must be between 1 and the provider's limit
/// - HTTP timeout, cache TTLs and capacities must be non-zero
/// - Inline leagues must have positive, unique ids
/// - If log file path is provided, its parent directory must exist or be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    if config.api_key.trim().is_empty() {
        return Err(AppError::config_error(format!(
            "API key cannot be empty. Set api_key in the config file or the {} environment variable",
            crate::constants::env_vars::API_KEY
        )));
    }

    validate_base_url(&config.api_base_url)?;
    parse_timezone(&config.timezone)?;

    if config.max_concurrent_requests == 0 || config.max_concurrent_requests > MAX_CONCURRENT_REQUESTS {
        return Err(AppError::config_error(format!(
            "max_concurrent_requests must be between 1 and {MAX_CONCURRENT_REQUESTS}, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error("http_timeout_seconds must be at least 1"));
    }

    validate_cache(&config.cache)?;
    validate_leagues(&config.leagues)?;

    if let Some(log_path) = &config.log_file_path {
        validate_log_path(log_path)?;
    }

    Ok(())
}

fn validate_base_url(url: &str) -> Result<(), AppError> {
    if url.is_empty() {
        return Err(AppError::config_error("API base URL cannot be empty"));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(AppError::config_error(format!(
            "API base URL must start with http:// or https://, got '{url}'"
        )));
    }
    Ok(())
}

fn validate_cache(cache: &CacheConfig) -> Result<(), AppError> {
    if cache.fixture_ttl_seconds == 0 || cache.prediction_ttl_seconds == 0 {
        return Err(AppError::config_error("Cache TTLs must be at least 1 second"));
    }
    if cache.fixture_capacity == 0 || cache.prediction_capacity == 0 {
        return Err(AppError::config_error("Cache capacities must be at least 1"));
    }
    if let Some(path) = &cache.persistent_path
        && path.trim().is_empty()
    {
        return Err(AppError::config_error("cache.persistent_path cannot be empty"));
    }
    Ok(())
}

/// Checks a league list for non-positive or repeated ids.
pub fn validate_leagues(leagues: &[League]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for league in leagues {
        if league.id <= 0 {
            return Err(AppError::config_error(format!(
                "League '{}' has invalid id {}",
                league.name, league.id
            )));
        }
        if !seen.insert(league.id) {
            return Err(AppError::config_error(format!(
                "League id {} is listed more than once",
                league.id
            )));
        }
    }
    Ok(())
}

fn validate_log_path(log_path: &str) -> Result<(), AppError> {
    if log_path.is_empty() {
        return Err(AppError::config_error("Log file path cannot be empty"));
    }

    // Check if parent directory exists or can be created
    if let Some(parent) = Path::new(log_path).parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::config_error(format!(
                "Cannot create log directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }
    Ok(())
}

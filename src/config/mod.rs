use crate::constants::{self, cache_capacity, cache_ttl, concurrency, env_vars, retry};
use crate::data_fetcher::models::League;
use crate::error::AppError;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;
use tracing::debug;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::{validate_config, validate_leagues};

/// Configuration structure for the application.
/// Loaded from an optional TOML file, then overridden from the environment.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the football data provider, including the scheme.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// API-Football key sent with every request.
    #[serde(default)]
    pub api_key: String,
    /// IANA timezone in which fixture dates and kickoff times are interpreted.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Chat bot token. Not used by the pipeline; kept for the bot layer.
    #[serde(default)]
    pub bot_token: Option<String>,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default)]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for API requests. Defaults to 30 seconds if not specified.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    /// Retries after the first attempt for transient upstream failures.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// JSON file holding the league allow-list; takes precedence over `leagues`.
    #[serde(default)]
    pub leagues_file: Option<String>,
    #[serde(default)]
    pub leagues: Vec<League>,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// `[cache]` table
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CacheConfig {
    #[serde(default = "default_fixture_ttl")]
    pub fixture_ttl_seconds: u64,
    #[serde(default = "default_prediction_ttl")]
    pub prediction_ttl_seconds: u64,
    #[serde(default = "default_fixture_capacity")]
    pub fixture_capacity: usize,
    #[serde(default = "default_prediction_capacity")]
    pub prediction_capacity: usize,
    /// JSON file mirroring both tiers across restarts. In-memory only when unset.
    #[serde(default)]
    pub persistent_path: Option<String>,
}

fn default_api_base_url() -> String {
    constants::DEFAULT_API_BASE_URL.to_string()
}

fn default_timezone() -> String {
    constants::DEFAULT_TIMEZONE.to_string()
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_max_concurrent_requests() -> usize {
    concurrency::DEFAULT_MAX_CONCURRENT_REQUESTS
}

fn default_retry_attempts() -> u32 {
    retry::DEFAULT_ATTEMPTS
}

fn default_fixture_ttl() -> u64 {
    cache_ttl::FIXTURES_SECONDS
}

fn default_prediction_ttl() -> u64 {
    cache_ttl::PREDICTIONS_SECONDS
}

fn default_fixture_capacity() -> usize {
    cache_capacity::FIXTURES
}

fn default_prediction_capacity() -> usize {
    cache_capacity::PREDICTIONS
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            fixture_ttl_seconds: default_fixture_ttl(),
            prediction_ttl_seconds: default_prediction_ttl(),
            fixture_capacity: default_fixture_capacity(),
            prediction_capacity: default_prediction_capacity(),
            persistent_path: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: default_api_base_url(),
            api_key: String::new(),
            timezone: default_timezone(),
            bot_token: None,
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
            max_concurrent_requests: default_max_concurrent_requests(),
            retry_attempts: default_retry_attempts(),
            leagues_file: None,
            leagues: Vec::new(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    ///
    /// # Environment Variables
    /// - `API_FOOTBALL_KEY` - Override API key
    /// - `API_FOOTBALL_BASE_URL` - Override base URL
    /// - `FORECAST_TIMEZONE` - Override timezone
    /// - `TELEGRAM_TOKEN` - Override bot token
    /// - `FORECAST_LOG_FILE` - Override log file path
    /// - `FORECAST_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    /// - `FORECAST_MAX_CONCURRENCY` - Override upstream concurrency
    /// - `FORECAST_CACHE_FILE` - Enable the persistent cache at this path
    pub async fn load() -> Result<Self, AppError> {
        Self::load_from(&get_config_path()).await
    }

    /// Loads configuration from `path`, applies environment overrides and
    /// validates the result. A missing file is not an error: defaults plus
    /// environment variables are used instead.
    pub async fn load_from(path: &str) -> Result<Self, AppError> {
        let mut config = if Path::new(path).exists() {
            debug!("Loading config from {}", path);
            Self::load_from_path(path).await?
        } else {
            debug!("No config file at {}, using defaults", path);
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Override with environment variables if present
    fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var(env_vars::API_KEY) {
            self.api_key = api_key;
        }

        if let Ok(base_url) = std::env::var(env_vars::API_BASE_URL) {
            self.api_base_url = base_url;
        }

        if let Ok(timezone) = std::env::var(env_vars::TIMEZONE) {
            self.timezone = timezone;
        }

        if let Ok(token) = std::env::var(env_vars::BOT_TOKEN) {
            self.bot_token = Some(token);
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }

        if let Some(limit) = std::env::var(env_vars::MAX_CONCURRENCY)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            self.max_concurrent_requests = limit;
        }

        if let Ok(cache_file) = std::env::var(env_vars::CACHE_FILE) {
            self.cache.persistent_path = Some(cache_file);
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Leagues the report covers: the leagues file if configured, otherwise
    /// the inline `[[leagues]]` list, otherwise the built-in defaults.
    pub async fn allowed_leagues(&self) -> Result<Vec<League>, AppError> {
        if let Some(path) = &self.leagues_file {
            return load_leagues_file(path).await;
        }

        if !self.leagues.is_empty() {
            return Ok(self.leagues.clone());
        }

        Ok(default_leagues())
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays the effective configuration to stdout. The API key and bot
    /// token are masked.
    pub async fn display(&self, config_path: &str) -> Result<(), AppError> {
        let log_dir = get_log_dir_path();
        let leagues = self.allowed_leagues().await?;

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        println!("{config_path}");
        if !Path::new(config_path).exists() {
            println!("(Not found, using defaults and environment)");
        }
        println!("────────────────────────────────────");
        println!("API Base URL:");
        println!("{}", self.api_base_url);
        println!("────────────────────────────────────");
        println!("API Key:");
        println!("{}", mask_secret(&self.api_key));
        println!("────────────────────────────────────");
        println!("Timezone:");
        println!("{}", self.timezone);
        println!("────────────────────────────────────");
        println!("HTTP Timeout / Concurrency / Retries:");
        println!(
            "{} seconds / {} requests / {} retries",
            self.http_timeout_seconds, self.max_concurrent_requests, self.retry_attempts
        );
        println!("────────────────────────────────────");
        println!("Cache:");
        println!(
            "fixtures {}s x {}, predictions {}s x {}",
            self.cache.fixture_ttl_seconds,
            self.cache.fixture_capacity,
            self.cache.prediction_ttl_seconds,
            self.cache.prediction_capacity
        );
        match &self.cache.persistent_path {
            Some(path) => println!("persistent file: {path}"),
            None => println!("persistent file: disabled"),
        }
        println!("────────────────────────────────────");
        println!("Leagues ({}):", leagues.len());
        for league in &leagues {
            println!("{:>5}  {} ({})", league.id, league.name, league.country);
        }
        println!("────────────────────────────────────");
        println!("Bot Token:");
        println!(
            "{}",
            self.bot_token.as_deref().map(mask_secret).unwrap_or_else(|| "(not set)".to_string())
        );
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &self.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/fixture_forecast.log");
            println!("(Default location)");
        }

        Ok(())
    }

    /// Loads configuration from a file without environment overrides or validation.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Reads a JSON array of `{id, name, country}` records.
pub async fn load_leagues_file(path: &str) -> Result<Vec<League>, AppError> {
    let content = fs::read_to_string(path).await.map_err(|e| {
        AppError::config_error(format!("Cannot read leagues file '{path}': {e}"))
    })?;
    let leagues: Vec<League> = serde_json::from_str(&content).map_err(|e| {
        AppError::config_error(format!("Leagues file '{path}' is not a valid league list: {e}"))
    })?;

    if leagues.is_empty() {
        return Err(AppError::config_error(format!(
            "Leagues file '{path}' contains no leagues"
        )));
    }
    validate_leagues(&leagues)?;
    debug!("Loaded {} leagues from {}", leagues.len(), path);
    Ok(leagues)
}

/// Built-in league list used when the config names none
pub fn default_leagues() -> Vec<League> {
    constants::DEFAULT_LEAGUES
        .iter()
        .map(|(id, name, country)| League::new(*id, *name, *country))
        .collect()
}

fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("****{visible}")
    }
}

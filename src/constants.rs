//! Application-wide constants and configuration values
//!
//! This module centralizes defaults for the upstream client, the cache tiers
//! and the environment variables that override the config file.

/// Default API-Football base URL
pub const DEFAULT_API_BASE_URL: &str = "https://v3.football.api-sports.io";

/// Header carrying the API-Football key
pub const API_KEY_HEADER: &str = "x-apisports-key";

/// Default IANA timezone used for fixture dates and kickoff formatting
pub const DEFAULT_TIMEZONE: &str = "Asia/Makassar";

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of idle connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 16;

/// Upstream fixture status filter: matches that have not started yet
pub const FIXTURE_STATUS_NOT_STARTED: &str = "NS";

/// Outbound request concurrency
pub mod concurrency {
    /// Default number of simultaneous upstream requests
    pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 5;

    /// Upper bound accepted by config validation; the provider throttles above this
    pub const MAX_CONCURRENT_REQUESTS: usize = 10;
}

/// Cache TTL (Time To Live) values in seconds
pub mod cache_ttl {
    /// Fixture schedules rarely change during a day (6 hours)
    pub const FIXTURES_SECONDS: u64 = 6 * 3600;

    /// Pre-match predictions shift as kickoff approaches (1 hour)
    pub const PREDICTIONS_SECONDS: u64 = 3600;
}

/// Cache capacities (entries per tier)
pub mod cache_capacity {
    /// Number of dates kept in the fixture tier
    pub const FIXTURES: usize = 32;

    /// Number of fixture ids kept in the prediction tier
    pub const PREDICTIONS: usize = 1000;
}

/// Environment variable names
pub mod env_vars {
    /// API-Football key
    pub const API_KEY: &str = "API_FOOTBALL_KEY";

    /// API base URL override
    pub const API_BASE_URL: &str = "API_FOOTBALL_BASE_URL";

    /// Timezone override (IANA identifier)
    pub const TIMEZONE: &str = "FORECAST_TIMEZONE";

    /// Chat bot token, passed through untouched
    pub const BOT_TOKEN: &str = "TELEGRAM_TOKEN";

    /// Log file path override
    pub const LOG_FILE: &str = "FORECAST_LOG_FILE";

    /// HTTP timeout override in seconds
    pub const HTTP_TIMEOUT: &str = "FORECAST_HTTP_TIMEOUT";

    /// Upstream concurrency override
    pub const MAX_CONCURRENCY: &str = "FORECAST_MAX_CONCURRENCY";

    /// Persistent cache file override
    pub const CACHE_FILE: &str = "FORECAST_CACHE_FILE";
}

/// Retry configuration
pub mod retry {
    /// Default number of retries after the first attempt
    pub const DEFAULT_ATTEMPTS: u32 = 2;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 250;

    /// Upper bound honoured for a server-provided Retry-After (seconds)
    pub const MAX_RETRY_AFTER_SECONDS: u64 = 30;
}

/// Leagues reported on when the config names none: (id, name, country)
pub const DEFAULT_LEAGUES: &[(i64, &str, &str)] = &[
    (39, "Premier League", "England"),
    (40, "Championship", "England"),
    (61, "Ligue 1", "France"),
    (71, "Serie A", "Brazil"),
    (78, "Bundesliga", "Germany"),
    (88, "Eredivisie", "Netherlands"),
    (94, "Primeira Liga", "Portugal"),
    (135, "Serie A", "Italy"),
    (140, "La Liga", "Spain"),
    (144, "Jupiler Pro League", "Belgium"),
    (203, "Süper Lig", "Turkey"),
    (253, "Major League Soccer", "USA"),
    (262, "Liga MX", "Mexico"),
];

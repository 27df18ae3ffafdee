pub mod date_logic;
pub mod fixtures_api;
pub mod http_client;
pub mod limiter;
pub mod predictions_api;
mod orchestrator;

// Re-export HTTP client utilities
pub use http_client::{ApiClient, create_http_client_with_timeout};
pub use limiter::{LimiterStats, RequestLimiter, RequestPermit};
// Re-export pipeline stages
pub use date_logic::{DayChoice, determine_target_date, parse_date_arg, parse_timezone, resolve_target_date};
pub use fixtures_api::list_fixtures;
pub use predictions_api::{enrich_fixtures, fetch_prediction};
// Re-export the pipeline entry point
pub use orchestrator::FixtureService;

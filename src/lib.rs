//! Football fixture forecast library
//!
//! Fetches the day's not-started fixtures from API-Football, keeps the
//! configured leagues, attaches the provider's prediction to every fixture
//! with bounded concurrency and caches the result in memory and optionally
//! on disk.
//!
//! # Examples
//!
//! ```rust,no_run
//! use fixture_forecast::{Config, FixtureService};
//! use fixture_forecast::error::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let service = FixtureService::from_config(&config).await?;
//!
//!     let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//!     for fixture in service.get_enriched_fixtures(date).await? {
//!         println!("{} vs {}", fixture.home_team, fixture.away_team);
//!     }
//!
//!     service.close().await;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod logging;
pub mod report;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use data_fetcher::api::FixtureService;
pub use data_fetcher::models::{Fixture, League, Prediction, PredictionDetails};
pub use error::AppError;

// Re-export cache monitoring types for external tools
pub use data_fetcher::cache::{CacheInfo, CacheStats};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

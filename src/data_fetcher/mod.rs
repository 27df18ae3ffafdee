pub mod api;
pub mod cache;
pub mod league_filter;
pub mod models;

pub use api::{FixtureService, determine_target_date, parse_date_arg};
pub use league_filter::{LeagueAllowSet, filter_fixtures};
pub use models::{Fixture, League, Prediction};

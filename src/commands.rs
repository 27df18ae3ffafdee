use crate::cli::Args;
use crate::config::Config;
use crate::data_fetcher::FixtureService;
use crate::data_fetcher::api::{DayChoice, determine_target_date, parse_date_arg, parse_timezone};
use crate::error::AppError;
use crate::report::{build_rows, render_table, write_csv};
use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::{error, info};

/// Picks the report date from `--date`, `--tomorrow` or today in `tz`.
pub fn resolve_date(args: &Args, tz: Tz) -> Result<NaiveDate, AppError> {
    match &args.date {
        Some(date) => parse_date_arg(date),
        None if args.tomorrow => Ok(determine_target_date(DayChoice::Tomorrow, tz)),
        None => Ok(determine_target_date(DayChoice::Today, tz)),
    }
}

/// Handles the --list-config command.
pub async fn handle_list_config_command(config: &Config, config_path: &str) -> Result<(), AppError> {
    config.display(config_path).await
}

/// Fetches the enriched fixtures for the requested date, prints the summary
/// table and writes the CSV report when `--csv` is given.
///
/// A pipeline failure is returned as an error, never as an empty report;
/// the caller shows it to the user.
pub async fn handle_report_command(
    args: &Args,
    service: &FixtureService,
    tz: Tz,
) -> Result<usize, AppError> {
    let date = resolve_date(args, tz)?;
    let date_str = date.format("%Y-%m-%d").to_string();

    let fixtures = match service.get_enriched_fixtures(date).await {
        Ok(fixtures) => fixtures,
        Err(e) => {
            error!("Failed to build report for {}: {}", date_str, e);
            return Err(e);
        }
    };

    let rows = build_rows(&fixtures, tz);
    if fixtures.is_empty() {
        println!("No upcoming fixtures in the configured leagues for {date_str}");
    } else {
        print!("{}", render_table(&date_str, &rows, &fixtures));
    }

    if let Some(path) = &args.csv {
        write_csv(path, &rows).await?;
        info!("Wrote {} report rows to {}", rows.len(), path);
        println!("Report written to {path}");
    }

    Ok(rows.len())
}

/// Prints cache sizes, cached dates and limiter activity.
pub async fn handle_cache_stats_command(service: &FixtureService) {
    let stats = service.cache_stats().await;
    let limiter = service.limiter_stats();

    println!("\nCache Statistics");
    println!("────────────────────────────────────");
    println!(
        "Fixtures:    {}/{} dates",
        stats.fixture_cache.size, stats.fixture_cache.capacity
    );
    println!(
        "Predictions: {}/{} fixtures",
        stats.prediction_cache.size, stats.prediction_cache.capacity
    );
    println!(
        "Persistent:  {}",
        if stats.persistent { "enabled" } else { "disabled" }
    );
    let dates = service.cached_dates().await;
    if !dates.is_empty() {
        println!("Dates:       {}", dates.join(", "));
    }
    println!("────────────────────────────────────");
    println!(
        "Requests:    peak {} of {} concurrent",
        limiter.peak_in_flight, limiter.limit
    );
}

/// Runs one report: builds the service, optionally clears caches, produces
/// the report and statistics, and always closes the service before returning.
pub async fn run(args: &Args, config: &Config) -> Result<(), AppError> {
    let tz = parse_timezone(&config.timezone)?;
    let service = FixtureService::from_config(config).await?;

    if args.clear_cache {
        service.clear_caches().await;
        println!("Caches cleared.");
    }

    let result = handle_report_command(args, &service, tz).await;

    if args.cache_stats {
        handle_cache_stats_command(&service).await;
    }

    service.close().await;
    result.map(|count| info!("Report finished with {} fixtures", count))
}

use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Football fixture forecast report
///
/// Fetches the day's not-started fixtures from API-Football, keeps the
/// configured leagues, attaches the provider's prediction to each match and
/// prints a summary table. Use --csv to also write the full report.
#[derive(Parser, Debug, Default)]
#[command(about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Report on a specific date in YYYY-MM-DD format.
    /// If not provided, today's date in the configured timezone is used.
    #[arg(long = "date", short = 'd', help_heading = "Report", conflicts_with = "tomorrow")]
    pub date: Option<String>,

    /// Report on tomorrow's fixtures in the configured timezone.
    #[arg(long = "tomorrow", short = 't', help_heading = "Report")]
    pub tomorrow: bool,

    /// Write the full report as CSV to this path.
    #[arg(long = "csv", value_name = "PATH", help_heading = "Report")]
    pub csv: Option<String>,

    /// Clear fixture and prediction caches (including the persistent file) before running.
    #[arg(long = "clear-cache", help_heading = "Cache")]
    pub clear_cache: bool,

    /// Print cache statistics after the run.
    #[arg(long = "cache-stats", help_heading = "Cache")]
    pub cache_stats: bool,

    /// List current configuration settings and exit.
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Read configuration from this file instead of the default location.
    #[arg(long = "config", value_name = "PATH", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,

    /// Log only to the log file, not to the terminal.
    #[arg(long = "quiet", short = 'q', help_heading = "Debug")]
    pub quiet: bool,
}

// src/main.rs
use clap::Parser;
use fixture_forecast::cli::Args;
use fixture_forecast::config::Config;
use fixture_forecast::{commands, logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Configuration problems are fatal before anything else runs
    let config_path = args.config.clone().unwrap_or_else(Config::get_config_path);
    let config = match Config::load_from(&config_path).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if args.list_config {
        return match commands::handle_list_config_command(&config, &config_path).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    // The guard must be kept alive for the duration of the program
    let (log_file_path, _guard) = match logging::setup_logging(&args, &config).await {
        Ok(setup) => setup,
        Err(e) => {
            eprintln!("Failed to set up logging: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Logging to {}", log_file_path);

    match commands::run(&args, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

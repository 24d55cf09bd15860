//! Region Ping - server binary
//!
//! Loads configuration, installs logging and serves the streaming ping
//! endpoint until the process is stopped.

use clap::Parser;
use region_ping::{
    cli::Cli,
    config::{display_config_summary, load_config, validate_config, EnvManager},
    error::{AppError, Result},
    logging,
    regions::{StaticRegions, TargetProvider},
    server::{build_responder, run_server},
    PKG_NAME, VERSION,
};
use std::{path::Path, process};
use tracing::{info, warn};

#[actix_web::main]
async fn main() {
    // .env values must be in the environment before clap reads env-backed flags
    if let Err(e) = EnvManager::load_env_file() {
        exit_with(&e);
    }

    let cli = Cli::parse();

    if let Err(e) = run_application(cli).await {
        exit_with(&e);
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    if cli.env_help {
        println!("{}", EnvManager::display_env_help());
        return Ok(());
    }

    if cli.create_env {
        let path = Path::new(".env");
        if path.exists() {
            return Err(AppError::config(".env already exists, not overwriting it"));
        }
        EnvManager::save_example_env_file(path)?;
        println!("Example configuration written to {}", path.display());
        return Ok(());
    }

    let log_format = cli.log_format;
    let list_regions = cli.list_regions;
    let config = load_config(cli)?;

    if list_regions {
        for target in StaticRegions::from_config(&config).targets() {
            println!("{:<16} {}", target.code, target.name);
        }
        return Ok(());
    }

    logging::init(&config, log_format)?;

    info!(
        version = VERSION,
        commit = option_env!("GIT_COMMIT").unwrap_or("unknown"),
        built = option_env!("BUILD_TIME").unwrap_or("unknown"),
        "starting {}",
        PKG_NAME
    );
    for line in display_config_summary(&config).lines() {
        info!("{}", line);
    }

    for issue in EnvManager::validate_current_env() {
        warn!("{}", issue);
    }
    for warning in validate_config(&config)? {
        warn!("{}", warning.format());
    }

    let responder = build_responder(&config)?;
    run_server(&config, responder).await
}

fn exit_with(error: &AppError) -> ! {
    eprintln!("Error: {}", error);

    let suggestions = error.suggestions();
    if !suggestions.is_empty() {
        eprintln!();
        eprintln!("Suggestions:");
        for suggestion in suggestions {
            eprintln!("  - {}", suggestion);
        }
    }

    process::exit(error.exit_code());
}

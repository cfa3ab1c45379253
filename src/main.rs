use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::process::ExitCode;
use tracing::info;

use diaguard::cli::{self, Cli, Commands};
use diaguard::monitoring::{self, LogLevel, TelemetryConfig};
use diaguard::Settings;

fn main() -> Result<ExitCode> {
    // Load .env file
    dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::load(cli.config.as_deref())?.with_overrides(cli.overrides());

    let log_level: LogLevel = settings.log_level.parse().map_err(anyhow::Error::msg)?;
    monitoring::init_telemetry(&TelemetryConfig {
        enabled: true,
        log_level,
    });

    info!("DiaGuard starting up...");

    cli::run(cli.command.unwrap_or(Commands::Form), &settings)
}

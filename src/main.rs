use anyhow::{Context, Result};
use clap::Parser;
use cricsheet2stats_config::RuntimeConfig;
use std::path::PathBuf;
use tracing::info;

/// Aggregate ball-by-ball match records into player stats tables
#[derive(Parser)]
#[command(name = "cricsheet2stats")]
#[command(version)]
#[command(about = "Aggregate ball-by-ball match records into player stats tables", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory of match JSON documents (overrides config file)
    #[arg(short, long, value_name = "DIR")]
    matches: Option<PathBuf>,

    /// Output directory for the stats tables (overrides config file)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let mut config = if let Some(config_path) = &cli.config {
        RuntimeConfig::load_from_path(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        RuntimeConfig::load_or_default().context("Failed to load configuration")?
    };

    if let Some(matches) = &cli.matches {
        config.data.matches_dir = matches.to_string_lossy().to_string();
    }
    if let Some(output) = &cli.output {
        config.data.tables_dir = output.to_string_lossy().to_string();
    }

    let summary = cricsheet2stats::run(&config)?;
    info!(
        "done: {} matches -> {} season batting rows, {} season bowling rows, {} career players",
        summary.matches,
        summary.season_batting_rows,
        summary.season_bowling_rows,
        summary.career_batting_rows
    );

    Ok(())
}

fn init_tracing(level: Option<&str>) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_new(level.unwrap_or("info")).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .init();
}

//! EconData CLI — fetch IMF and World Bank indicators and export them as CSV.
//!
//! Commands:
//! - (none): run the pipeline with the built-in configuration
//! - `fetch`: run the pipeline, optionally from a TOML config file
//! - `config`: print the built-in configuration as TOML

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use econdata_core::data::{HttpTransport, StdoutProgress};
use econdata_core::{PipelineConfig, Source};
use econdata_runner::{Pipeline, RunOutcome, RunSummary};

const RULE_WIDTH: usize = 70;

#[derive(Parser)]
#[command(
    name = "econdata",
    version,
    about = "EconData CLI — IMF & World Bank economic data fetcher"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every configured indicator and export CSV files.
    Fetch {
        /// Path to a TOML config file. Defaults to the built-in configuration.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory for CSV files. Overrides the config value.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the built-in configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    match cli.command {
        None => run_fetch(None, None),
        Some(Commands::Fetch { config, output_dir }) => run_fetch(config, output_dir),
        Some(Commands::Config) => print_default_config(),
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default `info` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_fetch(config_path: Option<PathBuf>, output_dir: Option<PathBuf>) -> Result<()> {
    let mut config = match config_path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            PipelineConfig::from_file(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }

    print_banner(&config);

    let transport = HttpTransport::new(config.request_timeout())?;
    let pipeline = Pipeline::with_default_adapters(&config, Arc::new(transport));

    match pipeline.run(&StdoutProgress)? {
        RunOutcome::NoData => {}
        RunOutcome::Completed { summary, .. } => print_summary(&summary),
    }
    Ok(())
}

fn print_default_config() -> Result<()> {
    let toml = PipelineConfig::default().to_toml()?;
    print!("{toml}");
    Ok(())
}

fn print_banner(config: &PipelineConfig) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("{rule}");
    println!("IMF & World Bank Economic Data Fetcher");
    println!("{rule}");
    println!("Countries: {}", config.countries.len());
    println!("Time Period: {}-{}", config.years.start, config.years.end);
    println!("{} Indicators: {}", Source::Imf, config.imf.indicators.len());
    println!(
        "{} Indicators: {}",
        Source::WorldBank,
        config.world_bank.indicators.len()
    );
    println!("{rule}");
    println!();
}

fn print_summary(summary: &RunSummary) {
    let rule = "=".repeat(RULE_WIDTH);
    println!();
    println!("{rule}");
    println!("Summary Statistics");
    println!("{rule}");
    println!("{summary}");
    println!();
    println!("Data extraction complete!");
    println!("{rule}");
}

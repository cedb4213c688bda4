//! fxhist CLI — pull ten years of FX bar history from a trading terminal.
//!
//! Prompts for account credentials, connects through the terminal bridge,
//! and writes one CSV per (symbol, timeframe) under `mt5_historical_data/`.
//! Per-item failures are reported and skipped; only a failed login aborts.

mod prompt;

use anyhow::{Context, Result};
use clap::Parser;
use fxhist_core::{BridgeClient, BridgeConfig, ExtractionConfig, Extractor, StdoutProgress};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "fxhist",
    about = "Download historical OHLCV bars from a trading terminal to CSV",
    version
)]
struct Cli {
    /// Terminal bridge URL (overrides the config file).
    #[arg(long, env = "FXHIST_BRIDGE_URL")]
    endpoint: Option<String>,

    /// TOML file with bridge settings (endpoint, timeout_secs).
    #[arg(long)]
    bridge_config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, default_value_t = false)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    let bridge_config = load_bridge_config(&cli)?;
    let config = ExtractionConfig::default();

    print_banner(&config);
    let credentials = prompt::read_credentials()?;

    let client = BridgeClient::new(&bridge_config)
        .with_context(|| format!("failed to set up bridge client for {}", bridge_config.endpoint))?;
    log::debug!("using terminal bridge at {}", client.endpoint());

    let progress = StdoutProgress;
    let extractor = Extractor::new(&client, config, &progress);

    match extractor.run(&credentials) {
        Ok(summary) => {
            log::debug!(
                "{} of {} planned work items produced files",
                summary.written(),
                summary.planned
            );
            Ok(())
        }
        Err(e) => {
            if e.is_fatal() {
                println!(
                    "Please ensure the terminal and its bridge are running \
                     and the credentials are correct."
                );
            }
            Err(e.into())
        }
    }
}

fn load_bridge_config(cli: &Cli) -> Result<BridgeConfig> {
    let mut config = match &cli.bridge_config {
        Some(path) => BridgeConfig::from_file(path)?,
        None => BridgeConfig::default(),
    };
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    Ok(config)
}

fn print_banner(config: &ExtractionConfig) {
    let rule = "-".repeat(73);
    println!("{rule}");
    println!("MetaTrader 5 Historical Data Downloader");
    println!("{rule}");
    println!("Symbols:    {}", config.symbols.join(", "));
    println!(
        "Timeframes: {}",
        config
            .timeframes
            .iter()
            .map(|tf| tf.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "History:    {} days ending {}",
        config.history_days,
        chrono::Utc::now().format("%Y-%m-%d")
    );
    println!("Output:     {}/", config.output_dir.display());
    println!();
    println!("The terminal must be running before you continue.");
    println!("Credentials are used for this session only and are never stored.");
    println!("{rule}");
}

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast::error::RecvError;

use cortina_medals::api::Locale;
use cortina_medals::config::Config;
use cortina_medals::coordinator::CoordinatorEvent;
use cortina_medals::integration::{ConfigureOutcome, Integration};
use cortina_medals::logging::init_tracing;
use cortina_medals::sensor::SensorPlatform;
use cortina_medals::shutdown::wait_for_signal;

#[derive(Debug, Parser)]
#[command(name = "cortina-medals", version, about = "Milano Cortina 2026 medal standings sensors")]
struct Cli {
    /// Feed locale (ENG or FRA). Defaults to the config file value
    #[arg(long)]
    locale: Option<Locale>,

    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh period in seconds, overriding the config file
    #[arg(long)]
    interval: Option<u64>,

    /// Fetch once, print the sensor states and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = match Config::load_from(&path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    };
    if let Some(interval) = cli.interval {
        config.defaults.update_interval_seconds = interval;
        config.validate().context("invalid --interval")?;
    }
    let locale = cli.locale.unwrap_or(config.defaults.locale);

    let integration = Integration::new(config);
    let mut platform = match integration.configure(locale).await {
        Ok(ConfigureOutcome::Loaded(platform)) => platform,
        Ok(ConfigureOutcome::Aborted(reason)) => {
            eprintln!("Error: setup aborted: {}", reason.as_str());
            process::exit(1);
        }
        Ok(ConfigureOutcome::Rejected(error)) => {
            eprintln!("Error: {}", error.as_str());
            process::exit(1);
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    };

    print_states(&platform)?;

    if cli.once {
        integration.shutdown().await;
        return Ok(());
    }

    let mut events = platform.coordinator().subscribe();
    let signal = wait_for_signal();
    tokio::pin!(signal);

    loop {
        tokio::select! {
            result = &mut signal => {
                result.context("waiting for shutdown signal")?;
                break;
            }
            event = events.recv() => match event {
                Ok(CoordinatorEvent::Updated { generation }) => {
                    tracing::debug!(generation, "Publishing sensor states");
                    platform.sync();
                    print_states(&platform)?;
                }
                Ok(CoordinatorEvent::UpdateFailed { kind, message }) => {
                    tracing::warn!(%kind, %message, "Keeping last known standings");
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Missed coordinator events");
                    platform.sync();
                    print_states(&platform)?;
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    integration.shutdown().await;
    Ok(())
}

fn print_states(platform: &SensorPlatform) -> Result<()> {
    for state in platform.states() {
        println!("{}", serde_json::to_string(&state)?);
    }
    Ok(())
}

//! `strata` — resolve layered configuration and print the composed tree.
//!
//! One-shot by default; with `--watch` it keeps polling and prints every
//! refresh until interrupted.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use strata_client::{ConfigClient, ConfigEvent, LoadOptions, NoRemote, PropertyTree};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "strata", version, about = "Layered configuration resolver")]
struct Cli {
    /// Directory holding application.yml and its profile overlays
    #[arg(long, value_name = "DIR")]
    config_path: PathBuf,

    /// Active profile, repeatable; order is precedence order
    #[arg(long = "profile", value_name = "NAME")]
    profiles: Vec<String>,

    /// Directory holding bootstrap.yml (defaults to --config-path)
    #[arg(long, value_name = "DIR")]
    bootstrap_path: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "yaml")]
    format: Format,

    /// Log verbosity (overrides RUST_LOG)
    #[arg(long, value_name = "LEVEL")]
    level: Option<String>,

    /// Re-resolve every N seconds and print each refresh
    #[arg(long, value_name = "SECS")]
    watch: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_tree(tree: &PropertyTree, format: Format) -> anyhow::Result<()> {
    let rendered = match format {
        Format::Yaml => serde_yaml::to_string(tree).context("serializing config as YAML")?,
        Format::Json => {
            let mut out =
                serde_json::to_string_pretty(tree).context("serializing config as JSON")?;
            out.push('\n');
            out
        },
    };
    print!("{rendered}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.level.as_deref());

    let mut options = LoadOptions::new(cli.config_path.clone(), cli.profiles.clone());
    if let Some(path) = &cli.bootstrap_path {
        options = options.with_bootstrap_path(path);
    }
    if let Some(level) = &cli.level {
        options = options.with_level(level);
    }

    let client = ConfigClient::new(options, Arc::new(NoRemote))?;
    let config = client.load().await.context("initial resolution failed")?;
    print_tree(&config, cli.format)?;

    let Some(secs) = cli.watch else {
        return Ok(());
    };

    let mut events = client.subscribe();
    client.start_watch(Some(Duration::from_secs(secs)));
    info!(interval_secs = secs, "watching for configuration changes");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                client.end_watch();
                info!("watch ended");
                return Ok(());
            },
            event = events.recv() => {
                match event.as_deref() {
                    Some(ConfigEvent::Refreshed { config, .. }) => print_tree(config, cli.format)?,
                    Some(ConfigEvent::Failed { error, .. }) => {
                        tracing::warn!(%error, "resolution pass failed");
                    },
                    None => return Ok(()),
                }
            },
        }
    }
}

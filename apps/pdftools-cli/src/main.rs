//! pdftools binary

use clap::Parser;
use pdftools_cli::commands::{self, Command};
use pdftools_cli::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "pdftools")]
#[command(version, about = "Split, merge, rotate, compress and unlock PDFs via the transform backend")]
struct Args {
    /// Configuration file (default: ./pdftools.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the config file
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Request timeout in milliseconds, overrides the config file
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries command output only
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load(args.config.as_deref())?.with_overrides(args.backend, args.timeout_ms);
    tracing::debug!(backend = %config.backend.base_url, "Loaded configuration");

    commands::run(args.command, &config).await
}

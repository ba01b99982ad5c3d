//! confctl - Command-line client for Nacos-compatible configuration registries.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;
mod resource;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "confctl=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config_path = commands::config_path(cli.config.as_deref());

    match cli.command {
        Commands::Get(args) => commands::get::run(args, &config_path).await,
        Commands::Create(args) => commands::create::run(args, &config_path).await,
        Commands::Delete(args) => commands::delete::run(args, &config_path).await,
        Commands::Apply(args) => commands::apply::run(&args, &config_path).await,
        Commands::Context(args) => commands::context::run(&args, &config_path),
        Commands::Version => commands::version::run(&config_path).await,
    }
}

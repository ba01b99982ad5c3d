//! CLI commands and argument parsing.

pub mod apply;
pub mod context;
pub mod create;
pub mod delete;
pub mod get;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use confctl_client::{ClientConfig, RegistryClient};

use crate::config::CliConfig;

/// confctl - command-line client for Nacos-compatible configuration registries
#[derive(Parser)]
#[command(name = "confctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default is $HOME/.confctl.yaml)
    #[arg(long, global = true, env = "CONFCTL_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Display one or many resources
    Get(get::GetArgs),

    /// Create a resource
    #[command(visible_alias = "add")]
    Create(create::CreateArgs),

    /// Delete a resource
    Delete(delete::DeleteArgs),

    /// Apply resource manifests from a file or directory
    Apply(apply::ApplyArgs),

    /// Manage registry contexts in the config file
    Context(context::ContextArgs),

    /// Print client and server version information
    Version,
}

/// Resolves the config file path from the flag or the default location.
pub fn config_path(flag: Option<&Path>) -> PathBuf {
    flag.map_or_else(
        || CliConfig::default_path().unwrap_or_else(|_| PathBuf::from(".confctl.yaml")),
        Path::to_path_buf,
    )
}

/// Connects to the registry selected by the current context.
pub async fn connect(config_path: &Path) -> Result<RegistryClient> {
    let config = CliConfig::load(config_path)?;
    let server = config.current_server()?;
    tracing::debug!(context = %config.context, url = %server.url, "connecting to registry");
    let client_config = ClientConfig::new(&server.url, &server.user, &server.password);
    Ok(RegistryClient::connect(client_config).await?)
}

//! Version command: client build plus, when a context resolves, the
//! probed server version and API dialect.

use std::path::Path;

use anyhow::Result;

use crate::config::CliConfig;

/// Executes the version command.
///
/// The server probe is best effort: without a usable context only the
/// client version prints, and the command still succeeds.
pub async fn run(config_path: &Path) -> Result<()> {
    println!("Client version: {}", env!("CARGO_PKG_VERSION"));

    let config = CliConfig::load(config_path)?;
    if config.current_server().is_err() {
        return Ok(());
    }

    let mut client = super::connect(config_path).await?;
    let version = client.server_version().await?;
    println!("Server version: {version}");
    println!("API dialect: {}", client.api_version());
    Ok(())
}

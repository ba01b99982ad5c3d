//! Per-user CLI configuration: named registry contexts.
//!
//! Stored as YAML at `~/.confctl.yaml` unless overridden via `--config`
//! or `CONFCTL_CONFIG`:
//!
//! ```yaml
//! context: staging
//! servers:
//!   staging:
//!     url: http://nacos.staging:8848/nacos
//!     user: nacos
//!     password: secret
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Connection details for one named registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// Registry base URL.
    pub url: String,
    /// Login username.
    pub user: String,
    /// Login password.
    pub password: String,
}

/// The CLI configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Name of the currently selected server.
    #[serde(default)]
    pub context: String,

    /// All known servers, by name.
    #[serde(default)]
    pub servers: BTreeMap<String, Server>,
}

impl CliConfig {
    /// Returns the default config file location (`~/.confctl.yaml`).
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("cannot determine home directory")?;
        Ok(home.join(".confctl.yaml"))
    }

    /// Loads the config from `path`; a missing file yields the default
    /// (empty) configuration.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Writes the config back to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_yaml::to_string(self)?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Returns the server selected by the current context.
    pub fn current_server(&self) -> Result<&Server> {
        if self.context.is_empty() {
            bail!("no context set; add one with `confctl context add` and select it with `confctl context use`");
        }
        self.servers
            .get(&self.context)
            .with_context(|| format!("context {} names an unknown server", self.context))
    }

    /// Selects `name` as the current context.
    pub fn set_context(&mut self, name: &str) -> Result<()> {
        if !self.servers.contains_key(name) {
            bail!("server {name} not found");
        }
        self.context = name.to_string();
        Ok(())
    }

    /// Adds or replaces a named server.
    pub fn add_server(&mut self, name: &str, server: Server) {
        self.servers.insert(name.to_string(), server);
    }

    /// Removes a named server, clearing the context if it pointed there.
    pub fn delete_server(&mut self, name: &str) {
        self.servers.remove(name);
        if self.context == name {
            self.context.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CliConfig {
        let mut config = CliConfig::default();
        config.add_server(
            "dev",
            Server {
                url: "http://localhost:8848/nacos".to_string(),
                user: "nacos".to_string(),
                password: "nacos".to_string(),
            },
        );
        config.set_context("dev").unwrap();
        config
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let config = sample();
        config.save(&path).unwrap();
        assert_eq!(CliConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_set_context_rejects_unknown_server() {
        let mut config = sample();
        assert!(config.set_context("prod").is_err());
        assert_eq!(config.context, "dev");
    }

    #[test]
    fn test_delete_server_clears_matching_context() {
        let mut config = sample();
        config.delete_server("dev");
        assert!(config.context.is_empty());
        assert!(config.current_server().is_err());
    }

    #[test]
    fn test_current_server() {
        let config = sample();
        assert_eq!(config.current_server().unwrap().user, "nacos");
    }
}

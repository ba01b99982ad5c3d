//! Apply command: reconcile manifests from a file or directory.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use walkdir::WalkDir;

use crate::resource::{request_namespace, Manifest};

/// Arguments for the apply command.
#[derive(Args)]
pub struct ApplyArgs {
    /// Manifest file or directory of manifests
    #[arg(short = 'f', long, value_name = "FILE|DIR")]
    pub file: PathBuf,
}

/// Executes the apply command.
///
/// Namespaces are applied first (create-or-update), then configurations,
/// so a tree exported with `get -O` re-applies in one pass. Configurations
/// that target a namespace that still does not exist are rejected rather
/// than silently landing in the default namespace.
pub async fn run(args: &ApplyArgs, config_path: &Path) -> Result<()> {
    let manifests = load_manifests(&args.file)?;
    if manifests.is_empty() {
        bail!("no manifests found under {}", args.file.display());
    }

    let mut client = super::connect(config_path).await?;

    for manifest in &manifests {
        if let Manifest::Namespace(ns) = manifest {
            client.create_or_update_namespace(&ns.to_opts()).await?;
            println!("namespace/{} applied", ns.metadata.id);
        }
    }

    let known: Vec<String> = client
        .list_namespaces()
        .await?
        .into_iter()
        .map(|ns| ns.id)
        .collect();

    for manifest in &manifests {
        match manifest {
            Manifest::Namespace(_) => {}
            Manifest::Configuration(cfg) => {
                let namespace_id = request_namespace(&cfg.metadata.namespace);
                if !namespace_id.is_empty() && !known.iter().any(|id| id == namespace_id) {
                    bail!(
                        "configuration {} targets unknown namespace {}",
                        cfg.metadata.name,
                        cfg.metadata.namespace
                    );
                }
                client.create_configuration(&cfg.to_opts()).await?;
                println!("configuration/{} created", cfg.metadata.name);
            }
            other => bail!("apply does not support kind {}", kind_name(other)),
        }
    }
    Ok(())
}

/// Reads manifests from `path`: a single YAML file, or every regular
/// file under a directory. Exported configuration files are named after
/// their data id, so directory walks cannot filter on extension.
fn load_manifests(path: &Path) -> Result<Vec<Manifest>> {
    let mut files = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.with_context(|| format!("walking {}", path.display()))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
    } else {
        files.push(path.to_path_buf());
    }

    let mut manifests = Vec::with_capacity(files.len());
    for file in files {
        let text = std::fs::read_to_string(&file)
            .with_context(|| format!("reading {}", file.display()))?;
        let manifest: Manifest =
            serde_yaml::from_str(&text).with_context(|| format!("parsing {}", file.display()))?;
        manifests.push(manifest);
    }
    Ok(manifests)
}

const fn kind_name(manifest: &Manifest) -> &'static str {
    match manifest {
        Manifest::Namespace(_) => "Namespace",
        Manifest::Configuration(_) => "Configuration",
        Manifest::User(_) => "User",
        Manifest::Role(_) => "Role",
        Manifest::Permission(_) => "Permission",
    }
}

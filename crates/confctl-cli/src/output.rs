//! Output rendering: table, JSON, YAML, or an exported file tree.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use comfy_table::{presets, Table};

use crate::resource::Manifest;

/// Supported output formats for `get` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain table, one row per resource.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
    /// YAML stream.
    Yaml,
}

/// Renders manifests to `writer` in the requested format.
///
/// A single-element listing prints the bare item rather than a
/// one-element array, matching what users expect when addressing one
/// resource by name.
pub fn print_manifests(
    items: &[Manifest],
    format: OutputFormat,
    writer: &mut impl Write,
) -> Result<()> {
    match format {
        OutputFormat::Table => print_table(items, writer),
        OutputFormat::Json => {
            let text = if let [item] = items {
                serde_json::to_string_pretty(item)?
            } else {
                serde_json::to_string_pretty(items)?
            };
            writeln!(writer, "{text}")?;
            Ok(())
        }
        OutputFormat::Yaml => {
            let text = if let [item] = items {
                serde_yaml::to_string(item)?
            } else {
                serde_yaml::to_string(items)?
            };
            write!(writer, "{text}")?;
            Ok(())
        }
    }
}

fn print_table(items: &[Manifest], writer: &mut impl Write) -> Result<()> {
    let Some(first) = items.first() else {
        return Ok(());
    };
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(first.table_header().to_vec());
    for item in items {
        table.add_row(item.table_row());
    }
    writeln!(writer, "{table}")?;
    Ok(())
}

/// Writes manifests as a YAML file tree rooted at `base`.
///
/// Namespaces with an empty id (the reserved default namespace) are
/// skipped: they cannot be re-created by `apply` anyway.
pub fn write_to_dir(items: &[Manifest], base: &Path) -> Result<()> {
    for item in items {
        if let Manifest::Namespace(ns) = item {
            if ns.metadata.id.is_empty() {
                continue;
            }
        }
        let path = item.output_path(base);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let text = serde_yaml::to_string(item)?;
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

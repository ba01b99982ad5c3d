//! Get command: display one or many resources.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use confctl_client::ConfigurationQuery;

use crate::output::{self, OutputFormat};
use crate::resource::{request_namespace, Manifest};

/// Arguments for the get command.
#[derive(Args)]
pub struct GetArgs {
    #[command(subcommand)]
    pub resource: GetResource,

    /// Output format
    #[arg(
        short = 'o',
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        conflicts_with = "output_dir"
    )]
    pub output: OutputFormat,

    /// Export resources as a YAML file tree under this directory
    #[arg(short = 'O', long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Resource kinds the get command understands.
#[derive(Subcommand)]
pub enum GetResource {
    /// Display namespaces, optionally filtered by id
    #[command(visible_alias = "ns")]
    Namespaces {
        /// Namespace ids to show; empty shows all
        ids: Vec<String>,
    },

    /// Display configurations
    #[command(visible_alias = "cs")]
    Configs {
        /// Data ids to fetch individually; empty lists the namespace
        data_ids: Vec<String>,

        /// Namespace id ("public" or empty for the default namespace)
        #[arg(short = 'n', long, default_value = "")]
        namespace: String,

        /// Group name
        #[arg(short = 'g', long, default_value = "")]
        group: String,

        /// Show configurations across all namespaces
        #[arg(short = 'A', long, conflicts_with_all = ["data_ids", "namespace"])]
        all: bool,
    },

    /// Display console users
    Users,

    /// Display role bindings
    Roles,

    /// Display permission grants
    Permissions,
}

/// Executes the get command.
pub async fn run(args: GetArgs, config_path: &Path) -> Result<()> {
    let mut client = super::connect(config_path).await?;
    let dialect = client.api_version().as_str();

    let manifests: Vec<Manifest> = match args.resource {
        GetResource::Namespaces { ids } => {
            let mut namespaces = client.list_namespaces().await?;
            if !ids.is_empty() {
                namespaces.retain(|ns| ids.contains(&ns.id));
            }
            namespaces
                .iter()
                .map(|ns| Manifest::from_namespace(dialect, ns))
                .collect()
        }
        GetResource::Configs {
            data_ids,
            namespace,
            group,
            all,
        } => {
            let namespace_id = request_namespace(&namespace).to_string();
            let configs = if all {
                client.list_all_configurations().await?
            } else if data_ids.is_empty() {
                client
                    .list_configurations_in_namespace(&namespace_id, &group)
                    .await?
            } else {
                let group = if group.is_empty() {
                    "DEFAULT_GROUP".to_string()
                } else {
                    group
                };
                let mut configs = Vec::with_capacity(data_ids.len());
                for data_id in data_ids {
                    configs.push(
                        client
                            .get_configuration(&ConfigurationQuery {
                                data_id,
                                group: group.clone(),
                                namespace_id: namespace_id.clone(),
                            })
                            .await?,
                    );
                }
                configs
            };
            configs
                .iter()
                .map(|cfg| Manifest::from_configuration(dialect, cfg))
                .collect()
        }
        GetResource::Users => client
            .list_users()
            .await?
            .iter()
            .map(|u| Manifest::from_user(dialect, u))
            .collect(),
        GetResource::Roles => client
            .list_roles()
            .await?
            .iter()
            .map(|r| Manifest::from_role(dialect, r))
            .collect(),
        GetResource::Permissions => client
            .list_permissions()
            .await?
            .iter()
            .map(|p| Manifest::from_permission(dialect, p))
            .collect(),
    };

    if let Some(dir) = args.output_dir {
        output::write_to_dir(&manifests, &dir)
    } else {
        output::print_manifests(&manifests, args.output, &mut std::io::stdout())
    }
}

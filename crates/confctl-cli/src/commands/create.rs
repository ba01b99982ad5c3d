//! Create command: create resources from flags.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use confctl_client::{CreateConfigurationOpts, CreateNamespaceOpts};

use crate::resource::request_namespace;

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    #[command(subcommand)]
    pub resource: CreateResource,
}

/// Resource kinds the create command understands.
#[derive(Subcommand)]
pub enum CreateResource {
    /// Create a namespace
    #[command(visible_alias = "ns")]
    Namespace {
        /// Namespace id
        id: String,

        /// Display name (defaults to the id)
        #[arg(long)]
        name: Option<String>,

        /// Description
        #[arg(short = 'd', long, default_value = "")]
        description: String,
    },

    /// Create (publish) a configuration
    #[command(visible_alias = "cs")]
    Config {
        /// Data id
        data_id: String,

        /// Namespace id ("public" or empty for the default namespace)
        #[arg(short = 'n', long, default_value = "")]
        namespace: String,

        /// Group name
        #[arg(short = 'g', long, default_value = "DEFAULT_GROUP")]
        group: String,

        /// Inline configuration content
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,

        /// Read configuration content from a file
        #[arg(short = 'f', long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Content type (e.g., yaml, properties, json)
        #[arg(short = 't', long = "type", default_value = "text")]
        kind: String,

        /// Description
        #[arg(short = 'd', long, default_value = "")]
        description: String,

        /// Owning application name
        #[arg(long, default_value = "")]
        application: String,

        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
    },

    /// Create a console user
    User {
        /// Username
        username: String,
        /// Password
        password: String,
    },

    /// Bind a role to a user
    Role {
        /// Role name
        role: String,
        /// Username
        username: String,
    },

    /// Grant a permission to a role
    Permission {
        /// Role name
        role: String,
        /// Resource pattern (e.g., "dev:*:*")
        resource: String,
        /// Action ("r", "w", or "rw")
        action: String,
    },
}

/// Executes the create command.
pub async fn run(args: CreateArgs, config_path: &Path) -> Result<()> {
    let mut client = super::connect(config_path).await?;

    match args.resource {
        CreateResource::Namespace {
            id,
            name,
            description,
        } => {
            let opts = CreateNamespaceOpts {
                name: name.unwrap_or_else(|| id.clone()),
                id,
                description,
            };
            client.create_namespace(&opts).await?;
            println!("namespace/{} created", opts.id);
        }
        CreateResource::Config {
            data_id,
            namespace,
            group,
            content,
            file,
            kind,
            description,
            application,
            tags,
        } => {
            let content = match (content, file) {
                (Some(content), None) => content,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                (None, None) => bail!("either --content or --file is required"),
                (Some(_), Some(_)) => unreachable!("clap rejects conflicting flags"),
            };
            let opts = CreateConfigurationOpts {
                data_id,
                group,
                namespace_id: request_namespace(&namespace).to_string(),
                content,
                kind,
                description,
                application,
                tags,
            };
            client.create_configuration(&opts).await?;
            println!("configuration/{} created", opts.data_id);
        }
        CreateResource::User { username, password } => {
            client.create_user(&username, &password).await?;
            println!("user/{username} created");
        }
        CreateResource::Role { role, username } => {
            client.create_role(&role, &username).await?;
            println!("role/{role}:{username} created");
        }
        CreateResource::Permission {
            role,
            resource,
            action,
        } => {
            client.create_permission(&role, &resource, &action).await?;
            println!("permission/{role}:{resource}:{action} created");
        }
    }
    Ok(())
}

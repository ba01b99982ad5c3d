//! Delete command: remove resources by identity.

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};
use confctl_client::ConfigurationQuery;

use crate::resource::request_namespace;

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    #[command(subcommand)]
    pub resource: DeleteResource,
}

/// Resource kinds the delete command understands.
#[derive(Subcommand)]
pub enum DeleteResource {
    /// Delete a namespace
    #[command(visible_alias = "ns")]
    Namespace {
        /// Namespace id
        id: String,
    },

    /// Delete a configuration
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
    },

    /// Delete a console user
    User {
        /// Username
        username: String,
    },

    /// Remove a role binding
    Role {
        /// Role name
        role: String,
        /// Username
        username: String,
    },

    /// Revoke a permission grant
    Permission {
        /// Role name
        role: String,
        /// Resource pattern
        resource: String,
        /// Action
        action: String,
    },
}

/// Executes the delete command.
pub async fn run(args: DeleteArgs, config_path: &Path) -> Result<()> {
    let mut client = super::connect(config_path).await?;

    match args.resource {
        DeleteResource::Namespace { id } => {
            client.delete_namespace(&id).await?;
            println!("namespace/{id} deleted");
        }
        DeleteResource::Config {
            data_id,
            namespace,
            group,
        } => {
            let query = ConfigurationQuery {
                data_id,
                group,
                namespace_id: request_namespace(&namespace).to_string(),
            };
            client.delete_configuration(&query).await?;
            println!("configuration/{} deleted", query.data_id);
        }
        DeleteResource::User { username } => {
            client.delete_user(&username).await?;
            println!("user/{username} deleted");
        }
        DeleteResource::Role { role, username } => {
            client.delete_role(&role, &username).await?;
            println!("role/{role}:{username} deleted");
        }
        DeleteResource::Permission {
            role,
            resource,
            action,
        } => {
            client.delete_permission(&role, &resource, &action).await?;
            println!("permission/{role}:{resource}:{action} deleted");
        }
    }
    Ok(())
}

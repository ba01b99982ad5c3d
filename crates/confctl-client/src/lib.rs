//! # confctl-client
//!
//! Client library for Nacos-compatible configuration registries.
//!
//! This crate talks to the registry's console HTTP API and exposes the
//! namespace, configuration, user, role, and permission resources. It
//! handles credential exchange with token-lifetime caching, detection of
//! the two incompatible API dialects (v1 and v3), and cursor-based
//! pagination shared across all listable resource kinds.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use confctl_client::{ClientConfig, RegistryClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("http://localhost:8848/nacos", "nacos", "nacos");
//!     let mut client = RegistryClient::connect(config).await?;
//!
//!     for ns in client.list_namespaces().await? {
//!         println!("{} ({})", ns.name, ns.id);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       RegistryClient                         │
//! │  ┌─────────────┐  ┌───────────────┐  ┌────────────────────┐  │
//! │  │ Token cache │  │  ApiVersion   │  │  Page engine       │  │
//! │  │ (lazy auth) │  │  (v1/v3 path  │  │  (cursor loop)     │  │
//! │  │             │  │   tables)     │  │                    │  │
//! │  └─────────────┘  └───────────────┘  └────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!            Nacos-compatible registry (console API)
//! ```
//!
//! All operations are strictly sequential request/response round trips:
//! nothing is retried, parallelized, or cached across processes. A
//! `RegistryClient` is meant to be owned by a single caller; the token
//! cache is not synchronized for shared use.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod api;
mod client;
mod config;
mod error;
mod types;

pub use api::{ApiVersion, Operation};
pub use client::RegistryClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use types::{
    Configuration, ConfigurationQuery, CreateConfigurationOpts, CreateNamespaceOpts,
    ListConfigurationsOpts, Namespace, Page, Permission, Role, ServerState, User,
};

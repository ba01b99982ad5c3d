//! Wire types for the registry console API.
//!
//! These are ephemeral in-process snapshots of remote state: created by
//! decoding a response, never mutated, discarded after use. The registry
//! server is the sole source of truth.
//!
//! Servers emit explicit JSON `null` for unset fields as readily as they
//! omit them, so every optional field decodes through [`null_to_default`]
//! and treats the two shapes identically.

use serde::{Deserialize, Deserializer, Serialize};

/// Decodes a possibly-`null` field into the type's default value.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_empty_str(s: &str) -> bool {
    s.is_empty()
}

const fn is_zero(n: &i64) -> bool {
    *n == 0
}

/// A configuration namespace.
///
/// Identity key is [`Namespace::id`]; [`Namespace::name`] is a display
/// label that may differ from the id. The default namespace has an empty
/// id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    /// Namespace identifier.
    #[serde(rename = "namespace", default, deserialize_with = "null_to_default")]
    pub id: String,

    /// Display name.
    #[serde(
        rename = "namespaceShowName",
        default,
        deserialize_with = "null_to_default"
    )]
    pub name: String,

    /// Description.
    #[serde(rename = "namespaceDesc", default)]
    pub description: Option<String>,

    /// Maximum number of configurations allowed.
    #[serde(
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "is_zero"
    )]
    pub quota: i64,

    /// Number of configurations currently stored.
    #[serde(
        rename = "configCount",
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "is_zero"
    )]
    pub config_count: i64,

    /// Namespace kind tag (0 global, 1 default-private, 2 custom).
    #[serde(
        rename = "type",
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "is_zero"
    )]
    pub kind: i64,
}

/// Envelope of the namespace listing, `{code, message, data}` in both
/// dialects.
#[derive(Debug, Deserialize)]
pub(crate) struct NamespaceList {
    #[serde(rename = "data", default, deserialize_with = "null_to_default")]
    pub items: Vec<Namespace>,
}

/// A single configuration entry.
///
/// Identity key is the `(namespace, group, data_id)` triple. An empty
/// namespace denotes the default namespace. The group and namespace may
/// arrive under either of two JSON keys depending on the server dialect;
/// use [`Configuration::effective_group`] and
/// [`Configuration::effective_namespace`] instead of reading the fields
/// directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Server-side row identifier.
    #[serde(
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "is_empty_str"
    )]
    pub id: String,

    /// Configuration data id (file name).
    #[serde(rename = "dataId", default, deserialize_with = "null_to_default")]
    pub data_id: String,

    /// Group, as reported by v1 servers.
    #[serde(default, deserialize_with = "null_to_default")]
    pub group: String,

    /// Group, as reported by v3 servers.
    #[serde(
        rename = "groupName",
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "is_empty_str"
    )]
    pub group_name: String,

    /// Configuration content.
    #[serde(default, deserialize_with = "null_to_default")]
    pub content: String,

    /// Namespace id, as reported by v1 servers.
    #[serde(rename = "tenant", default, deserialize_with = "null_to_default")]
    pub tenant: String,

    /// Namespace id, as reported by v3 servers.
    #[serde(
        rename = "namespaceId",
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "is_empty_str"
    )]
    pub namespace_id: String,

    /// Content type (e.g., "yaml", "properties").
    #[serde(rename = "type", default, deserialize_with = "null_to_default")]
    pub kind: String,

    /// Content MD5 as computed by the server.
    #[serde(
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "is_empty_str"
    )]
    pub md5: String,

    /// Encrypted data key for server-side encrypted configs.
    #[serde(
        rename = "encryptedDataKey",
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "is_empty_str"
    )]
    pub encrypted_data_key: String,

    /// Owning application name.
    #[serde(
        rename = "appName",
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "is_empty_str"
    )]
    pub application: String,

    /// Description.
    #[serde(
        rename = "desc",
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "is_empty_str"
    )]
    pub description: String,

    /// Comma-separated tags.
    #[serde(
        rename = "configTags",
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "is_empty_str"
    )]
    pub tags: String,

    /// Creation time, epoch milliseconds.
    #[serde(
        rename = "createTime",
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "is_zero"
    )]
    pub create_time: i64,

    /// Last modification time, epoch milliseconds.
    #[serde(
        rename = "modifyTime",
        default,
        deserialize_with = "null_to_default",
        skip_serializing_if = "is_zero"
    )]
    pub modify_time: i64,
}

impl Configuration {
    /// Returns the group, whichever dialect key it arrived under.
    ///
    /// Prefers the v3 `groupName` key when both are populated.
    #[must_use]
    pub fn effective_group(&self) -> &str {
        if self.group_name.is_empty() {
            &self.group
        } else {
            &self.group_name
        }
    }

    /// Returns the namespace id, whichever dialect key it arrived under.
    ///
    /// Prefers the v3 `namespaceId` key when both are populated. Empty
    /// means the default namespace.
    #[must_use]
    pub fn effective_namespace(&self) -> &str {
        if self.namespace_id.is_empty() {
            &self.tenant
        } else {
            &self.namespace_id
        }
    }
}

/// A console user record, keyed by username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Username.
    pub username: String,

    /// Password hash as stored by the server.
    #[serde(default, deserialize_with = "null_to_default")]
    pub password: String,
}

/// A role binding, keyed by `(role, username)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role name.
    pub role: String,

    /// Bound username.
    pub username: String,
}

/// A permission grant, keyed by `(role, resource, action)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Role name.
    pub role: String,

    /// Resource pattern (e.g., "`dev:*:*`").
    pub resource: String,

    /// Action ("r", "w", or "rw").
    pub action: String,
}

/// One page of a paginated listing.
///
/// The page cursor is `(page_number, pages_available, total_count)`; the
/// server reports the final page with `pages_available == 0` or
/// `pages_available == page_number`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    /// Total items across all pages.
    #[serde(rename = "totalCount", default, deserialize_with = "null_to_default")]
    pub total_count: u32,

    /// Current page number, 1-based.
    #[serde(rename = "pageNumber", default, deserialize_with = "null_to_default")]
    pub page_number: u32,

    /// Total pages available.
    #[serde(
        rename = "pagesAvailable",
        default,
        deserialize_with = "null_to_default"
    )]
    pub pages_available: u32,

    /// Items on this page, in server order.
    #[serde(rename = "pageItems", default, deserialize_with = "null_to_default")]
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Whether this is the final page of the listing.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.pages_available == 0 || self.pages_available == self.page_number
    }
}

/// The `{code, message, data}` wrapper v3 servers put around responses.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default, deserialize_with = "null_to_default")]
    #[allow(dead_code)]
    pub code: i64,
    #[serde(default)]
    #[allow(dead_code)]
    pub message: Option<String>,
    pub data: T,
}

/// Server state probe result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerState {
    /// Server version string.
    #[serde(default, deserialize_with = "null_to_default")]
    pub version: String,

    /// Whether the server runs standalone or clustered.
    #[serde(default)]
    pub standalone_mode: Option<String>,

    /// Enabled function mode, when restricted.
    #[serde(default)]
    pub function_mode: Option<String>,
}

/// Successful login response.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "tokenTtl")]
    pub token_ttl: i64,
    #[serde(rename = "globalAdmin", default, deserialize_with = "null_to_default")]
    #[allow(dead_code)]
    pub global_admin: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    #[allow(dead_code)]
    pub username: String,
}

/// Parameters for creating or updating a namespace.
#[derive(Debug, Clone, Default)]
pub struct CreateNamespaceOpts {
    /// Namespace id. Empty lets the server generate one on create.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
}

/// Identity triple addressing a single configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationQuery {
    /// Configuration data id.
    pub data_id: String,
    /// Group.
    pub group: String,
    /// Namespace id; empty means the default namespace.
    pub namespace_id: String,
}

/// Filter and cursor for configuration listings.
///
/// Zero `page_number`/`page_size` select the server defaults (page 1,
/// size 10).
#[derive(Debug, Clone, Default)]
pub struct ListConfigurationsOpts {
    /// Filter by data id; empty matches all.
    pub data_id: String,
    /// Filter by group; empty matches all.
    pub group: String,
    /// Namespace to list; empty means the default namespace.
    pub namespace_id: String,
    /// Filter by owning application.
    pub application: String,
    /// Filter by tags.
    pub tags: String,
    /// Page number, 1-based.
    pub page_number: u32,
    /// Page size.
    pub page_size: u32,
}

/// Parameters for creating (publishing) a configuration.
#[derive(Debug, Clone, Default)]
pub struct CreateConfigurationOpts {
    /// Configuration data id.
    pub data_id: String,
    /// Group.
    pub group: String,
    /// Namespace id; empty targets the default namespace.
    pub namespace_id: String,
    /// Configuration content.
    pub content: String,
    /// Content type (e.g., "yaml").
    pub kind: String,
    /// Description.
    pub description: String,
    /// Owning application name.
    pub application: String,
    /// Comma-separated tags.
    pub tags: String,
}

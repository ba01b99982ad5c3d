//! Resource manifests: the YAML/JSON form the CLI reads and writes.
//!
//! Manifests mirror the registry's wire records but use a stable
//! apiVersion/kind/metadata layout so exported trees can be re-applied
//! with `confctl apply`. The empty (default) namespace id is rendered as
//! the label `public` at this boundary only; the client never sees it.

use std::path::{Path, PathBuf};

use confctl_client::{
    Configuration, CreateConfigurationOpts, CreateNamespaceOpts, Namespace, Permission, Role, User,
};
use serde::{Deserialize, Serialize};

/// Display label for the default namespace (empty id on the wire).
pub const PUBLIC_NAMESPACE: &str = "public";

/// Maps a wire namespace id to its display label.
pub fn display_namespace(id: &str) -> &str {
    if id.is_empty() {
        PUBLIC_NAMESPACE
    } else {
        id
    }
}

/// Maps a manifest namespace label back to a wire namespace id.
pub fn request_namespace(label: &str) -> &str {
    if label == PUBLIC_NAMESPACE {
        ""
    } else {
        label
    }
}

/// A resource manifest, dispatched on its `kind` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Manifest {
    /// A namespace manifest.
    Namespace(NamespaceManifest),
    /// A configuration manifest.
    Configuration(ConfigurationManifest),
    /// A console user manifest.
    User(UserManifest),
    /// A role binding manifest.
    Role(RoleManifest),
    /// A permission grant manifest.
    Permission(PermissionManifest),
}

/// Namespace manifest body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceManifest {
    /// Producing API dialect ("v1" or "v3").
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    /// Identity and display fields.
    pub metadata: NamespaceMetadata,
    /// Server-reported counters.
    #[serde(default)]
    pub status: NamespaceStatus,
}

/// Namespace identity and display fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamespaceMetadata {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Namespace id.
    #[serde(default)]
    pub id: String,
    /// Description.
    #[serde(default)]
    pub description: String,
}

/// Server-reported namespace counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamespaceStatus {
    /// Configuration quota.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub quota: i64,
    /// Stored configuration count.
    #[serde(rename = "configCount", default, skip_serializing_if = "is_zero")]
    pub config_count: i64,
    /// Namespace kind tag.
    #[serde(rename = "type", default, skip_serializing_if = "is_zero")]
    pub kind: i64,
}

/// Configuration manifest body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurationManifest {
    /// Producing API dialect ("v1" or "v3").
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    /// Identity triple.
    pub metadata: ConfigurationMetadata,
    /// Content and classification.
    pub spec: ConfigurationSpec,
    /// Server-reported bookkeeping.
    #[serde(default)]
    pub status: ConfigurationStatus,
}

/// Configuration identity triple, with the namespace as a display label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigurationMetadata {
    /// Data id.
    pub name: String,
    /// Group.
    #[serde(default)]
    pub group: String,
    /// Namespace label (`public` for the default namespace).
    #[serde(default)]
    pub namespace: String,
}

/// Configuration content and classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigurationSpec {
    /// Configuration content.
    #[serde(default)]
    pub data: String,
    /// Content type (e.g., "yaml").
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Owning application.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub application: String,
    /// Description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Comma-separated tags.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tags: String,
}

/// Server-reported configuration bookkeeping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigurationStatus {
    /// Content MD5.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub md5: String,
    /// Encrypted data key.
    #[serde(
        rename = "encryptedDataKey",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub encrypted_data_key: String,
    /// Creation time, epoch milliseconds.
    #[serde(rename = "createTime", default, skip_serializing_if = "is_zero")]
    pub create_time: i64,
    /// Last modification time, epoch milliseconds.
    #[serde(rename = "modifyTime", default, skip_serializing_if = "is_zero")]
    pub modify_time: i64,
}

/// Console user manifest body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserManifest {
    /// Producing API dialect.
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    /// User identity.
    pub metadata: UserMetadata,
}

/// User identity fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    /// Username.
    pub username: String,
    /// Password hash as stored by the server.
    #[serde(default)]
    pub password: String,
}

/// Role binding manifest body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleManifest {
    /// Producing API dialect.
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    /// Binding identity.
    pub metadata: RoleMetadata,
}

/// Role binding identity fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleMetadata {
    /// Role name.
    pub name: String,
    /// Bound username.
    pub username: String,
}

/// Permission grant manifest body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionManifest {
    /// Producing API dialect.
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    /// Grant identity.
    pub metadata: PermissionMetadata,
}

/// Permission grant identity fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionMetadata {
    /// Role name.
    pub role: String,
    /// Resource pattern.
    pub resource: String,
    /// Action.
    pub action: String,
}

const fn is_zero(n: &i64) -> bool {
    *n == 0
}

impl Manifest {
    /// Builds a namespace manifest from a wire record.
    pub fn from_namespace(api_version: &str, ns: &Namespace) -> Self {
        Self::Namespace(NamespaceManifest {
            api_version: api_version.to_string(),
            metadata: NamespaceMetadata {
                name: ns.name.clone(),
                id: ns.id.clone(),
                description: ns.description.clone().unwrap_or_default(),
            },
            status: NamespaceStatus {
                quota: ns.quota,
                config_count: ns.config_count,
                kind: ns.kind,
            },
        })
    }

    /// Builds a configuration manifest from a wire record.
    pub fn from_configuration(api_version: &str, cfg: &Configuration) -> Self {
        Self::Configuration(ConfigurationManifest {
            api_version: api_version.to_string(),
            metadata: ConfigurationMetadata {
                name: cfg.data_id.clone(),
                group: cfg.effective_group().to_string(),
                namespace: display_namespace(cfg.effective_namespace()).to_string(),
            },
            spec: ConfigurationSpec {
                data: cfg.content.clone(),
                kind: cfg.kind.clone(),
                application: cfg.application.clone(),
                description: cfg.description.clone(),
                tags: cfg.tags.clone(),
            },
            status: ConfigurationStatus {
                md5: cfg.md5.clone(),
                encrypted_data_key: cfg.encrypted_data_key.clone(),
                create_time: cfg.create_time,
                modify_time: cfg.modify_time,
            },
        })
    }

    /// Builds a user manifest from a wire record.
    pub fn from_user(api_version: &str, user: &User) -> Self {
        Self::User(UserManifest {
            api_version: api_version.to_string(),
            metadata: UserMetadata {
                username: user.username.clone(),
                password: user.password.clone(),
            },
        })
    }

    /// Builds a role manifest from a wire record.
    pub fn from_role(api_version: &str, role: &Role) -> Self {
        Self::Role(RoleManifest {
            api_version: api_version.to_string(),
            metadata: RoleMetadata {
                name: role.role.clone(),
                username: role.username.clone(),
            },
        })
    }

    /// Builds a permission manifest from a wire record.
    pub fn from_permission(api_version: &str, perm: &Permission) -> Self {
        Self::Permission(PermissionManifest {
            api_version: api_version.to_string(),
            metadata: PermissionMetadata {
                role: perm.role.clone(),
                resource: perm.resource.clone(),
                action: perm.action.clone(),
            },
        })
    }

    /// Table header for this manifest's kind.
    pub const fn table_header(&self) -> &'static [&'static str] {
        match self {
            Self::Namespace(_) => &["NAME", "ID", "DESCRIPTION", "COUNT"],
            Self::Configuration(_) => &["NAMESPACE", "DATAID", "GROUP", "APPLICATION", "TYPE"],
            Self::User(_) => &["NAME", "PASSWORD"],
            Self::Role(_) => &["NAME", "USERNAME"],
            Self::Permission(_) => &["ROLE", "RESOURCE", "ACTION"],
        }
    }

    /// One table row for this manifest.
    pub fn table_row(&self) -> Vec<String> {
        match self {
            Self::Namespace(ns) => vec![
                ns.metadata.name.clone(),
                ns.metadata.id.clone(),
                ns.metadata.description.clone(),
                ns.status.config_count.to_string(),
            ],
            Self::Configuration(cfg) => vec![
                cfg.metadata.namespace.clone(),
                cfg.metadata.name.clone(),
                cfg.metadata.group.clone(),
                cfg.spec.application.clone(),
                cfg.spec.kind.clone(),
            ],
            Self::User(u) => vec![u.metadata.username.clone(), u.metadata.password.clone()],
            Self::Role(r) => vec![r.metadata.name.clone(), r.metadata.username.clone()],
            Self::Permission(p) => vec![
                p.metadata.role.clone(),
                p.metadata.resource.clone(),
                p.metadata.action.clone(),
            ],
        }
    }

    /// File path for this manifest in an exported tree.
    ///
    /// Configurations nest as `namespace/group/dataId`; everything else
    /// is one file per resource at the top level.
    pub fn output_path(&self, base: &Path) -> PathBuf {
        match self {
            Self::Namespace(ns) => base.join(format!("{}.yaml", ns.metadata.id)),
            Self::Configuration(cfg) => base
                .join(&cfg.metadata.namespace)
                .join(&cfg.metadata.group)
                .join(&cfg.metadata.name),
            Self::User(u) => base.join(format!("{}.yaml", u.metadata.username)),
            Self::Role(r) => {
                base.join(format!("{}-{}.yaml", r.metadata.name, r.metadata.username))
            }
            Self::Permission(p) => base.join(format!(
                "{}-{}-{}.yaml",
                p.metadata.role, p.metadata.resource, p.metadata.action
            )),
        }
    }
}

impl NamespaceManifest {
    /// Converts to the client's create/update parameters.
    pub fn to_opts(&self) -> CreateNamespaceOpts {
        CreateNamespaceOpts {
            id: self.metadata.id.clone(),
            name: if self.metadata.name.is_empty() {
                self.metadata.id.clone()
            } else {
                self.metadata.name.clone()
            },
            description: self.metadata.description.clone(),
        }
    }
}

impl ConfigurationManifest {
    /// Converts to the client's publish parameters, mapping the `public`
    /// label back to the empty wire id.
    pub fn to_opts(&self) -> CreateConfigurationOpts {
        CreateConfigurationOpts {
            data_id: self.metadata.name.clone(),
            group: self.metadata.group.clone(),
            namespace_id: request_namespace(&self.metadata.namespace).to_string(),
            content: self.spec.data.clone(),
            kind: self.spec.kind.clone(),
            description: self.spec.description.clone(),
            application: self.spec.application.clone(),
            tags: self.spec.tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_label_round_trip() {
        assert_eq!(display_namespace(""), "public");
        assert_eq!(display_namespace("dev"), "dev");
        assert_eq!(request_namespace("public"), "");
        assert_eq!(request_namespace("dev"), "dev");
    }

    #[test]
    fn test_manifest_parses_by_kind_tag() {
        let yaml = r"
kind: Namespace
apiVersion: v1
metadata:
  name: Development
  id: dev
  description: dev namespace
";
        let manifest: Manifest = serde_yaml::from_str(yaml).unwrap();
        match manifest {
            Manifest::Namespace(ns) => {
                assert_eq!(ns.metadata.id, "dev");
                assert_eq!(ns.metadata.name, "Development");
            }
            other => panic!("expected Namespace manifest, got {other:?}"),
        }
    }

    #[test]
    fn test_configuration_manifest_round_trips_through_yaml() {
        let yaml = r"
kind: Configuration
apiVersion: v1
metadata:
  name: app.yaml
  group: DEFAULT_GROUP
  namespace: public
spec:
  data: 'a: 1'
  type: yaml
";
        let manifest: Manifest = serde_yaml::from_str(yaml).unwrap();
        let Manifest::Configuration(cfg) = manifest else {
            panic!("expected Configuration manifest");
        };
        let opts = cfg.to_opts();
        assert_eq!(opts.data_id, "app.yaml");
        assert_eq!(opts.group, "DEFAULT_GROUP");
        // the public label maps back to the empty wire id
        assert_eq!(opts.namespace_id, "");
        assert_eq!(opts.content, "a: 1");
    }

    #[test]
    fn test_from_configuration_normalizes_default_namespace() {
        let cfg: Configuration = serde_json::from_str(
            r#"{"dataId":"app.yaml","group":"DEFAULT_GROUP","content":"a: 1","tenant":""}"#,
        )
        .unwrap();
        let manifest = Manifest::from_configuration("v1", &cfg);
        let Manifest::Configuration(m) = &manifest else {
            panic!("expected Configuration manifest");
        };
        assert_eq!(m.metadata.namespace, "public");
    }

    #[test]
    fn test_from_configuration_prefers_v3_keys() {
        let cfg: Configuration = serde_json::from_str(
            r#"{"dataId":"app.yaml","group":"OLD","groupName":"NEW",
                "tenant":"old-ns","namespaceId":"new-ns","content":"x"}"#,
        )
        .unwrap();
        let Manifest::Configuration(m) = Manifest::from_configuration("v3", &cfg) else {
            panic!("expected Configuration manifest");
        };
        assert_eq!(m.metadata.group, "NEW");
        assert_eq!(m.metadata.namespace, "new-ns");
    }

    #[test]
    fn test_output_paths() {
        let base = Path::new("/tmp/export");
        let ns = Manifest::from_namespace(
            "v1",
            &serde_json::from_str(r#"{"namespace":"dev","namespaceShowName":"dev"}"#).unwrap(),
        );
        assert_eq!(ns.output_path(base), base.join("dev.yaml"));

        let cfg: Configuration = serde_json::from_str(
            r#"{"dataId":"app.yaml","group":"DEFAULT_GROUP","tenant":"dev","content":"x"}"#,
        )
        .unwrap();
        let manifest = Manifest::from_configuration("v1", &cfg);
        assert_eq!(
            manifest.output_path(base),
            base.join("dev").join("DEFAULT_GROUP").join("app.yaml")
        );
    }

    #[test]
    fn test_serialized_manifest_carries_kind() {
        let user = Manifest::from_user(
            "v1",
            &serde_json::from_str(r#"{"username":"nacos","password":"x"}"#).unwrap(),
        );
        let yaml = serde_yaml::to_string(&user).unwrap();
        assert!(yaml.contains("kind: User"));
    }
}

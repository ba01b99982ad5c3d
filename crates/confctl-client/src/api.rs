//! Endpoint path tables for the two registry API dialects.
//!
//! Registry servers expose the same logical console API under two
//! incompatible conventions: the legacy v1 layout and the v3 layout
//! introduced with the merged console. The two differ in path shape, in
//! parameter names (`tenant` vs `namespaceId`, `group` vs `groupName`),
//! and in response envelope (bare object vs `{code, message, data}`).
//! Everything version-dependent about request routing lives in this
//! module; resource operations stay dialect-agnostic by looking paths up
//! through [`ApiVersion::path`].

/// One logical console API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Server state probe (version, modes).
    ServerState,
    /// Credential exchange for an access token.
    Login,
    /// Namespace listing.
    NamespaceList,
    /// Namespace create/update/delete.
    Namespace,
    /// Configuration listing (paginated).
    ConfigList,
    /// Single configuration get/create/delete.
    Config,
    /// User listing (paginated).
    UserList,
    /// User create/delete.
    User,
    /// Role listing (paginated).
    RoleList,
    /// Role create/delete.
    Role,
    /// Permission listing (paginated).
    PermissionList,
    /// Permission create/delete.
    Permission,
}

/// API dialect spoken by a registry server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    /// Legacy console API.
    #[default]
    V1,
    /// Merged console API.
    V3,
}

impl ApiVersion {
    /// Candidate dialects in detection priority order, newest first.
    pub const DETECTION_ORDER: [Self; 2] = [Self::V3, Self::V1];

    /// Returns the endpoint path for `operation` under this dialect.
    #[must_use]
    pub const fn path(self, operation: Operation) -> &'static str {
        match self {
            Self::V1 => match operation {
                Operation::ServerState => "/v1/console/server/state",
                Operation::Login => "/v1/auth/login",
                Operation::NamespaceList | Operation::Namespace => "/v1/console/namespaces",
                Operation::ConfigList | Operation::Config => "/v1/cs/configs",
                Operation::UserList | Operation::User => "/v1/auth/users",
                Operation::RoleList | Operation::Role => "/v1/auth/roles",
                Operation::PermissionList | Operation::Permission => "/v1/auth/permissions",
            },
            Self::V3 => match operation {
                Operation::ServerState => "/v3/console/server/state",
                Operation::Login => "/v3/auth/user/login",
                Operation::NamespaceList => "/v3/console/core/namespace/list",
                Operation::Namespace => "/v3/console/core/namespace",
                Operation::ConfigList => "/v3/console/cs/config/list",
                Operation::Config => "/v3/console/cs/config",
                Operation::UserList => "/v3/auth/user/list",
                Operation::User => "/v3/auth/user",
                Operation::RoleList => "/v3/auth/role/list",
                Operation::Role => "/v3/auth/role",
                Operation::PermissionList => "/v3/auth/permission/list",
                Operation::Permission => "/v3/auth/permission",
            },
        }
    }

    /// Returns the dialect name as used in logs and the version command.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V3 => "v3",
        }
    }

    /// Whether responses are wrapped in a `{code, message, data}` envelope.
    #[must_use]
    pub const fn uses_envelope(self) -> bool {
        matches!(self, Self::V3)
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_paths() {
        assert_eq!(
            ApiVersion::V1.path(Operation::ServerState),
            "/v1/console/server/state"
        );
        assert_eq!(ApiVersion::V1.path(Operation::Login), "/v1/auth/login");
        assert_eq!(
            ApiVersion::V1.path(Operation::NamespaceList),
            "/v1/console/namespaces"
        );
        // v1 uses one path for list and item operations
        assert_eq!(
            ApiVersion::V1.path(Operation::Config),
            ApiVersion::V1.path(Operation::ConfigList)
        );
    }

    #[test]
    fn test_v3_paths() {
        assert_eq!(
            ApiVersion::V3.path(Operation::Login),
            "/v3/auth/user/login"
        );
        assert_eq!(
            ApiVersion::V3.path(Operation::NamespaceList),
            "/v3/console/core/namespace/list"
        );
        // v3 splits list and item paths
        assert_ne!(
            ApiVersion::V3.path(Operation::Config),
            ApiVersion::V3.path(Operation::ConfigList)
        );
    }

    #[test]
    fn test_detection_order_prefers_newest() {
        assert_eq!(ApiVersion::DETECTION_ORDER, [ApiVersion::V3, ApiVersion::V1]);
    }

    #[test]
    fn test_default_is_oldest() {
        assert_eq!(ApiVersion::default(), ApiVersion::V1);
    }

    #[test]
    fn test_envelope_flag() {
        assert!(!ApiVersion::V1.uses_envelope());
        assert!(ApiVersion::V3.uses_envelope());
    }
}

//! Registry client: session, dialect detection, and resource operations.
//!
//! Every operation is a single synchronous request/response round trip,
//! awaited sequentially. There are no retries; the first failure of a
//! composite operation (cross-namespace listing, upsert) aborts it.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::de::DeserializeOwned;

use crate::api::{ApiVersion, Operation};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::types::{
    Configuration, ConfigurationQuery, CreateConfigurationOpts, CreateNamespaceOpts, Envelope,
    ListConfigurationsOpts, Namespace, NamespaceList, Page, Permission, Role, ServerState,
    TokenResponse, User,
};

/// Cap on how much of an error response body is read for diagnostics.
const MAX_ERROR_BODY: usize = 1 << 20;

/// Page size used when a whole listing is drained internally.
const BULK_PAGE_SIZE: u32 = 100;

/// An access token with its computed expiry instant.
#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Computes a token's expiry instant from the server-reported TTL.
///
/// A TTL that does not fit chrono's duration range (a buggy or hostile
/// server) yields `issued_at` itself, so the token counts as already
/// expired and is re-fetched on the next use instead of panicking.
fn token_expiry(issued_at: DateTime<Utc>, ttl_seconds: i64) -> DateTime<Utc> {
    ChronoDuration::try_seconds(ttl_seconds)
        .and_then(|ttl| issued_at.checked_add_signed(ttl))
        .unwrap_or(issued_at)
}

/// Client for a Nacos-compatible configuration registry.
///
/// Holds the endpoint, credentials, a lazily-fetched access token, and a
/// cached server-state probe. Methods take `&mut self` because they
/// refresh those caches; a client is owned by one caller and is not
/// designed for concurrent sharing — workers needing parallelism should
/// each construct their own client.
#[derive(Debug)]
pub struct RegistryClient {
    config: ClientConfig,
    http: reqwest::Client,
    api_version: ApiVersion,
    token: Option<CachedToken>,
    state: Option<ServerState>,
}

impl RegistryClient {
    /// Creates a client without probing the server.
    ///
    /// The dialect starts at [`ApiVersion::V1`]; call
    /// [`detect_api_version`](Self::detect_api_version) or
    /// [`set_api_version`](Self::set_api_version) before use against a v3
    /// server, or construct via [`connect`](Self::connect) which does the
    /// probe for you.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|source| ClientError::ConnectionFailed {
                url: config.url.clone(),
                source,
            })?;

        Ok(Self {
            config,
            http,
            api_version: ApiVersion::default(),
            token: None,
            state: None,
        })
    }

    /// Creates a client and detects which API dialect the server speaks.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created. Detection
    /// itself never fails; see
    /// [`detect_api_version`](Self::detect_api_version).
    pub async fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let mut client = Self::new(config)?;
        client.detect_api_version().await;
        Ok(client)
    }

    /// Returns the dialect in use.
    #[must_use]
    pub const fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Pins the dialect explicitly, discarding any cached probe result.
    pub fn set_api_version(&mut self, version: ApiVersion) {
        self.api_version = version;
        self.state = None;
    }

    /// Probes the server and fixes the API dialect for this client.
    ///
    /// Candidates are tried newest-first; the first one whose state probe
    /// yields a non-empty version string is adopted. If every candidate
    /// fails the oldest dialect is kept as a last resort and the next real
    /// operation surfaces the failure.
    pub async fn detect_api_version(&mut self) {
        for candidate in ApiVersion::DETECTION_ORDER {
            self.api_version = candidate;
            self.state = None;
            match self.server_version().await {
                Ok(version) if !version.is_empty() => {
                    tracing::debug!(dialect = %candidate, %version, "detected registry api dialect");
                    return;
                }
                Ok(_) | Err(_) => {}
            }
        }
        self.api_version = ApiVersion::V1;
        self.state = None;
        tracing::debug!("api dialect detection failed, assuming v1");
    }

    /// Returns the server version, probing the state endpoint once.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConnectionFailed`] on network failure or
    /// [`ClientError::Http`] on a non-success status.
    pub async fn server_version(&mut self) -> Result<String, ClientError> {
        if let Some(state) = &self.state {
            return Ok(state.version.clone());
        }
        let response = self
            .http
            .get(self.endpoint(Operation::ServerState))
            .send()
            .await?;
        let state: ServerState = decode(response).await?;
        let version = state.version.clone();
        self.state = Some(state);
        Ok(version)
    }

    /// Returns a valid access token, exchanging credentials when the
    /// cached one is absent or expired.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthenticationFailed`] when the exchange is
    /// rejected or its response cannot be decoded.
    async fn token(&mut self) -> Result<String, ClientError> {
        if let Some(token) = &self.token {
            if !token.is_expired() {
                return Ok(token.value.clone());
            }
        }

        let issued_at = Utc::now();
        let response = self
            .http
            .post(self.endpoint(Operation::Login))
            .form(&[
                ("username", self.config.username.as_str()),
                ("password", self.config.password.as_str()),
            ])
            .send()
            .await?;

        let token: TokenResponse = match decode(response).await {
            Ok(token) => token,
            Err(err @ ClientError::ConnectionFailed { .. }) => return Err(err),
            Err(err) => {
                return Err(ClientError::AuthenticationFailed {
                    message: err.to_string(),
                })
            }
        };

        let cached = CachedToken {
            value: token.access_token,
            expires_at: token_expiry(issued_at, token.token_ttl),
        };
        let value = cached.value.clone();
        self.token = Some(cached);
        Ok(value)
    }

    fn endpoint(&self, operation: Operation) -> String {
        format!("{}{}", self.config.url, self.api_version.path(operation))
    }

    // ---- namespaces -----------------------------------------------------

    /// Lists all namespaces.
    ///
    /// The namespace listing is not paginated; both dialects return a
    /// `{code, message, data}` envelope around the full array.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub async fn list_namespaces(&mut self) -> Result<Vec<Namespace>, ClientError> {
        let token = self.token().await?;
        let response = self
            .http
            .get(self.endpoint(Operation::NamespaceList))
            .query(&[("accessToken", token.as_str())])
            .send()
            .await?;
        let list: NamespaceList = decode(response).await?;
        Ok(list.items)
    }

    /// Finds a namespace by id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when no namespace has that id.
    pub async fn get_namespace(&mut self, id: &str) -> Result<Namespace, ClientError> {
        let namespaces = self.list_namespaces().await?;
        namespaces
            .into_iter()
            .find(|ns| ns.id == id)
            .ok_or_else(|| ClientError::NotFound {
                resource: format!("namespace/{id}"),
            })
    }

    /// Creates a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] with the server's status text when
    /// the create is rejected (including id conflicts).
    pub async fn create_namespace(&mut self, opts: &CreateNamespaceOpts) -> Result<(), ClientError> {
        let token = self.token().await?;
        let response = self
            .http
            .post(self.endpoint(Operation::Namespace))
            .form(&[
                ("customNamespaceId", opts.id.as_str()),
                ("namespaceName", opts.name.as_str()),
                ("namespaceDesc", opts.description.as_str()),
                ("accessToken", token.as_str()),
            ])
            .send()
            .await?;
        check_status(response).await?;
        tracing::info!(id = %opts.id, name = %opts.name, "created namespace");
        Ok(())
    }

    /// Updates an existing namespace's display name and description.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace does not exist or the server
    /// rejects the update.
    pub async fn update_namespace(&mut self, opts: &CreateNamespaceOpts) -> Result<(), ClientError> {
        let token = self.token().await?;
        let response = self
            .http
            .put(self.endpoint(Operation::Namespace))
            .query(&[
                ("namespace", opts.id.as_str()),
                ("namespaceShowName", opts.name.as_str()),
                ("namespaceDesc", opts.description.as_str()),
                ("accessToken", token.as_str()),
            ])
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .send()
            .await?;
        check_status(response).await?;
        tracing::info!(id = %opts.id, name = %opts.name, "updated namespace");
        Ok(())
    }

    /// Creates the namespace if absent, otherwise updates it.
    ///
    /// This is a list-then-branch upsert, not an atomic server-side one:
    /// a concurrent actor creating or deleting the same id between the
    /// listing and the write can make both sides observe "does not exist".
    /// The server's own uniqueness enforcement is the only safety net.
    ///
    /// # Errors
    ///
    /// Returns the first error from the listing, create, or update call.
    pub async fn create_or_update_namespace(
        &mut self,
        opts: &CreateNamespaceOpts,
    ) -> Result<(), ClientError> {
        let namespaces = self.list_namespaces().await?;
        if namespaces.iter().any(|ns| ns.id == opts.id) {
            self.update_namespace(opts).await
        } else {
            self.create_namespace(opts).await
        }
    }

    /// Deletes a namespace by id.
    ///
    /// A missing namespace surfaces as whatever status the server returns,
    /// not as [`ClientError::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the delete.
    pub async fn delete_namespace(&mut self, id: &str) -> Result<(), ClientError> {
        let token = self.token().await?;
        let response = self
            .http
            .delete(self.endpoint(Operation::Namespace))
            .query(&[("namespaceId", id), ("accessToken", token.as_str())])
            .send()
            .await?;
        check_status(response).await?;
        tracing::info!(%id, "deleted namespace");
        Ok(())
    }

    // ---- configurations -------------------------------------------------

    /// Fetches a single configuration.
    ///
    /// The registry answers a missing configuration with HTTP 200 and an
    /// empty body rather than 404; that shape is reported as
    /// [`ClientError::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the configuration does not
    /// exist, or another error for transport/server failures.
    pub async fn get_configuration(
        &mut self,
        query: &ConfigurationQuery,
    ) -> Result<Configuration, ClientError> {
        let token = self.token().await?;
        let response = self
            .http
            .get(self.endpoint(Operation::Config))
            .query(&[
                ("dataId", query.data_id.as_str()),
                ("group", query.group.as_str()),
                ("groupName", query.group.as_str()),
                ("namespaceId", query.namespace_id.as_str()),
                ("tenant", query.namespace_id.as_str()),
                ("show", "all"),
                ("accessToken", token.as_str()),
            ])
            .send()
            .await?;

        let result = if self.api_version.uses_envelope() {
            decode::<Envelope<Configuration>>(response).await.map(|e| e.data)
        } else {
            decode::<Configuration>(response).await
        };
        match result {
            Err(ClientError::EmptyResponse { .. }) => Err(ClientError::NotFound {
                resource: format!(
                    "configuration {}/{}/{}",
                    query.namespace_id, query.group, query.data_id
                ),
            }),
            other => other,
        }
    }

    /// Fetches one page of configurations matching the filter.
    ///
    /// Zero `page_number`/`page_size` in `opts` select the defaults
    /// (page 1, size 10).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub async fn list_configurations(
        &mut self,
        opts: &ListConfigurationsOpts,
    ) -> Result<Page<Configuration>, ClientError> {
        let token = self.token().await?;
        let page_number = if opts.page_number == 0 { 1 } else { opts.page_number };
        let page_size = if opts.page_size == 0 { 10 } else { opts.page_size };
        let response = self
            .http
            .get(self.endpoint(Operation::ConfigList))
            .query(&[
                ("dataId", opts.data_id.as_str()),
                ("group", opts.group.as_str()),
                ("groupName", opts.group.as_str()),
                ("appName", opts.application.as_str()),
                ("config_tags", opts.tags.as_str()),
                ("configTags", opts.tags.as_str()),
                ("pageNo", page_number.to_string().as_str()),
                ("pageSize", page_size.to_string().as_str()),
                ("tenant", opts.namespace_id.as_str()),
                ("namespaceId", opts.namespace_id.as_str()),
                ("search", "accurate"),
                ("accessToken", token.as_str()),
            ])
            .send()
            .await?;
        self.decode_page(response).await
    }

    /// Fetches every configuration in one namespace, draining all pages.
    ///
    /// # Errors
    ///
    /// Any single page failure aborts the whole fetch; no partial results
    /// are returned.
    pub async fn list_configurations_in_namespace(
        &mut self,
        namespace_id: &str,
        group: &str,
    ) -> Result<Vec<Configuration>, ClientError> {
        let mut opts = ListConfigurationsOpts {
            group: group.to_string(),
            namespace_id: namespace_id.to_string(),
            page_number: 1,
            page_size: BULK_PAGE_SIZE,
            ..ListConfigurationsOpts::default()
        };
        let mut items = Vec::new();
        loop {
            let page = self.list_configurations(&opts).await?;
            let last = page.is_last();
            let current = page.page_number;
            items.extend(page.items);
            if last {
                break;
            }
            opts.page_number = current + 1;
        }
        Ok(items)
    }

    /// Fetches every configuration across every namespace.
    ///
    /// Namespaces are visited strictly sequentially in listing order;
    /// results are concatenated without deduplication. The first namespace
    /// whose fetch fails aborts the whole operation.
    ///
    /// # Errors
    ///
    /// Returns the first error from the namespace listing or any
    /// per-namespace fetch.
    pub async fn list_all_configurations(&mut self) -> Result<Vec<Configuration>, ClientError> {
        let namespaces = self.list_namespaces().await?;
        let mut items = Vec::new();
        for ns in namespaces {
            items.extend(self.list_configurations_in_namespace(&ns.id, "").await?);
        }
        Ok(items)
    }

    /// Creates (publishes) a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the publish.
    pub async fn create_configuration(
        &mut self,
        opts: &CreateConfigurationOpts,
    ) -> Result<(), ClientError> {
        let token = self.token().await?;
        let response = self
            .http
            .post(self.endpoint(Operation::Config))
            .form(&[
                ("dataId", opts.data_id.as_str()),
                ("group", opts.group.as_str()),
                ("groupName", opts.group.as_str()),
                ("content", opts.content.as_str()),
                ("type", opts.kind.as_str()),
                ("tenant", opts.namespace_id.as_str()),
                ("namespaceId", opts.namespace_id.as_str()),
                ("appName", opts.application.as_str()),
                ("desc", opts.description.as_str()),
                ("config_tags", opts.tags.as_str()),
                ("accessToken", token.as_str()),
            ])
            .send()
            .await?;
        check_status(response).await?;
        tracing::info!(data_id = %opts.data_id, group = %opts.group,
            namespace = %opts.namespace_id, "published configuration");
        Ok(())
    }

    /// Deletes a configuration addressed by its identity triple.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the delete.
    pub async fn delete_configuration(
        &mut self,
        query: &ConfigurationQuery,
    ) -> Result<(), ClientError> {
        let token = self.token().await?;
        let response = self
            .http
            .delete(self.endpoint(Operation::Config))
            .query(&[
                ("dataId", query.data_id.as_str()),
                ("group", query.group.as_str()),
                ("groupName", query.group.as_str()),
                ("tenant", query.namespace_id.as_str()),
                ("namespaceId", query.namespace_id.as_str()),
                ("accessToken", token.as_str()),
            ])
            .send()
            .await?;
        check_status(response).await?;
        tracing::info!(data_id = %query.data_id, group = %query.group,
            namespace = %query.namespace_id, "deleted configuration");
        Ok(())
    }

    // ---- users ----------------------------------------------------------

    /// Lists all console users, draining all pages.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn list_users(&mut self) -> Result<Vec<User>, ClientError> {
        self.fetch_all_pages(Operation::UserList).await
    }

    /// Finds a user by name.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when no such user exists.
    pub async fn get_user(&mut self, username: &str) -> Result<User, ClientError> {
        let users = self.list_users().await?;
        users
            .into_iter()
            .find(|u| u.username == username)
            .ok_or_else(|| ClientError::NotFound {
                resource: format!("user/{username}"),
            })
    }

    /// Creates a console user.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the create.
    pub async fn create_user(&mut self, username: &str, password: &str) -> Result<(), ClientError> {
        let token = self.token().await?;
        let response = self
            .http
            .post(self.endpoint(Operation::User))
            .form(&[
                ("username", username),
                ("password", password),
                ("accessToken", token.as_str()),
            ])
            .send()
            .await?;
        check_status(response).await?;
        tracing::info!(%username, "created user");
        Ok(())
    }

    /// Deletes a console user.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the delete.
    pub async fn delete_user(&mut self, username: &str) -> Result<(), ClientError> {
        let token = self.token().await?;
        let response = self
            .http
            .delete(self.endpoint(Operation::User))
            .query(&[("username", username), ("accessToken", token.as_str())])
            .send()
            .await?;
        check_status(response).await?;
        tracing::info!(%username, "deleted user");
        Ok(())
    }

    // ---- roles ----------------------------------------------------------

    /// Lists all role bindings, draining all pages.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn list_roles(&mut self) -> Result<Vec<Role>, ClientError> {
        self.fetch_all_pages(Operation::RoleList).await
    }

    /// Checks that a `(role, username)` binding exists.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the binding is absent.
    pub async fn get_role(&mut self, role: &str, username: &str) -> Result<Role, ClientError> {
        let wanted = Role {
            role: role.to_string(),
            username: username.to_string(),
        };
        let roles = self.list_roles().await?;
        if roles.contains(&wanted) {
            Ok(wanted)
        } else {
            Err(ClientError::NotFound {
                resource: format!("role/{role}:{username}"),
            })
        }
    }

    /// Binds a role to a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the create.
    pub async fn create_role(&mut self, role: &str, username: &str) -> Result<(), ClientError> {
        let token = self.token().await?;
        let response = self
            .http
            .post(self.endpoint(Operation::Role))
            .form(&[
                ("username", username),
                ("role", role),
                ("accessToken", token.as_str()),
            ])
            .send()
            .await?;
        check_status(response).await?;
        tracing::info!(%role, %username, "created role binding");
        Ok(())
    }

    /// Removes a role binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the delete.
    pub async fn delete_role(&mut self, role: &str, username: &str) -> Result<(), ClientError> {
        let token = self.token().await?;
        let response = self
            .http
            .delete(self.endpoint(Operation::Role))
            .query(&[
                ("username", username),
                ("role", role),
                ("accessToken", token.as_str()),
            ])
            .send()
            .await?;
        check_status(response).await?;
        tracing::info!(%role, %username, "deleted role binding");
        Ok(())
    }

    // ---- permissions ----------------------------------------------------

    /// Lists all permission grants, draining all pages.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn list_permissions(&mut self) -> Result<Vec<Permission>, ClientError> {
        self.fetch_all_pages(Operation::PermissionList).await
    }

    /// Checks that a `(role, resource, action)` grant exists.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the grant is absent.
    pub async fn get_permission(
        &mut self,
        role: &str,
        resource: &str,
        action: &str,
    ) -> Result<Permission, ClientError> {
        let wanted = Permission {
            role: role.to_string(),
            resource: resource.to_string(),
            action: action.to_string(),
        };
        let permissions = self.list_permissions().await?;
        if permissions.contains(&wanted) {
            Ok(wanted)
        } else {
            Err(ClientError::NotFound {
                resource: format!("permission/{role}:{resource}:{action}"),
            })
        }
    }

    /// Grants a permission to a role.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the create.
    pub async fn create_permission(
        &mut self,
        role: &str,
        resource: &str,
        action: &str,
    ) -> Result<(), ClientError> {
        let token = self.token().await?;
        let response = self
            .http
            .post(self.endpoint(Operation::Permission))
            .form(&[
                ("action", action),
                ("resource", resource),
                ("role", role),
                ("accessToken", token.as_str()),
            ])
            .send()
            .await?;
        check_status(response).await?;
        tracing::info!(%role, %resource, %action, "created permission");
        Ok(())
    }

    /// Revokes a permission from a role.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the delete.
    pub async fn delete_permission(
        &mut self,
        role: &str,
        resource: &str,
        action: &str,
    ) -> Result<(), ClientError> {
        let token = self.token().await?;
        let response = self
            .http
            .delete(self.endpoint(Operation::Permission))
            .query(&[
                ("action", action),
                ("resource", resource),
                ("role", role),
                ("accessToken", token.as_str()),
            ])
            .send()
            .await?;
        check_status(response).await?;
        tracing::info!(%role, %resource, %action, "deleted permission");
        Ok(())
    }

    // ---- pagination engine ------------------------------------------------

    /// Drains a paginated list endpoint into one insertion-ordered vector.
    ///
    /// Starts at page 1 with the bulk page size and keeps requesting until
    /// the server reports the final page (`pages_available == 0` or
    /// `pages_available == page_number`). Items are appended in server
    /// order with no deduplication: overlapping pages caused by concurrent
    /// server-side mutation propagate unchanged.
    async fn fetch_all_pages<T: DeserializeOwned>(
        &mut self,
        operation: Operation,
    ) -> Result<Vec<T>, ClientError> {
        let token = self.token().await?;
        let mut page_number: u32 = 1;
        let mut items = Vec::new();
        loop {
            let response = self
                .http
                .get(self.endpoint(operation))
                .query(&[
                    ("search", "accurate"),
                    ("accessToken", token.as_str()),
                    ("pageNo", page_number.to_string().as_str()),
                    ("pageSize", BULK_PAGE_SIZE.to_string().as_str()),
                ])
                .send()
                .await?;
            let page: Page<T> = self.decode_page(response).await?;
            let last = page.is_last();
            let current = page.page_number;
            items.extend(page.items);
            if last {
                break;
            }
            page_number = current + 1;
        }
        Ok(items)
    }

    /// Decodes one page, unwrapping the v3 envelope when needed. The
    /// termination rule is identical in both dialects.
    async fn decode_page<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<Page<T>, ClientError> {
        if self.api_version.uses_envelope() {
            decode::<Envelope<Page<T>>>(response)
                .await
                .map(|envelope| envelope.data)
        } else {
            decode::<Page<T>>(response).await
        }
    }
}

/// Succeeds iff the status is 200; otherwise classifies the failure.
///
/// At most 1 MiB of the body is read for diagnostics; the read itself is
/// bounded, not read-then-truncate, so an unbounded error stream cannot
/// exhaust memory. Empty bodies and bodies starting with `<` (an HTML
/// error page from a reverse proxy, not the API) produce an error
/// carrying only the status and URL. A transport failure while reading
/// the body is surfaced instead of the status.
async fn check_status(mut response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    if response.status() == reqwest::StatusCode::OK {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let url = response.url().to_string();
    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let remaining = MAX_ERROR_BODY - body.len();
        if chunk.len() >= remaining {
            body.extend_from_slice(&chunk[..remaining]);
            break;
        }
        body.extend_from_slice(&chunk);
    }
    let detail = if body.is_empty() || body[0] == b'<' {
        String::new()
    } else {
        String::from_utf8_lossy(&body).into_owned()
    };
    Err(ClientError::Http { status, url, detail })
}

/// Checks the status and JSON-decodes the body.
///
/// A 200 response with an empty body is reported as
/// [`ClientError::EmptyResponse`] so single-configuration lookups can
/// reinterpret it as not-found.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let response = check_status(response).await?;
    let url = response.url().to_string();
    let body = response.bytes().await?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ClientError::EmptyResponse { url });
    }
    serde_json::from_slice(&body).map_err(|source| ClientError::Decode { url, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = ClientConfig::new("http://localhost:8848/nacos", "nacos", "nacos");
        let client = RegistryClient::new(config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_default_dialect_is_v1() {
        let config = ClientConfig::new("http://localhost:8848/nacos", "nacos", "nacos");
        let client = RegistryClient::new(config).unwrap();
        assert_eq!(client.api_version(), ApiVersion::V1);
    }

    #[test]
    fn test_set_api_version_discards_probe_cache() {
        let config = ClientConfig::new("http://localhost:8848/nacos", "nacos", "nacos");
        let mut client = RegistryClient::new(config).unwrap();
        client.state = Some(ServerState {
            version: "2.2.0".to_string(),
            standalone_mode: None,
            function_mode: None,
        });
        client.set_api_version(ApiVersion::V3);
        assert_eq!(client.api_version(), ApiVersion::V3);
        assert!(client.state.is_none());
    }

    #[test]
    fn test_endpoint_joins_base_url_and_path() {
        let config = ClientConfig::new("http://localhost:8848/nacos", "nacos", "nacos");
        let client = RegistryClient::new(config).unwrap();
        assert_eq!(
            client.endpoint(Operation::Login),
            "http://localhost:8848/nacos/v1/auth/login"
        );
    }

    #[test]
    fn test_token_expiry_saturates_on_out_of_range_ttl() {
        let issued_at = Utc::now();
        assert!(token_expiry(issued_at, 18000) > issued_at);
        // an absurd TTL must not panic; the token just counts as expired
        assert_eq!(token_expiry(issued_at, i64::MAX), issued_at);
        assert_eq!(token_expiry(issued_at, i64::MIN), issued_at);
    }

    #[test]
    fn test_cached_token_expiry() {
        let fresh = CachedToken {
            value: "t".to_string(),
            expires_at: Utc::now() + ChronoDuration::seconds(60),
        };
        assert!(!fresh.is_expired());

        let stale = CachedToken {
            value: "t".to_string(),
            expires_at: Utc::now() - ChronoDuration::seconds(1),
        };
        assert!(stale.is_expired());
    }
}

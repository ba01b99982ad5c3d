//! Configuration for the registry client.

use std::time::Duration;

/// Connection settings for a registry endpoint.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Registry base URL (e.g., "<http://localhost:8848/nacos>").
    pub url: String,

    /// Username for the credential exchange.
    pub username: String,

    /// Password for the credential exchange.
    pub password: String,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a new configuration for the given endpoint and credentials.
    ///
    /// Trailing slashes are stripped from the URL so endpoint paths can be
    /// appended verbatim.
    ///
    /// # Examples
    ///
    /// ```
    /// use confctl_client::ClientConfig;
    ///
    /// let config = ClientConfig::new("http://localhost:8848/nacos/", "nacos", "nacos");
    /// assert_eq!(config.url, "http://localhost:8848/nacos");
    /// ```
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let mut url = url.into();
        while url.ends_with('/') {
            url.pop();
        }
        Self {
            url,
            username: username.into(),
            password: password.into(),
            timeout: Duration::from_secs(30),
            user_agent: format!("confctl/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = ClientConfig::new("http://example.com:8848", "user", "pass");
        assert_eq!(config.url, "http://example.com:8848");
        assert_eq!(config.username, "user");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_strips_trailing_slash() {
        let config = ClientConfig::new("http://example.com/nacos/", "u", "p");
        assert_eq!(config.url, "http://example.com/nacos");
    }

    #[test]
    fn test_config_with_timeout() {
        let config = ClientConfig::new("http://example.com", "u", "p")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}

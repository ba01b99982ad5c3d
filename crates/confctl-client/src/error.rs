//! Error types for registry client operations.

use thiserror::Error;

/// Errors that can occur while talking to the registry.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Failed to reach the registry over the network.
    #[error("Failed to connect to registry at {url}: {source}")]
    ConnectionFailed {
        /// Request URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Credential exchange with the login endpoint failed.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Error message.
        message: String,
    },

    /// The requested entity does not exist on the server.
    #[error("Not found: {resource}")]
    NotFound {
        /// Description of the missing entity.
        resource: String,
    },

    /// Non-success HTTP status from the registry.
    #[error("{status} {url}{}", format_detail(.detail))]
    Http {
        /// HTTP status code.
        status: u16,
        /// Request URL.
        url: String,
        /// Body text, when the server sent a usable (non-HTML) body.
        detail: String,
    },

    /// A 200 response with a zero-length body.
    ///
    /// The registry signals a missing configuration this way instead of
    /// returning 404. Single-configuration lookups reinterpret this as
    /// [`ClientError::NotFound`]; every other caller surfaces it as-is.
    /// Whether the entity never existed or the response was transiently
    /// empty cannot be distinguished — the server gives no other signal.
    #[error("Empty response body from {url}")]
    EmptyResponse {
        /// Request URL.
        url: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        /// Request URL.
        url: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

fn format_detail(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(" {detail}")
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map_or_else(|| "unknown".to_string(), ToString::to_string);
        if err.is_status() {
            Self::Http {
                status: err.status().map_or(0, |s| s.as_u16()),
                url,
                detail: String::new(),
            }
        } else {
            Self::ConnectionFailed { url, source: err }
        }
    }
}

//! Error types for Graph sessions and API calls.

use thiserror::Error;

use crate::graph_client::ODataError;

/// Result type alias using `GraphError`.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur while authenticating or calling Microsoft Graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Device code or token endpoint rejected the request.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Silent token acquisition failed.
    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    /// The user did not complete sign-in before the device code expired.
    #[error("Device code expired before sign-in completed")]
    DeviceCodeExpired,

    /// The user declined the sign-in request.
    #[error("Sign-in was denied")]
    AuthorizationDenied,

    /// An API call was attempted without an active session.
    #[error("Please log in first.")]
    Unauthenticated,

    /// Microsoft Graph returned a non-success status.
    #[error("Graph API call failed: {status} {}", reason_phrase(.status))]
    Api { status: u16, body: String },

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl GraphError {
    /// True for every failure to obtain or use an identity.
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::Auth(_)
                | Self::TokenRefresh(_)
                | Self::DeviceCodeExpired
                | Self::AuthorizationDenied
                | Self::Unauthenticated
        )
    }

    /// HTTP status carried by an API error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Parses the `OData` error envelope from an API error body, if present.
    #[must_use]
    pub fn odata_error(&self) -> Option<ODataError> {
        match self {
            Self::Api { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}

fn reason_phrase(status: &u16) -> &'static str {
    reqwest::StatusCode::from_u16(*status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}

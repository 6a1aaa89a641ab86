//! CLI error types and exit codes

use thiserror::Error;
use tombstone_graph::{GraphError, ODataError};
use tombstone_report::ReportError;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error
/// - 2: Authentication required
/// - 3: Network error
/// - 4: Validation error
/// - 5: Server error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Please log in first.")]
    NotAuthenticated,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Login failed. {0}")]
    LoginFailed(String),

    #[error("Session expired: {0}")]
    TokenExpired(String),

    #[error("Device code expired before sign-in completed.")]
    DeviceCodeExpired,

    #[error("Sign-in was denied.")]
    AuthorizationDenied,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Connection failed: {0}\n\nTroubleshooting:\n  - Check your internet connection\n  - Verify the cloud environment in your configuration\n  - Try again in a few moments")]
    ConnectionFailed(String),

    #[error("{0}")]
    Validation(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Failed to send the report. {0}")]
    SendFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Input error: {0}")]
    InputError(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotAuthenticated
            | CliError::TokenExpired(_)
            | CliError::AuthenticationFailed(_)
            | CliError::LoginFailed(_)
            | CliError::DeviceCodeExpired
            | CliError::AuthorizationDenied => 2,
            CliError::Network(_) | CliError::ConnectionFailed(_) => 3,
            CliError::Validation(_) => 4,
            CliError::Server(_) => 5,
            CliError::Api { status, .. } => {
                if *status >= 500 {
                    5
                } else if *status == 401 || *status == 403 {
                    2
                } else {
                    4
                }
            }
            CliError::SendFailed(_)
            | CliError::Config(_)
            | CliError::Io(_)
            | CliError::InputError(_) => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        // Print suggested action if available
        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    /// Get a suggested action for this error
    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::NotAuthenticated => Some("Run 'login' to authenticate."),
            CliError::TokenExpired(_) => Some("Run 'login' to sign in again."),
            CliError::DeviceCodeExpired => Some("Run 'login' to start a new sign-in."),
            CliError::AuthorizationDenied => {
                Some("Make sure you approve the sign-in request in the browser.")
            }
            CliError::ConnectionFailed(_) => Some("Check your network connection and try again."),
            CliError::Api { status: 403, .. } => Some(
                "The signed-in account needs Directory.Read.All and Mail.Send consent in this tenant.",
            ),
            _ => None,
        }
    }

    /// Wraps a sign-in failure.
    pub fn login_failed(e: GraphError) -> Self {
        CliError::LoginFailed(CliError::from(e).to_string())
    }

    /// Wraps a mail delivery failure.
    pub fn send_failed(e: GraphError) -> Self {
        match e {
            GraphError::Unauthenticated => CliError::NotAuthenticated,
            other => CliError::SendFailed(CliError::from(other).to_string()),
        }
    }
}

impl From<GraphError> for CliError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::Api { status, body } => {
                let summary = GraphError::Api {
                    status,
                    body: String::new(),
                }
                .to_string();
                let message = match serde_json::from_str::<ODataError>(&body) {
                    Ok(odata) => format!("{summary} ({})", odata.error.message),
                    Err(_) => summary,
                };
                CliError::Api { status, message }
            }
            GraphError::Unauthenticated => CliError::NotAuthenticated,
            GraphError::DeviceCodeExpired => CliError::DeviceCodeExpired,
            GraphError::AuthorizationDenied => CliError::AuthorizationDenied,
            GraphError::TokenRefresh(m) => CliError::TokenExpired(m),
            GraphError::Auth(m) => CliError::AuthenticationFailed(m),
            GraphError::Config(m) => CliError::Config(m),
            GraphError::Url(err) => CliError::Config(format!("Invalid URL: {err}")),
            GraphError::Http(err) => CliError::from(err),
            GraphError::Json(err) => CliError::Server(format!("Unexpected response: {err}")),
        }
    }
}

impl From<ReportError> for CliError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::Validation(m) => CliError::Validation(m),
            ReportError::Graph(err) => CliError::from(err),
            ReportError::Csv(err) => CliError::Io(format!("CSV error: {err}")),
            ReportError::Io(err) => CliError::Io(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            CliError::ConnectionFailed(e.to_string())
        } else if e.is_timeout() {
            CliError::Network("Request timed out".to_string())
        } else {
            CliError::Network(e.to_string())
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Config(format!("JSON error: {}", e))
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(e: rustyline::error::ReadlineError) -> Self {
        CliError::InputError(format!("Readline error: {}", e))
    }
}

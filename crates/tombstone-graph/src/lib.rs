//! Microsoft Graph access for the deleted users report.
//!
//! This crate signs an administrator in to Entra ID with the OAuth2 device
//! authorization grant and calls Microsoft Graph on their behalf.
//!
//! # Features
//!
//! - Device code sign-in with silent refresh
//! - An explicit [`Session`] value required by every API call
//! - Deleted users query and `sendMail`
//! - Multi-cloud support (Commercial, US Government, China) plus custom endpoints
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tombstone_graph::{Authenticator, GraphClient, GraphConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GraphConfig::builder()
//!     .tenant_id("contoso.onmicrosoft.com")
//!     .client_id("your-client-id")
//!     .build()?;
//!
//! let authenticator = Arc::new(Authenticator::new(config)?);
//! let session = authenticator
//!     .login(|code| println!("Visit {} and enter {}", code.verification_uri, code.user_code))
//!     .await?;
//!
//! let client = GraphClient::new(authenticator)?;
//! let since = chrono::Utc::now() - chrono::Duration::days(180);
//! let users = client.list_deleted_users(&session, since).await?;
//! println!("{} deleted users", users.len());
//! # Ok(())
//! # }
//! ```

mod auth;
mod config;
mod directory;
mod error;
mod graph_client;
mod models;
mod session;

// Re-exports
pub use auth::{Authenticator, DeviceCodeResponse, DevicePoll, OAuthError, TokenResponse};
pub use config::{
    CloudEnvironment, GraphConfig, GraphConfigBuilder, DEFAULT_API_VERSION, DEFAULT_SCOPES,
};
pub use directory::{
    deleted_users_endpoint, DELETED_USERS_ENDPOINT, DELETED_USER_SELECT, SEND_MAIL_ENDPOINT,
};
pub use error::{GraphError, GraphResult};
pub use graph_client::{GraphClient, ODataError, ODataErrorBody, ODataResponse};
pub use models::{
    AssignedLicense, BodyType, DeletedUserRecord, EmailAddress, ItemBody, MailMessage, Recipient,
    SendMailRequest,
};
pub use session::{Account, Session};
pub use reqwest::Method;

//! OAuth2 device authorization grant and silent refresh against Entra ID.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::{GraphConfig, GraphError, GraphResult, Session};

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Extra delay the token endpoint asks for with `slow_down`.
#[cfg(not(test))]
const SLOW_DOWN_STEP: Duration = Duration::from_secs(5);
#[cfg(test)]
const SLOW_DOWN_STEP: Duration = Duration::from_millis(20);

/// Response from the device code endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceCodeResponse {
    /// Device code for polling
    pub device_code: String,

    /// User code to enter on the verification page
    pub user_code: String,

    /// URL for the user to visit
    pub verification_uri: String,

    /// URL with the user code pre-filled (optional)
    #[serde(default)]
    pub verification_uri_complete: Option<String>,

    /// Seconds until the device code expires
    pub expires_in: u64,

    /// Minimum seconds between polling attempts
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Human-readable instructions from the identity provider
    #[serde(default)]
    pub message: Option<String>,
}

fn default_interval() -> u64 {
    5
}

impl DeviceCodeResponse {
    /// URL to open in a browser; prefers the pre-filled variant.
    pub fn display_url(&self) -> &str {
        self.verification_uri_complete
            .as_deref()
            .unwrap_or(&self.verification_uri)
    }
}

/// Response from the token endpoint (device code or refresh grant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Seconds until the access token expires
    pub expires_in: i64,

    #[serde(default)]
    pub refresh_token: Option<String>,

    /// OpenID Connect ID token carrying the account claims
    #[serde(default)]
    pub id_token: Option<String>,

    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// OAuth error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl OAuthError {
    pub fn is_authorization_pending(&self) -> bool {
        self.error == "authorization_pending"
    }

    pub fn is_slow_down(&self) -> bool {
        self.error == "slow_down"
    }

    /// Entra reports a declined prompt as `authorization_declined`.
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self.error.as_str(),
            "access_denied" | "authorization_declined"
        )
    }

    pub fn is_expired_token(&self) -> bool {
        matches!(self.error.as_str(), "expired_token" | "code_expired")
    }

    fn describe(&self) -> String {
        self.error_description
            .clone()
            .unwrap_or_else(|| self.error.clone())
    }
}

/// Outcome of a single poll of the token endpoint.
#[derive(Debug)]
pub enum DevicePoll {
    Complete(TokenResponse),
    Pending,
    SlowDown,
}

/// Talks to the identity provider on behalf of one public client registration.
#[derive(Debug)]
pub struct Authenticator {
    config: GraphConfig,
    http_client: reqwest::Client,
}

impl Authenticator {
    /// Creates a new authenticator.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: GraphConfig) -> GraphResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GraphError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Runs the whole device code sign-in and returns the new session.
    ///
    /// `on_prompt` receives the verification URL and user code as soon as the
    /// identity provider issues them; polling starts right after it returns.
    #[instrument(skip(self, on_prompt), fields(tenant_id = %self.config.tenant_id))]
    pub async fn login<F>(&self, on_prompt: F) -> GraphResult<Session>
    where
        F: FnOnce(&DeviceCodeResponse),
    {
        let device_code = self.request_device_code().await?;
        on_prompt(&device_code);

        let mut poll_interval =
            Duration::from_secs(device_code.interval.max(self.config.min_poll_interval_secs));
        let deadline = Instant::now() + Duration::from_secs(device_code.expires_in);

        loop {
            if Instant::now() > deadline {
                warn!("Device code expired before sign-in completed");
                return Err(GraphError::DeviceCodeExpired);
            }

            tokio::time::sleep(poll_interval).await;

            match self.poll_device_token(&device_code.device_code).await? {
                DevicePoll::Complete(token) => {
                    let session = Session::from_token_response(token)?;
                    info!(account = %session.account().username, "Signed in");
                    return Ok(session);
                }
                DevicePoll::Pending => continue,
                DevicePoll::SlowDown => {
                    poll_interval += SLOW_DOWN_STEP;
                    debug!("Token endpoint asked to slow down, polling every {:?}", poll_interval);
                }
            }
        }
    }

    /// Requests a device code for the configured scopes.
    #[instrument(skip(self))]
    pub async fn request_device_code(&self) -> GraphResult<DeviceCodeResponse> {
        let scope = self.config.scope_string();
        let response = self
            .http_client
            .post(self.config.device_code_url())
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("scope", scope.as_str()),
            ])
            .send()
            .await
            .map_err(|e| GraphError::Auth(format!("Device code request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<OAuthError>(&body)
                .map(|e| e.describe())
                .unwrap_or(body);
            return Err(GraphError::Auth(format!(
                "Failed to request device code: {status} - {detail}"
            )));
        }

        let device_code: DeviceCodeResponse = response
            .json()
            .await
            .map_err(|e| GraphError::Auth(format!("Invalid device code response: {e}")))?;

        debug!(
            expires_in = device_code.expires_in,
            interval = device_code.interval,
            "Device code issued"
        );
        Ok(device_code)
    }

    /// Polls the token endpoint once.
    pub async fn poll_device_token(&self, device_code: &str) -> GraphResult<DevicePoll> {
        let response = self
            .http_client
            .post(self.config.token_url())
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("device_code", device_code),
                ("grant_type", DEVICE_CODE_GRANT),
            ])
            .send()
            .await
            .map_err(|e| GraphError::Auth(format!("Token request failed: {e}")))?;

        if response.status().is_success() {
            let token: TokenResponse = response
                .json()
                .await
                .map_err(|e| GraphError::Auth(format!("Invalid token response: {e}")))?;
            return Ok(DevicePoll::Complete(token));
        }

        let error: OAuthError = response
            .json()
            .await
            .map_err(|e| GraphError::Auth(format!("Invalid error response: {e}")))?;

        if error.is_authorization_pending() {
            return Ok(DevicePoll::Pending);
        }
        if error.is_slow_down() {
            return Ok(DevicePoll::SlowDown);
        }
        if error.is_access_denied() {
            return Err(GraphError::AuthorizationDenied);
        }
        if error.is_expired_token() {
            return Err(GraphError::DeviceCodeExpired);
        }

        Err(GraphError::Auth(error.describe()))
    }

    /// Redeems a refresh token for a new access token.
    #[instrument(skip_all)]
    pub(crate) async fn refresh(&self, refresh_token: &str) -> GraphResult<TokenResponse> {
        let scope = self.config.scope_string();
        let response = self
            .http_client
            .post(self.config.token_url())
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.config.client_id.as_str()),
                ("refresh_token", refresh_token),
                ("scope", scope.as_str()),
            ])
            .send()
            .await
            .map_err(|e| GraphError::TokenRefresh(format!("Token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<OAuthError>(&body)
                .map(|e| e.describe())
                .unwrap_or(body);
            return Err(GraphError::TokenRefresh(format!("{status} - {detail}")));
        }

        response
            .json()
            .await
            .map_err(|e| GraphError::TokenRefresh(format!("Invalid token response: {e}")))
    }

    /// Ends the session and returns the identity provider's sign-out URL.
    ///
    /// Tokens only ever live in memory, so dropping the session is the whole
    /// local logout; the URL lets the caller sign the browser out too.
    pub fn logout(&self, session: Session) -> String {
        info!(account = %session.account().username, "Signed out");
        drop(session);
        self.config.logout_url()
    }
}

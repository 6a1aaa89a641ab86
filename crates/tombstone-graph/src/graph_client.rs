//! Microsoft Graph API HTTP client.

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::{Authenticator, GraphError, GraphResult, Session};

/// `OData` error response from Microsoft Graph.
#[derive(Debug, Deserialize)]
pub struct ODataError {
    pub error: ODataErrorBody,
}

/// `OData` error body.
#[derive(Debug, Deserialize)]
pub struct ODataErrorBody {
    pub code: String,
    pub message: String,
    #[serde(rename = "innerError")]
    pub inner_error: Option<Value>,
}

/// Response wrapper for collection responses.
#[derive(Debug, Deserialize)]
pub struct ODataResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Microsoft Graph API client.
///
/// Calls are made on behalf of whichever [`Session`] is passed in. Nothing is
/// retried: a failed call surfaces immediately as a [`GraphError`].
#[derive(Debug)]
pub struct GraphClient {
    http_client: reqwest::Client,
    authenticator: Arc<Authenticator>,
    base_url: String,
}

impl GraphClient {
    /// Creates a new Graph client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(authenticator: Arc<Authenticator>) -> GraphResult<Self> {
        let config = authenticator.config();
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GraphError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.graph_base_url(),
            authenticator,
        })
    }

    /// Returns the base URL for Graph API requests.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn authenticator(&self) -> &Arc<Authenticator> {
        &self.authenticator
    }

    /// Performs one authenticated call to `{base_url}{endpoint}`.
    ///
    /// Returns the parsed JSON body, or an empty object when the response is
    /// not JSON (e.g. `202 Accepted` from `sendMail`).
    ///
    /// # Errors
    ///
    /// Fails with [`GraphError::TokenRefresh`] if no token can be acquired
    /// silently and with [`GraphError::Api`] on a non-success status.
    #[instrument(skip(self, session, body), fields(account = %session.account().username))]
    pub async fn call(
        &self,
        session: &Session,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> GraphResult<Value> {
        let token = session.access_token(&self.authenticator).await?;
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("{} {}", method, url);

        let mut request = self
            .http_client
            .request(method, &url)
            .bearer_auth(&token)
            .header(CONTENT_TYPE, "application/json");

        if let Some(b) = body {
            request = request.body(serde_json::to_vec(b)?);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let is_json = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.contains("application/json"));

            if !is_json {
                debug!(status = %status, "Non-JSON response, returning empty object");
                return Ok(Value::Object(serde_json::Map::new()));
            }
            return response.json().await.map_err(GraphError::from);
        }

        let error_body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %error_body, "Graph API call failed");
        Err(GraphError::Api {
            status: status.as_u16(),
            body: error_body,
        })
    }

    /// Performs a GET and deserializes the body.
    pub async fn get<T: DeserializeOwned>(&self, session: &Session, endpoint: &str) -> GraphResult<T> {
        let value = self.call(session, endpoint, Method::GET, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Performs a POST with a JSON body.
    pub async fn post<B: Serialize>(
        &self,
        session: &Session,
        endpoint: &str,
        body: &B,
    ) -> GraphResult<Value> {
        let body = serde_json::to_value(body)?;
        self.call(session, endpoint, Method::POST, Some(&body)).await
    }
}

//! Tenant, application and cloud configuration for Graph sessions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{GraphError, GraphResult};

/// Delegated permissions the report needs: reading deleted users and sending mail.
pub const DEFAULT_SCOPES: [&str; 2] = ["Directory.Read.All", "Mail.Send"];

/// OpenID scopes requested alongside the Graph scopes so the token endpoint
/// returns an ID token and a refresh token.
const OIDC_SCOPES: [&str; 3] = ["openid", "profile", "offline_access"];

/// Default Graph API version.
pub const DEFAULT_API_VERSION: &str = "v1.0";

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Lower bound applied to the polling interval returned by the device code endpoint.
pub const DEFAULT_MIN_POLL_INTERVAL_SECS: u64 = 5;

/// National cloud the tenant lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CloudEnvironment {
    /// Worldwide Azure (login.microsoftonline.com / graph.microsoft.com).
    #[default]
    Commercial,
    /// US Government GCC-High.
    UsGovernment,
    /// US Government DoD.
    UsGovernmentDod,
    /// Azure China operated by 21Vianet.
    China,
    /// Explicit endpoints, e.g. a proxy or a local mock server.
    Custom {
        login_endpoint: String,
        graph_endpoint: String,
    },
}

impl CloudEnvironment {
    /// Builds a custom environment, stripping trailing slashes from both endpoints.
    pub fn custom(login_endpoint: impl Into<String>, graph_endpoint: impl Into<String>) -> Self {
        Self::Custom {
            login_endpoint: login_endpoint.into().trim_end_matches('/').to_string(),
            graph_endpoint: graph_endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    /// Identity provider base URL.
    #[must_use]
    pub fn login_endpoint(&self) -> &str {
        match self {
            Self::Commercial => "https://login.microsoftonline.com",
            Self::UsGovernment | Self::UsGovernmentDod => "https://login.microsoftonline.us",
            Self::China => "https://login.chinacloudapi.cn",
            Self::Custom { login_endpoint, .. } => login_endpoint,
        }
    }

    /// Microsoft Graph base URL (without API version).
    #[must_use]
    pub fn graph_endpoint(&self) -> &str {
        match self {
            Self::Commercial => "https://graph.microsoft.com",
            Self::UsGovernment => "https://graph.microsoft.us",
            Self::UsGovernmentDod => "https://dod-graph.microsoft.us",
            Self::China => "https://microsoftgraph.chinacloudapi.cn",
            Self::Custom { graph_endpoint, .. } => graph_endpoint,
        }
    }
}

impl fmt::Display for CloudEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commercial => write!(f, "commercial"),
            Self::UsGovernment => write!(f, "us_government"),
            Self::UsGovernmentDod => write!(f, "us_government_dod"),
            Self::China => write!(f, "china"),
            Self::Custom {
                login_endpoint,
                graph_endpoint,
            } => write!(f, "custom ({login_endpoint}, {graph_endpoint})"),
        }
    }
}

impl FromStr for CloudEnvironment {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "commercial" | "global" | "public" => Ok(Self::Commercial),
            "us_government" | "usgov" | "gcc_high" => Ok(Self::UsGovernment),
            "us_government_dod" | "dod" => Ok(Self::UsGovernmentDod),
            "china" => Ok(Self::China),
            other => Err(GraphError::Config(format!(
                "Unknown cloud environment '{other}' (expected commercial, us_government, us_government_dod or china)"
            ))),
        }
    }
}

/// Connection settings for one tenant and one registered public client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    pub tenant_id: String,
    pub client_id: String,
    #[serde(default)]
    pub cloud_environment: CloudEnvironment,
    pub api_version: String,
    pub scopes: Vec<String>,
    pub timeout_secs: u64,
    pub min_poll_interval_secs: u64,
}

impl GraphConfig {
    #[must_use]
    pub fn builder() -> GraphConfigBuilder {
        GraphConfigBuilder::default()
    }

    /// `{login}/{tenant}`
    #[must_use]
    pub fn authority(&self) -> String {
        format!(
            "{}/{}",
            self.cloud_environment.login_endpoint(),
            self.tenant_id
        )
    }

    #[must_use]
    pub fn device_code_url(&self) -> String {
        format!("{}/oauth2/v2.0/devicecode", self.authority())
    }

    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.authority())
    }

    /// End-session endpoint used to sign the browser out after a local logout.
    #[must_use]
    pub fn logout_url(&self) -> String {
        format!("{}/oauth2/v2.0/logout", self.authority())
    }

    /// `{graph}/{api_version}`
    #[must_use]
    pub fn graph_base_url(&self) -> String {
        format!(
            "{}/{}",
            self.cloud_environment.graph_endpoint(),
            self.api_version
        )
    }

    /// Space-separated scope parameter for the token endpoints.
    ///
    /// Bare Graph permission names are qualified with the cloud's Graph
    /// resource so national clouds issue tokens for the right audience.
    #[must_use]
    pub fn scope_string(&self) -> String {
        let graph = self.cloud_environment.graph_endpoint();
        let mut scopes: Vec<String> = self
            .scopes
            .iter()
            .map(|scope| {
                if scope.contains("://") || OIDC_SCOPES.contains(&scope.as_str()) {
                    scope.clone()
                } else {
                    format!("{graph}/{scope}")
                }
            })
            .collect();

        for oidc in OIDC_SCOPES {
            if !scopes.iter().any(|s| s == oidc) {
                scopes.push(oidc.to_string());
            }
        }

        scopes.join(" ")
    }

    fn validate(&self) -> GraphResult<()> {
        if self.tenant_id.trim().is_empty() {
            return Err(GraphError::Config("tenant_id is required".to_string()));
        }
        if self.client_id.trim().is_empty() {
            return Err(GraphError::Config("client_id is required".to_string()));
        }
        if self.api_version.trim().is_empty() {
            return Err(GraphError::Config("api_version must not be empty".to_string()));
        }
        if self.scopes.is_empty() {
            return Err(GraphError::Config(
                "at least one scope must be requested".to_string(),
            ));
        }
        url::Url::parse(self.cloud_environment.login_endpoint())?;
        url::Url::parse(self.cloud_environment.graph_endpoint())?;
        Ok(())
    }
}

/// Builder for [`GraphConfig`].
#[derive(Debug, Default)]
pub struct GraphConfigBuilder {
    tenant_id: Option<String>,
    client_id: Option<String>,
    cloud_environment: Option<CloudEnvironment>,
    api_version: Option<String>,
    scopes: Option<Vec<String>>,
    timeout_secs: Option<u64>,
    min_poll_interval_secs: Option<u64>,
}

impl GraphConfigBuilder {
    #[must_use]
    pub fn tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    #[must_use]
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    #[must_use]
    pub fn cloud_environment(mut self, cloud_environment: CloudEnvironment) -> Self {
        self.cloud_environment = Some(cloud_environment);
        self
    }

    #[must_use]
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    #[must_use]
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    #[must_use]
    pub fn min_poll_interval_secs(mut self, secs: u64) -> Self {
        self.min_poll_interval_secs = Some(secs);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Config`] if the tenant or client id is missing,
    /// or [`GraphError::Url`] if an endpoint is not a valid URL.
    pub fn build(self) -> GraphResult<GraphConfig> {
        let config = GraphConfig {
            tenant_id: self.tenant_id.unwrap_or_default(),
            client_id: self.client_id.unwrap_or_default(),
            cloud_environment: self.cloud_environment.unwrap_or_default(),
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            scopes: self
                .scopes
                .unwrap_or_else(|| DEFAULT_SCOPES.iter().map(ToString::to_string).collect()),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            min_poll_interval_secs: self
                .min_poll_interval_secs
                .unwrap_or(DEFAULT_MIN_POLL_INTERVAL_SECS),
        };
        config.validate()?;
        Ok(config)
    }
}

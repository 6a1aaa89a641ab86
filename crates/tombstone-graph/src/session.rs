//! The signed-in account and its cached bearer token.

use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::RwLock;
use tracing::debug;

use crate::auth::TokenResponse;
use crate::{Authenticator, GraphError, GraphResult};

/// Identity of the signed-in administrator, taken from token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Sign-in name (`preferred_username`, falling back to `upn`/`email`)
    pub username: String,
    pub name: Option<String>,
    pub tenant_id: Option<String>,
    pub object_id: Option<String>,
}

impl Account {
    /// Reads the account from a JWT payload.
    ///
    /// The signature is not checked; the token came straight from the token
    /// endpoint over TLS.
    pub fn from_jwt_claims(token: &str) -> GraphResult<Self> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Err(GraphError::Auth("Invalid token format".to_string()));
        }

        let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(parts[1].trim_end_matches('='))
            .map_err(|e| GraphError::Auth(format!("Invalid token encoding: {e}")))?;

        let claims: JwtClaims = serde_json::from_slice(&payload)
            .map_err(|e| GraphError::Auth(format!("Invalid token claims: {e}")))?;

        let username = claims
            .preferred_username
            .or(claims.upn)
            .or(claims.unique_name)
            .or(claims.email)
            .ok_or_else(|| GraphError::Auth("Token carries no account name".to_string()))?;

        Ok(Self {
            username,
            name: claims.name,
            tenant_id: claims.tid,
            object_id: claims.oid,
        })
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => write!(f, "{name} ({})", self.username),
            _ => f.write_str(&self.username),
        }
    }
}

/// JWT claims (subset we care about)
#[derive(Debug, Deserialize)]
struct JwtClaims {
    preferred_username: Option<String>,
    upn: Option<String>,
    unique_name: Option<String>,
    email: Option<String>,
    name: Option<String>,
    tid: Option<String>,
    oid: Option<String>,
}

/// Cached OAuth2 access token.
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn from_token_response(response: TokenResponse, previous_refresh: Option<String>) -> Self {
        Self {
            access_token: response.access_token,
            // Entra may omit the refresh token on a refresh grant; keep the old one.
            refresh_token: response.refresh_token.or(previous_refresh),
            expires_at: Utc::now() + Duration::seconds(response.expires_in),
        }
    }

    /// Returns true if the token is expired or will expire within the grace period.
    fn is_expired(&self, grace_period: Duration) -> bool {
        Utc::now() + grace_period >= self.expires_at
    }
}

/// An authenticated session: one account plus its token cache.
///
/// Every Graph call takes a `&Session`, so an operation cannot reach the
/// network without one.
pub struct Session {
    account: Account,
    token: RwLock<CachedToken>,
    /// Grace period before expiry to trigger refresh (default: 5 minutes).
    grace_period: Duration,
}

impl Session {
    /// Builds a session from a token endpoint response.
    ///
    /// The account comes from the ID token when present, otherwise from the
    /// access token claims.
    pub fn from_token_response(response: TokenResponse) -> GraphResult<Self> {
        let account = match response.id_token.as_deref() {
            Some(id_token) => Account::from_jwt_claims(id_token)?,
            None => Account::from_jwt_claims(&response.access_token)?,
        };

        Ok(Self {
            account,
            token: RwLock::new(CachedToken::from_token_response(response, None)),
            grace_period: Duration::minutes(5),
        })
    }

    /// The active account.
    #[must_use]
    pub fn account(&self) -> &Account {
        &self.account
    }

    /// When the cached access token expires.
    pub async fn expires_at(&self) -> DateTime<Utc> {
        self.token.read().await.expires_at
    }

    /// Returns a usable access token, refreshing it silently when needed.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::TokenRefresh`] if the token is expired and cannot
    /// be refreshed.
    pub async fn access_token(&self, authenticator: &Authenticator) -> GraphResult<String> {
        {
            let cache = self.token.read().await;
            if !cache.is_expired(self.grace_period) {
                debug!("Using cached token");
                return Ok(cache.access_token.clone());
            }
        }

        let mut cache = self.token.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if !cache.is_expired(self.grace_period) {
            return Ok(cache.access_token.clone());
        }

        let refresh_token = cache.refresh_token.clone().ok_or_else(|| {
            GraphError::TokenRefresh("Session expired and no refresh token was issued".to_string())
        })?;

        debug!("Refreshing access token");
        let response = authenticator.refresh(&refresh_token).await?;
        *cache = CachedToken::from_token_response(response, Some(refresh_token));

        debug!(
            "Acquired new token, expires at {}",
            cache.expires_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        Ok(cache.access_token.clone())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jwt(claims: serde_json::Value) -> String {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        format!(
            "{}.{}.signature",
            engine.encode(r#"{"alg":"none","typ":"JWT"}"#),
            engine.encode(claims.to_string())
        )
    }

    fn token_response(expires_in: i64, id_token: Option<String>) -> TokenResponse {
        TokenResponse {
            access_token: jwt(json!({"upn": "fallback@contoso.com"})),
            token_type: "Bearer".to_string(),
            expires_in,
            refresh_token: Some("refresh-1".to_string()),
            id_token,
            scope: None,
        }
    }

    #[test]
    fn test_account_from_id_token() {
        let id_token = jwt(json!({
            "preferred_username": "admin@contoso.com",
            "name": "Contoso Admin",
            "tid": "72f988bf-86f1-41af-91ab-2d7cd011db47",
            "oid": "00000000-0000-0000-0000-000000000001"
        }));

        let account = Account::from_jwt_claims(&id_token).unwrap();
        assert_eq!(account.username, "admin@contoso.com");
        assert_eq!(account.name.as_deref(), Some("Contoso Admin"));
        assert!(account.tenant_id.is_some());
        assert_eq!(account.to_string(), "Contoso Admin (admin@contoso.com)");
    }

    #[test]
    fn test_account_rejects_malformed_token() {
        assert!(Account::from_jwt_claims("not-a-jwt").is_err());
        assert!(Account::from_jwt_claims(&jwt(json!({"name": "No Username"}))).is_err());
    }

    #[test]
    fn test_session_falls_back_to_access_token_claims() {
        let session = Session::from_token_response(token_response(3600, None)).unwrap();
        assert_eq!(session.account().username, "fallback@contoso.com");
    }

    #[test]
    fn test_cached_token_expiry() {
        let token = CachedToken::from_token_response(token_response(600, None), None);

        // Not expired with 5 minute grace
        assert!(!token.is_expired(Duration::minutes(5)));

        // Expired with 15 minute grace
        assert!(token.is_expired(Duration::minutes(15)));
    }

    #[test]
    fn test_refresh_keeps_previous_refresh_token() {
        let mut response = token_response(600, None);
        response.refresh_token = None;
        let token = CachedToken::from_token_response(response, Some("kept".to_string()));
        assert_eq!(token.refresh_token.as_deref(), Some("kept"));
    }

    #[test]
    fn test_debug_hides_tokens() {
        let session = Session::from_token_response(token_response(3600, None)).unwrap();
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("refresh-1"));
        assert!(rendered.contains("fallback@contoso.com"));
    }
}

//! Common test utilities for tombstone-graph integration tests.

#![allow(dead_code)]

use base64::Engine;
use serde_json::{json, Value};
use std::sync::Arc;
use tombstone_graph::{
    Authenticator, CloudEnvironment, GraphClient, GraphConfig, Session, TokenResponse,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TENANT_ID: &str = "test-tenant";
pub const CLIENT_ID: &str = "test-client";
pub const ADMIN: &str = "admin@contoso.onmicrosoft.com";

/// Encodes claims as an unsigned JWT.
pub fn jwt(claims: Value) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    format!(
        "{}.{}.signature",
        engine.encode(r#"{"alg":"none","typ":"JWT"}"#),
        engine.encode(claims.to_string())
    )
}

/// ID token for the given sign-in name.
pub fn id_token(username: &str) -> String {
    jwt(json!({
        "preferred_username": username,
        "name": "Test Admin",
        "tid": "00000000-0000-0000-0000-0000000000aa",
        "oid": "00000000-0000-0000-0000-0000000000bb"
    }))
}

/// Creates a mock OAuth token response.
pub fn create_token_response(access_token: &str, expires_in: i64) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": expires_in,
        "refresh_token": "mock-refresh-token",
        "id_token": id_token(ADMIN),
        "scope": "https://graph.microsoft.com/Directory.Read.All https://graph.microsoft.com/Mail.Send"
    })
}

/// Creates a device code response that can be polled immediately.
pub fn create_device_code_response() -> Value {
    json!({
        "device_code": "mock-device-code",
        "user_code": "ABCD-EFGH",
        "verification_uri": "https://microsoft.com/devicelogin",
        "expires_in": 900,
        "interval": 0
    })
}

/// Creates an OAuth error response.
pub fn create_oauth_error(error: &str) -> Value {
    json!({
        "error": error,
        "error_description": format!("AADSTS00000: {error}")
    })
}

/// Creates a deleted user in Graph's wire format.
pub fn create_deleted_user(name: &str, mail: Option<&str>, licensed: bool, deleted: &str) -> Value {
    let licenses = if licensed {
        json!([{"skuId": "c42b9cae-ea4f-4ab7-9717-81576235ccac", "disabledPlans": []}])
    } else {
        json!([])
    };
    json!({
        "displayName": name,
        "userPrincipalName": format!("{}@contoso.onmicrosoft.com", name.to_lowercase().replace(' ', ".")),
        "mail": mail,
        "assignedLicenses": licenses,
        "deletedDateTime": deleted
    })
}

/// Wraps items in an OData response format.
pub fn create_odata_response(items: Vec<Value>, next_link: Option<&str>) -> Value {
    let mut response = json!({ "value": items });
    if let Some(link) = next_link {
        response["@odata.nextLink"] = json!(link);
    }
    response
}

/// Creates an OData error response.
pub fn create_odata_error(code: &str, message: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message
        }
    })
}

/// A session whose access token is `access_token` and expires in `expires_in` seconds.
pub fn session_with_token(access_token: &str, expires_in: i64) -> Session {
    let response: TokenResponse =
        serde_json::from_value(create_token_response(access_token, expires_in)).unwrap();
    Session::from_token_response(response).unwrap()
}

/// Mock server standing in for both the identity provider and Graph.
pub struct MockGraphServer {
    pub server: MockServer,
}

impl MockGraphServer {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    pub fn config(&self) -> GraphConfig {
        GraphConfig::builder()
            .tenant_id(TENANT_ID)
            .client_id(CLIENT_ID)
            .cloud_environment(CloudEnvironment::custom(self.url(), self.url()))
            .min_poll_interval_secs(0)
            .timeout_secs(5)
            .build()
            .unwrap()
    }

    pub fn authenticator(&self) -> Arc<Authenticator> {
        Arc::new(Authenticator::new(self.config()).unwrap())
    }

    pub fn client(&self) -> GraphClient {
        GraphClient::new(self.authenticator()).unwrap()
    }

    /// Sets up the device code endpoint.
    pub async fn mock_device_code(&self) {
        Mock::given(method("POST"))
            .and(path(format!("/{TENANT_ID}/oauth2/v2.0/devicecode")))
            .respond_with(ResponseTemplate::new(200).set_body_json(create_device_code_response()))
            .mount(&self.server)
            .await;
    }

    /// Sets up the token endpoint to answer device code polls with an OAuth error.
    pub async fn mock_device_token_error(&self, error: &str, times: u64) {
        Mock::given(method("POST"))
            .and(path(format!("/{TENANT_ID}/oauth2/v2.0/token")))
            .and(body_string_contains("device_code=mock-device-code"))
            .respond_with(ResponseTemplate::new(400).set_body_json(create_oauth_error(error)))
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
    }

    /// Sets up the token endpoint to complete device code sign-in.
    pub async fn mock_device_token_success(&self, access_token: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/{TENANT_ID}/oauth2/v2.0/token")))
            .and(body_string_contains("device_code=mock-device-code"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(create_token_response(access_token, 3600)),
            )
            .mount(&self.server)
            .await;
    }

    /// Sets up the token endpoint for the refresh grant.
    pub async fn mock_refresh(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(format!("/{TENANT_ID}/oauth2/v2.0/token")))
            .and(body_string_contains("grant_type=refresh_token"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(&self.server)
            .await;
    }
}

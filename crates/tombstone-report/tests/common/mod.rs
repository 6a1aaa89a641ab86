//! Shared fixtures for tombstone-report integration tests.

#![allow(dead_code)]

use base64::Engine;
use serde_json::{json, Value};
use std::sync::Arc;
use tombstone_graph::{
    Authenticator, CloudEnvironment, GraphClient, GraphConfig, Session, TokenResponse,
};
use wiremock::MockServer;

pub const DELETED_USERS_PATH: &str = "/v1.0/directory/deletedItems/microsoft.graph.user";
pub const SEND_MAIL_PATH: &str = "/v1.0/me/sendMail";

pub fn graph_client(server: &MockServer) -> GraphClient {
    let config = GraphConfig::builder()
        .tenant_id("test-tenant")
        .client_id("test-client")
        .cloud_environment(CloudEnvironment::custom(server.uri(), server.uri()))
        .timeout_secs(5)
        .build()
        .unwrap();
    GraphClient::new(Arc::new(Authenticator::new(config).unwrap())).unwrap()
}

/// A signed-in session with a long-lived token.
pub fn session() -> Session {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let id_token = format!(
        "{}.{}.sig",
        engine.encode(r#"{"alg":"none"}"#),
        engine.encode(json!({"preferred_username": "admin@contoso.com"}).to_string())
    );
    let response: TokenResponse = serde_json::from_value(json!({
        "access_token": "access-token",
        "token_type": "Bearer",
        "expires_in": 3600,
        "id_token": id_token
    }))
    .unwrap();
    Session::from_token_response(response).unwrap()
}

pub fn deleted_user(name: &str, mail: Option<&str>, licensed: bool, deleted: &str) -> Value {
    let licenses = if licensed {
        json!([{"skuId": "sku-e3", "disabledPlans": []}])
    } else {
        json!([])
    };
    json!({
        "displayName": name,
        "userPrincipalName": format!("{}@contoso.com", name.to_lowercase().replace(' ', ".")),
        "mail": mail,
        "assignedLicenses": licenses,
        "deletedDateTime": deleted
    })
}

pub fn odata(items: Vec<Value>) -> Value {
    json!({ "value": items })
}

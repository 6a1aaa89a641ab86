//! Shared fixtures for tombstone-cli integration tests.

#![allow(dead_code)]

use base64::Engine;
use serde_json::{json, Value};
use tombstone_cli::output::{Notice, Notifier};
use tombstone_cli::{ConsoleOptions, ReportConsole};
use tombstone_graph::{CloudEnvironment, DeviceCodeResponse, GraphConfig};
use tombstone_report::ReportRow;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TENANT_ID: &str = "test-tenant";
pub const ADMIN: &str = "admin@contoso.onmicrosoft.com";
pub const DELETED_USERS_PATH: &str = "/v1.0/directory/deletedItems/microsoft.graph.user";
pub const SEND_MAIL_PATH: &str = "/v1.0/me/sendMail";

/// Notifier that keeps everything it is told.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notices: Vec<(Notice, String)>,
    pub reports: Vec<Vec<ReportRow>>,
    pub device_codes: Vec<String>,
}

impl RecordingNotifier {
    pub fn messages(&self, level: Notice) -> Vec<&str> {
        self.notices
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    pub fn last_report(&self) -> Option<&[ReportRow]> {
        self.reports.last().map(Vec::as_slice)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, level: Notice, message: &str) {
        self.notices.push((level, message.to_string()));
    }

    fn show_report(&mut self, rows: &[ReportRow]) {
        self.reports.push(rows.to_vec());
    }

    fn prompt_device_code(&mut self, device: &DeviceCodeResponse) {
        self.device_codes.push(device.user_code.clone());
    }
}

pub fn graph_config(server: &MockServer) -> GraphConfig {
    GraphConfig::builder()
        .tenant_id(TENANT_ID)
        .client_id("test-client")
        .cloud_environment(CloudEnvironment::custom(server.uri(), server.uri()))
        .min_poll_interval_secs(0)
        .timeout_secs(5)
        .build()
        .unwrap()
}

pub fn console(server: &MockServer) -> ReportConsole<RecordingNotifier> {
    console_with(server, ConsoleOptions::default())
}

pub fn console_with(
    server: &MockServer,
    options: ConsoleOptions,
) -> ReportConsole<RecordingNotifier> {
    ReportConsole::new(graph_config(server), options, RecordingNotifier::default()).unwrap()
}

fn id_token(username: &str) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    format!(
        "{}.{}.signature",
        engine.encode(r#"{"alg":"none","typ":"JWT"}"#),
        engine.encode(json!({"preferred_username": username, "name": "Test Admin"}).to_string())
    )
}

/// Mounts a device code flow that completes on the first poll.
pub async fn mock_sign_in(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/{TENANT_ID}/oauth2/v2.0/devicecode")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "mock-device-code",
            "user_code": "ABCD-EFGH",
            "verification_uri": "https://microsoft.com/devicelogin",
            "expires_in": 900,
            "interval": 0
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/{TENANT_ID}/oauth2/v2.0/token")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-token",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "refresh-token",
            "id_token": id_token(ADMIN)
        })))
        .mount(server)
        .await;
}

pub async fn mock_deleted_users(server: &MockServer, users: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(DELETED_USERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": users })))
        .mount(server)
        .await;
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

/// A console signed in and loaded with Alice (licensed) and Bob (unlicensed).
pub async fn loaded_console(server: &MockServer) -> ReportConsole<RecordingNotifier> {
    mock_sign_in(server).await;
    mock_deleted_users(
        server,
        vec![
            deleted_user("Alice Smith", Some("alice@x.com"), true, "2024-01-10T12:00:00Z"),
            deleted_user("Bob Jones", None, false, "2024-02-01T08:30:00Z"),
        ],
    )
    .await;

    let mut console = console(server);
    console.login().await.unwrap();
    console
}

//! Persistent CLI settings (config.json) with environment overrides

use crate::config::ConfigPaths;
use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use tombstone_graph::{CloudEnvironment, GraphConfig, DEFAULT_API_VERSION};
use tombstone_report::{validate_date_format, DEFAULT_DATE_FORMAT};

pub const TENANT_ID_ENV: &str = "TOMBSTONE_TENANT_ID";
pub const CLIENT_ID_ENV: &str = "TOMBSTONE_CLIENT_ID";
pub const CLOUD_ENV: &str = "TOMBSTONE_CLOUD";
pub const ADMIN_EMAIL_ENV: &str = "TOMBSTONE_ADMIN_EMAIL";

/// Settings read from `config.json`.
///
/// Only connection settings and display preferences live here; tokens and
/// fetched users are never written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory (tenant) id or verified domain
    pub tenant_id: Option<String>,
    /// Application (client) id of the public client registration
    pub client_id: Option<String>,
    pub cloud: CloudEnvironment,
    pub api_version: String,
    pub timeout_secs: u64,
    /// strftime pattern for the Deleted Date column
    pub date_format: String,
    /// Recipient used when `email` is given no address
    pub admin_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tenant_id: None,
            client_id: None,
            cloud: CloudEnvironment::Commercial,
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: 30,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            admin_email: None,
        }
    }
}

impl Config {
    /// Load config from file, or return defaults if none exists
    pub fn load(paths: &ConfigPaths) -> CliResult<Self> {
        if !paths.config_file.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&paths.config_file)?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            CliError::Config(format!(
                "Invalid configuration file {}: {e}",
                paths.config_file.display()
            ))
        })?;
        Ok(config)
    }

    /// Load config from file and apply environment overrides
    pub fn load_effective(paths: &ConfigPaths) -> CliResult<Self> {
        let mut config = Self::load(paths)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, paths: &ConfigPaths) -> CliResult<()> {
        paths.ensure_dir_exists()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&paths.config_file, content)?;
        Ok(())
    }

    /// Applies `TOMBSTONE_*` overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> CliResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(tenant_id) = non_empty(TENANT_ID_ENV) {
            self.tenant_id = Some(tenant_id);
        }
        if let Some(client_id) = non_empty(CLIENT_ID_ENV) {
            self.client_id = Some(client_id);
        }
        if let Some(cloud) = non_empty(CLOUD_ENV) {
            self.cloud = cloud
                .parse()
                .map_err(|e: tombstone_graph::GraphError| CliError::Config(e.to_string()))?;
        }
        if let Some(admin_email) = non_empty(ADMIN_EMAIL_ENV) {
            self.admin_email = Some(admin_email);
        }
        Ok(())
    }

    /// Checks values that would only fail later, at render time.
    pub fn validate(&self) -> CliResult<()> {
        validate_date_format(&self.date_format).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Builds the Graph connection settings.
    pub fn graph_config(&self) -> CliResult<GraphConfig> {
        let tenant_id = self.tenant_id.as_deref().ok_or_else(|| {
            CliError::Config(format!(
                "No tenant configured. Run 'tombstone configure --tenant-id <ID> --client-id <ID>' or set {TENANT_ID_ENV}."
            ))
        })?;
        let client_id = self.client_id.as_deref().ok_or_else(|| {
            CliError::Config(format!(
                "No client id configured. Run 'tombstone configure --client-id <ID>' or set {CLIENT_ID_ENV}."
            ))
        })?;

        GraphConfig::builder()
            .tenant_id(tenant_id)
            .client_id(client_id)
            .cloud_environment(self.cloud.clone())
            .api_version(self.api_version.as_str())
            .timeout_secs(self.timeout_secs)
            .build()
            .map_err(CliError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::in_dir(temp.path());
        let config = Config::load(&paths).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::in_dir(temp.path().join("tombstone"));

        let config = Config {
            tenant_id: Some("contoso.onmicrosoft.com".to_string()),
            client_id: Some("client".to_string()),
            cloud: CloudEnvironment::UsGovernment,
            ..Config::default()
        };
        config.save(&paths).unwrap();

        assert_eq!(Config::load(&paths).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::in_dir(temp.path());
        std::fs::write(&paths.config_file, r#"{"tenant_id": "t"}"#).unwrap();

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.tenant_id.as_deref(), Some("t"));
        assert_eq!(config.api_version, "v1.0");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::in_dir(temp.path());
        std::fs::write(&paths.config_file, "{not json").unwrap();
        assert!(matches!(Config::load(&paths), Err(CliError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup(&[
                (TENANT_ID_ENV, "env-tenant"),
                (CLIENT_ID_ENV, "env-client"),
                (CLOUD_ENV, "china"),
                (ADMIN_EMAIL_ENV, ""),
            ]))
            .unwrap();

        assert_eq!(config.tenant_id.as_deref(), Some("env-tenant"));
        assert_eq!(config.client_id.as_deref(), Some("env-client"));
        assert_eq!(config.cloud, CloudEnvironment::China);
        assert!(config.admin_email.is_none());
    }

    #[test]
    fn test_unknown_cloud_override_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_overrides(lookup(&[(CLOUD_ENV, "atlantis")]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_graph_config_requires_ids() {
        let err = Config::default().graph_config().unwrap_err();
        assert!(err.to_string().contains("No tenant configured"));

        let config = Config {
            tenant_id: Some("t".to_string()),
            client_id: Some("c".to_string()),
            ..Config::default()
        };
        let graph = config.graph_config().unwrap();
        assert_eq!(graph.graph_base_url(), "https://graph.microsoft.com/v1.0");
    }

    #[test]
    fn test_validate_date_format() {
        let config = Config {
            date_format: "%Q".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }
}

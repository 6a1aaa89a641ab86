//! Configure command: tenant and client ids, cloud and display settings

use crate::config::{Config, ConfigPaths};
use crate::error::{CliError, CliResult};
use crate::output::{print_header, print_key_value, print_success};
use clap::Args;
use tombstone_graph::CloudEnvironment;

/// Arguments for the configure command
#[derive(Args, Debug, Default)]
pub struct ConfigureArgs {
    /// Directory (tenant) id or domain
    #[arg(long)]
    pub tenant_id: Option<String>,

    /// Application (client) id of the app registration
    #[arg(long)]
    pub client_id: Option<String>,

    /// Cloud: commercial, us_government, us_government_dod or china
    #[arg(long)]
    pub cloud: Option<String>,

    /// strftime pattern for deletion dates, e.g. "%d/%m/%Y"
    #[arg(long)]
    pub date_format: Option<String>,

    /// Default recipient for emailed reports
    #[arg(long)]
    pub admin_email: Option<String>,

    /// Print the effective configuration instead of changing it
    #[arg(long)]
    pub show: bool,
}

impl ConfigureArgs {
    fn has_changes(&self) -> bool {
        self.tenant_id.is_some()
            || self.client_id.is_some()
            || self.cloud.is_some()
            || self.date_format.is_some()
            || self.admin_email.is_some()
    }

    /// Writes the given values into `config`.
    pub fn apply(&self, config: &mut Config) -> CliResult<()> {
        if let Some(tenant_id) = &self.tenant_id {
            config.tenant_id = Some(tenant_id.trim().to_string());
        }
        if let Some(client_id) = &self.client_id {
            config.client_id = Some(client_id.trim().to_string());
        }
        if let Some(cloud) = &self.cloud {
            config.cloud = cloud
                .parse::<CloudEnvironment>()
                .map_err(|e| CliError::Validation(e.to_string()))?;
        }
        if let Some(date_format) = &self.date_format {
            config.date_format = date_format.clone();
        }
        if let Some(admin_email) = &self.admin_email {
            let admin_email = admin_email.trim();
            config.admin_email = (!admin_email.is_empty()).then(|| admin_email.to_string());
        }
        config
            .validate()
            .map_err(|e| CliError::Validation(e.to_string()))
    }
}

/// Execute the configure command
pub async fn execute(args: ConfigureArgs) -> CliResult<()> {
    let paths = ConfigPaths::new()?;

    if args.show || !args.has_changes() {
        show(&Config::load_effective(&paths)?, &paths);
        return Ok(());
    }

    let mut config = Config::load(&paths)?;
    args.apply(&mut config)?;
    config.save(&paths)?;

    print_success(&format!(
        "Configuration saved to {}",
        paths.config_file.display()
    ));
    Ok(())
}

fn show(config: &Config, paths: &ConfigPaths) {
    let unset = "(not set)";
    print_header("tombstone configuration");
    print_key_value("Config file", &paths.config_file.display().to_string());
    print_key_value("Tenant ID", config.tenant_id.as_deref().unwrap_or(unset));
    print_key_value("Client ID", config.client_id.as_deref().unwrap_or(unset));
    print_key_value("Cloud", &config.cloud.to_string());
    print_key_value("API version", &config.api_version);
    print_key_value("Date format", &config.date_format);
    print_key_value("Admin email", config.admin_email.as_deref().unwrap_or(unset));
}

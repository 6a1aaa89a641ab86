//! Top-level CLI commands

pub mod configure;
pub mod report;
pub mod shell;

use crate::config::Config;
use crate::console::ConsoleOptions;

/// Console preferences taken from the effective configuration.
pub(crate) fn console_options(config: &Config) -> ConsoleOptions {
    ConsoleOptions {
        date_format: config.date_format.clone(),
        admin_email: config.admin_email.clone(),
    }
}

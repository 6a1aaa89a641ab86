//! tombstone CLI library
//!
//! Lists Entra ID users deleted in the last 180 days, filters them, and
//! exports the result as CSV or mails it as an HTML table. The binary in
//! `main.rs` is a thin clap front end over these modules.

pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod logging;
pub mod output;
pub mod repl;

pub use console::{ConsoleOptions, ReportConsole};
pub use error::{CliError, CliResult};

//! User-facing notifications.
//!
//! The console never prints directly. Everything the user should see goes
//! through a [`Notifier`], which lets tests capture output and lets the
//! one-shot `report --json` mode keep stdout machine-readable.

use crate::output::printer::{print_error, print_info, print_success, print_warning};
use crate::output::table::format_report_table;
use tombstone_graph::DeviceCodeResponse;
use tombstone_report::ReportRow;
use tracing::warn;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Success,
    Info,
    Warning,
    Error,
}

/// How report rows are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Sink for everything the console wants the user to see.
pub trait Notifier {
    /// Shows a one-line message.
    fn notify(&mut self, level: Notice, message: &str);

    /// Shows the current view.
    fn show_report(&mut self, rows: &[ReportRow]);

    /// Tells the user where to sign in.
    fn prompt_device_code(&mut self, device: &DeviceCodeResponse);

    fn success(&mut self, message: &str) {
        self.notify(Notice::Success, message);
    }

    fn info(&mut self, message: &str) {
        self.notify(Notice::Info, message);
    }

    fn warning(&mut self, message: &str) {
        self.notify(Notice::Warning, message);
    }

    fn error(&mut self, message: &str) {
        self.notify(Notice::Error, message);
    }
}

/// Notifier that writes to the terminal.
#[derive(Debug, Clone, Default)]
pub struct TerminalNotifier {
    open_browser: bool,
    format: OutputFormat,
}

impl TerminalNotifier {
    pub fn new(open_browser: bool, format: OutputFormat) -> Self {
        Self {
            open_browser,
            format,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&mut self, level: Notice, message: &str) {
        match (level, self.format) {
            // stdout carries only the JSON document
            (Notice::Success | Notice::Info, OutputFormat::Json) => {}
            (Notice::Success, _) => print_success(message),
            (Notice::Info, _) => print_info(message),
            (Notice::Warning, _) => print_warning(message),
            (Notice::Error, _) => print_error(message),
        }
    }

    fn show_report(&mut self, rows: &[ReportRow]) {
        match self.format {
            OutputFormat::Table => {
                println!();
                print!("{}", format_report_table(rows));
                println!("\n{} user(s)", rows.len());
            }
            OutputFormat::Json => match serde_json::to_string_pretty(rows) {
                Ok(json) => println!("{json}"),
                Err(e) => print_error(&format!("Could not serialize report: {e}")),
            },
        }
    }

    fn prompt_device_code(&mut self, device: &DeviceCodeResponse) {
        let url = device.display_url();
        eprintln!();
        eprintln!("To sign in, open this URL in a browser:");
        eprintln!();
        eprintln!("  {url}");
        eprintln!();
        eprintln!("and enter the code: {}", device.user_code);
        eprintln!();

        if self.open_browser {
            if let Err(e) = open::that(url) {
                warn!(error = %e, "Could not open a browser");
            }
        }
        eprintln!("Waiting for sign-in...");
    }
}

//! Dynamic prompt generation for the interactive shell

use std::io::IsTerminal;
use tombstone_graph::Account;

const NOT_LOGGED_IN: &str = "(not logged in)";

/// Prompt generator for the interactive shell
pub struct Prompt;

impl Prompt {
    /// Format: `tombstone [admin@contoso.com]> ` or `tombstone [(not logged in)]> `
    pub fn generate(account: Option<&Account>) -> String {
        format!("tombstone [{}]> ", Self::context(account))
    }

    pub fn generate_colored(account: Option<&Account>) -> String {
        let color = if account.is_some() { 36 } else { 33 };
        format!(
            "\x1b[32mtombstone\x1b[0m [\x1b[{color}m{}\x1b[0m]> ",
            Self::context(account)
        )
    }

    /// Check if the terminal supports colors
    pub fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && std::io::stdout().is_terminal()
    }

    pub fn generate_auto(account: Option<&Account>) -> String {
        if Self::supports_color() {
            Self::generate_colored(account)
        } else {
            Self::generate(account)
        }
    }

    fn context(account: Option<&Account>) -> &str {
        account.map_or(NOT_LOGGED_IN, |a| a.username.as_str())
    }
}

//! Command execution for the interactive shell
//!
//! Lines are split with quote awareness, parsed by clap into a
//! [`ShellCommand`] and dispatched to the [`ReportConsole`]. Shell-only
//! commands (help, exit) are handled here.

use crate::console::ReportConsole;
use crate::error::{CliError, CliResult};
use crate::output::Notifier;
use clap::error::ErrorKind;
use clap::{Command, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tombstone_report::FilterCriteria;
use tracing::debug;

/// Result of executing a command in the shell
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ExecuteResult {
    /// Command executed successfully, continue REPL
    Continue,
    /// User requested exit
    Exit,
    /// Empty input, just show new prompt
    Empty,
}

/// One line of shell input.
#[derive(Parser, Debug)]
#[command(name = "tombstone", no_binary_name = true, disable_help_subcommand = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    /// Sign in with a device code and load deleted users
    Login,
    /// Sign out and clear loaded data
    Logout,
    /// Fetch users deleted in the last 180 days
    Refresh,
    /// Filter loaded users by text and deletion date
    Search {
        /// Matched against display name, UPN and email (case-insensitive)
        text: Vec<String>,
        /// Start of the deletion date range (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        from: Option<String>,
        /// End of the deletion date range; only applied together with --from
        #[arg(long)]
        to: Option<String>,
    },
    /// Show the current results again
    Show,
    /// Save the current results as CSV
    Export {
        /// Output file (default: Recently_Deleted_Users_Report.csv)
        path: Option<PathBuf>,
    },
    /// Email the current results as an HTML table
    Email {
        /// Recipient address (default: configured admin email)
        address: Option<String>,
    },
    /// Show sign-in and data status
    Status,
}

/// Command executor for the interactive shell
pub struct CommandExecutor {
    /// The clap Command for introspection and help
    cli_command: Command,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self {
            cli_command: ShellLine::command(),
        }
    }

    /// The shell's command tree, for completion.
    pub fn command(&self) -> &Command {
        &self.cli_command
    }

    /// Execute a command line entered by the user
    pub async fn execute<N: Notifier>(
        &self,
        line: &str,
        console: &mut ReportConsole<N>,
    ) -> CliResult<ExecuteResult> {
        let line = line.trim();

        if line.is_empty() {
            return Ok(ExecuteResult::Empty);
        }

        if self.is_exit_command(line) {
            return Ok(ExecuteResult::Exit);
        }

        if self.is_help_command(line) {
            self.show_help(line);
            return Ok(ExecuteResult::Continue);
        }

        if let Some(command) = self.parse(line)? {
            debug!(?command, "Running shell command");
            dispatch(command, console).await?;
        }

        Ok(ExecuteResult::Continue)
    }

    /// Check if the input is an exit command
    pub fn is_exit_command(&self, line: &str) -> bool {
        let cmd = line.trim().to_lowercase();
        matches!(cmd.as_str(), "exit" | "quit" | "q")
    }

    /// Check if the input is a help command
    pub fn is_help_command(&self, line: &str) -> bool {
        match line.split_whitespace().next() {
            Some(first) => matches!(first.to_lowercase().as_str(), "help" | "?"),
            None => false,
        }
    }

    /// Parses a line into a command. `Ok(None)` means clap already printed
    /// the requested `--help` output.
    pub fn parse(&self, line: &str) -> CliResult<Option<ShellCommand>> {
        let args = parse_args(line)?;
        match ShellLine::try_parse_from(args) {
            Ok(parsed) => Ok(Some(parsed.command)),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.print()?;
                Ok(None)
            }
            Err(e) => Err(CliError::Validation(
                e.to_string().trim_start_matches("error: ").trim().to_string(),
            )),
        }
    }

    fn show_help(&self, line: &str) {
        match line.split_whitespace().nth(1) {
            Some(name) => self.show_command_help(name),
            None => self.show_general_help(),
        }
    }

    fn show_general_help(&self) {
        println!("Available commands:");
        println!();

        for subcommand in self.cli_command.get_subcommands() {
            let about = subcommand
                .get_about()
                .map(|s| s.to_string())
                .unwrap_or_default();
            println!("  {:<14} {}", subcommand.get_name(), about);
        }

        println!();
        println!("Shell commands:");
        println!("  help <cmd>     Show help for a command");
        println!("  ?              Alias for help");
        println!("  exit/quit/q    Exit the shell");
        println!();
        println!("Type 'help <command>' for detailed help on a specific command.");
    }

    fn show_command_help(&self, name: &str) {
        match self.cli_command.find_subcommand(name) {
            Some(subcommand) => println!("{}", subcommand.clone().render_help()),
            None => {
                println!("Unknown command: '{}'", name);
                println!("Type 'help' to see available commands.");
            }
        }
    }
}

/// Runs one parsed command against the console.
pub async fn dispatch<N: Notifier>(
    command: ShellCommand,
    console: &mut ReportConsole<N>,
) -> CliResult<()> {
    match command {
        ShellCommand::Login => console.login().await,
        ShellCommand::Logout => console.logout(),
        ShellCommand::Refresh => console.refresh().await.map(|_| ()),
        ShellCommand::Search { text, from, to } => {
            let criteria = FilterCriteria::parse(&text.join(" "), from.as_deref(), to.as_deref())?;
            console.search(criteria);
            Ok(())
        }
        ShellCommand::Show => {
            console.show();
            Ok(())
        }
        ShellCommand::Export { path } => console.export_csv(path).map(|_| ()),
        ShellCommand::Email { address } => console.email_report(address.as_deref()).await,
        ShellCommand::Status => {
            console.status().await;
            Ok(())
        }
    }
}

/// Parse a command line into arguments, respecting quotes
pub fn parse_args(line: &str) -> CliResult<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quote_char = '"';
    let mut escape_next = false;
    // keeps `""` as an explicit empty argument
    let mut quoted = false;

    for c in line.chars() {
        if escape_next {
            current.push(c);
            escape_next = false;
            continue;
        }

        if c == '\\' {
            escape_next = true;
            continue;
        }

        if c == '"' || c == '\'' {
            if in_quotes && c == quote_char {
                in_quotes = false;
            } else if !in_quotes {
                in_quotes = true;
                quoted = true;
                quote_char = c;
            } else {
                current.push(c);
            }
            continue;
        }

        if c.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(std::mem::take(&mut current));
                quoted = false;
            }
            continue;
        }

        current.push(c);
    }

    if in_quotes {
        return Err(CliError::Validation("Unclosed quote in command".to_string()));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_exit_command() {
        let executor = CommandExecutor::new();

        assert!(executor.is_exit_command("exit"));
        assert!(executor.is_exit_command("  QUIT  "));
        assert!(executor.is_exit_command("q"));

        assert!(!executor.is_exit_command("exit now"));
        assert!(!executor.is_exit_command("search"));
        assert!(!executor.is_exit_command(""));
    }

    #[test]
    fn test_is_help_command() {
        let executor = CommandExecutor::new();

        assert!(executor.is_help_command("help"));
        assert!(executor.is_help_command("? search"));
        assert!(!executor.is_help_command("search help"));
        assert!(!executor.is_help_command(""));
    }

    #[test]
    fn test_parse_args_with_quotes() {
        let args = parse_args(r#"search "Alice Smith" --from '2024-01-01'"#).unwrap();
        assert_eq!(args, vec!["search", "Alice Smith", "--from", "2024-01-01"]);
    }

    #[test]
    fn test_parse_args_keeps_empty_quoted_argument() {
        let args = parse_args(r#"email """#).unwrap();
        assert_eq!(args, vec!["email", ""]);
    }

    #[test]
    fn test_parse_args_escape() {
        let args = parse_args(r"export my\ report.csv").unwrap();
        assert_eq!(args, vec!["export", "my report.csv"]);
    }

    #[test]
    fn test_parse_args_unclosed_quote() {
        assert!(matches!(
            parse_args(r#"search "Alice"#),
            Err(CliError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_search_with_range() {
        let executor = CommandExecutor::new();
        let command = executor
            .parse("search alice smith --from 2024-01-01 --to 2024-02-01")
            .unwrap();

        assert_eq!(
            command,
            Some(ShellCommand::Search {
                text: vec!["alice".to_string(), "smith".to_string()],
                from: Some("2024-01-01".to_string()),
                to: Some("2024-02-01".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_export_and_email() {
        let executor = CommandExecutor::new();
        assert_eq!(
            executor.parse("export").unwrap(),
            Some(ShellCommand::Export { path: None })
        );
        assert_eq!(
            executor.parse("email admin@contoso.com").unwrap(),
            Some(ShellCommand::Email {
                address: Some("admin@contoso.com".to_string())
            })
        );
    }

    #[test]
    fn test_parse_unknown_command_is_validation_error() {
        let executor = CommandExecutor::new();
        assert!(matches!(
            executor.parse("frobnicate"),
            Err(CliError::Validation(_))
        ));
    }

    #[test]
    fn test_subcommands_listed_for_help() {
        let executor = CommandExecutor::new();
        let names: Vec<&str> = executor
            .command()
            .get_subcommands()
            .map(|c| c.get_name())
            .collect();
        assert_eq!(
            names,
            vec!["login", "logout", "refresh", "search", "show", "export", "email", "status"]
        );
    }
}

//! Interactive shell command

use crate::commands::console_options;
use crate::config::{Config, ConfigPaths};
use crate::console::ReportConsole;
use crate::error::{CliError, CliResult};
use crate::output::{print_info, Notifier, OutputFormat, TerminalNotifier};
use crate::repl::{CommandExecutor, ExecuteResult, Prompt, ShellHelper};
use clap::Args;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::io::IsTerminal;
use tracing::error;

/// Arguments for the shell command
#[derive(Args, Debug)]
pub struct ShellArgs {
    /// Do not open a browser for sign-in
    #[arg(long)]
    pub no_browser: bool,
}

/// Execute the shell command
pub async fn execute(args: ShellArgs) -> CliResult<()> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Validation(
            "The interactive shell needs a terminal. Use 'tombstone report' in scripts.".to_string(),
        ));
    }

    let config = Config::load_effective(&ConfigPaths::new()?)?;
    config.validate()?;

    let notifier = TerminalNotifier::new(!args.no_browser, OutputFormat::Table);
    let mut console =
        ReportConsole::new(config.graph_config()?, console_options(&config), notifier)?;
    let executor = CommandExecutor::new();

    let rl_config = rustyline::Config::builder().auto_add_history(true).build();
    let mut editor: Editor<ShellHelper, DefaultHistory> = Editor::with_config(rl_config)?;
    editor.set_helper(Some(ShellHelper::new(executor.command())));

    print_info("Type 'login' to sign in, 'help' for commands, 'exit' to quit.");

    loop {
        let prompt = Prompt::generate_auto(console.account());
        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        match executor.execute(&line, &mut console).await {
            Ok(ExecuteResult::Exit) => break,
            Ok(ExecuteResult::Continue | ExecuteResult::Empty) => {}
            Err(e) => report_error(&e, console.notifier_mut()),
        }
    }

    Ok(())
}

/// Logs a failed action and shows it without leaving the shell.
pub fn report_error<N: Notifier>(e: &CliError, notifier: &mut N) {
    error!(error = %e, exit_code = e.exit_code(), "Shell command failed");
    notifier.error(&e.to_string());
}

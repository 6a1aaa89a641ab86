//! Interactive shell for the tombstone CLI
//!
//! One process keeps the session and loaded data between commands, with
//! tab completion, in-memory history and a prompt showing the signed-in
//! account.

mod completer;
mod executor;
mod prompt;

pub use completer::ShellHelper;
pub use executor::{dispatch, parse_args, CommandExecutor, ExecuteResult, ShellCommand, ShellLine};
pub use prompt::Prompt;

//! Tab completion for the interactive shell

use clap::Command;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper, Result};
use std::collections::BTreeMap;

const SHELL_BUILTINS: [&str; 4] = ["help", "exit", "quit", "?"];

/// rustyline helper completing command names and their `--flags`.
pub struct ShellHelper {
    commands: Vec<String>,
    flags: BTreeMap<String, Vec<String>>,
}

impl ShellHelper {
    /// Builds completion tables from the shell's clap command tree.
    pub fn new(command: &Command) -> Self {
        let mut commands = Vec::new();
        let mut flags = BTreeMap::new();

        for subcommand in command.get_subcommands() {
            let name = subcommand.get_name().to_string();
            let long_flags: Vec<String> = subcommand
                .get_arguments()
                .filter_map(|arg| arg.get_long())
                .filter(|long| *long != "help")
                .map(|long| format!("--{long}"))
                .collect();
            flags.insert(name.clone(), long_flags);
            commands.push(name);
        }
        commands.extend(SHELL_BUILTINS.iter().map(|s| s.to_string()));
        commands.sort();

        Self { commands, flags }
    }

    /// Candidates for the word ending at `pos`, and where that word starts.
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let before = &line[..pos];
        let start = before
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(i, c)| i + c.len_utf8());
        let prefix = &before[start..];
        let first_word = before.split_whitespace().next();

        let pool: Vec<&String> = match first_word {
            // completing the command itself
            _ if start == 0 => self.commands.iter().collect(),
            Some("help" | "?") => self.flags.keys().collect(),
            Some(command) if prefix.starts_with('-') => self
                .flags
                .get(command)
                .map(|f| f.iter().collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        let matches = pool
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect();
        (start, matches)
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(line, pos);
        let pairs = matches
            .into_iter()
            .map(|m| Pair {
                display: m.clone(),
                replacement: m,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::CommandExecutor;

    fn helper() -> ShellHelper {
        ShellHelper::new(CommandExecutor::new().command())
    }

    #[test]
    fn test_completes_command_names() {
        let (start, matches) = helper().candidates("ex", 2);
        assert_eq!(start, 0);
        assert_eq!(matches, vec!["exit", "export"]);
    }

    #[test]
    fn test_completes_search_flags() {
        let line = "search alice --f";
        let (start, matches) = helper().candidates(line, line.len());
        assert_eq!(start, 13);
        assert_eq!(matches, vec!["--from"]);
    }

    #[test]
    fn test_help_completes_commands_only() {
        let line = "help s";
        let (_, matches) = helper().candidates(line, line.len());
        assert_eq!(matches, vec!["search", "show", "status"]);
    }

    #[test]
    fn test_no_candidates_for_free_text() {
        let line = "search al";
        let (_, matches) = helper().candidates(line, line.len());
        assert!(matches.is_empty());
    }

    #[test]
    fn test_wide_whitespace_splits_words() {
        let line = "search\u{3000}al";
        let (start, matches) = helper().candidates(line, line.len());
        assert_eq!(start, "search\u{3000}".len());
        assert!(matches.is_empty());

        let line = "help\u{3000}ex";
        let (_, matches) = helper().candidates(line, line.len());
        assert_eq!(matches, vec!["export"]);
    }
}

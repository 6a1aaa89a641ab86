//! Diagnostic logging setup using tracing.
//!
//! Diagnostics go to stderr so they never mix with report output. Without
//! `-v` only errors from the tombstone crates are logged; `-v` raises the
//! level and `TOMBSTONE_LOG` (or `RUST_LOG`) takes a full filter directive.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "TOMBSTONE_LOG";

/// Picks the filter directive for a `-v` count when no env filter is set.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "off,tombstone_cli=error,tombstone_graph=error,tombstone_report=error",
        1 => "warn,tombstone_cli=info,tombstone_graph=info,tombstone_report=info",
        2 => "info,tombstone_cli=debug,tombstone_graph=debug,tombstone_report=debug",
        _ => "debug,tombstone_cli=trace,tombstone_graph=trace,tombstone_report=trace",
    }
}

fn build_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)))
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_keeps_errors_only() {
        let quiet = default_directive(0);
        assert!(quiet.starts_with("off,"));
        assert!(quiet.contains("tombstone_cli=error"));
        assert!(EnvFilter::try_new(quiet).is_ok());
        assert!(default_directive(2).contains("tombstone_graph=debug"));
        assert_eq!(default_directive(7), default_directive(3));
    }

    #[test]
    fn test_init_does_not_panic_twice() {
        init(0);
        init(2);
    }
}

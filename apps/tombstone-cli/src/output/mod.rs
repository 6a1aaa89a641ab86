//! Terminal output: message helpers, report tables and the notifier seam.

pub mod notifier;
pub mod printer;
pub mod table;

pub use notifier::{Notice, Notifier, OutputFormat, TerminalNotifier};
pub use printer::{print_error, print_header, print_info, print_key_value, print_success, print_warning};
pub use table::{format_report_table, truncate};

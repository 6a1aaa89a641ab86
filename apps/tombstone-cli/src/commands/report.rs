//! One-shot report: sign in, fetch, filter, then print, save or mail.

use crate::commands::console_options;
use crate::config::{Config, ConfigPaths};
use crate::console::ReportConsole;
use crate::error::CliResult;
use crate::output::{OutputFormat, TerminalNotifier};
use clap::Args;
use std::path::PathBuf;
use tombstone_report::{FilterCriteria, DEFAULT_CSV_FILENAME};

/// Arguments for the report command
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Only include users whose name, UPN or email contains TEXT
    #[arg(long, short = 's', value_name = "TEXT")]
    pub search: Option<String>,

    /// Start of the deletion date range (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// End of the deletion date range; only applied together with --from
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,

    /// Save the report as CSV
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = DEFAULT_CSV_FILENAME
    )]
    pub csv: Option<PathBuf>,

    /// Email the report as an HTML table to ADDRESS
    #[arg(long, value_name = "ADDRESS")]
    pub email: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not open a browser for sign-in
    #[arg(long)]
    pub no_browser: bool,
}

impl ReportArgs {
    fn criteria(&self) -> CliResult<FilterCriteria> {
        Ok(FilterCriteria::parse(
            self.search.as_deref().unwrap_or_default(),
            self.from.as_deref(),
            self.to.as_deref(),
        )?)
    }
}

/// Execute the report command
pub async fn execute(args: ReportArgs) -> CliResult<()> {
    let config = Config::load_effective(&ConfigPaths::new()?)?;
    config.validate()?;

    // bad dates fail before the device code prompt
    let criteria = args.criteria()?;

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };
    let notifier = TerminalNotifier::new(!args.no_browser, format);
    let mut console =
        ReportConsole::new(config.graph_config()?, console_options(&config), notifier)?;

    console.sign_in().await?;
    if criteria == FilterCriteria::default() {
        console.refresh().await?;
    } else {
        console.load().await?;
        console.search(criteria);
    }

    if let Some(path) = args.csv {
        console.export_csv(Some(path))?;
    }
    if let Some(address) = args.email.as_deref() {
        console.email_report(Some(address)).await?;
    }

    Ok(())
}

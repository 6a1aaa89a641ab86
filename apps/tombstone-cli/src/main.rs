//! tombstone - report recently deleted Entra ID users
//!
//! - Sign in with the device code flow
//! - List users deleted in the last 180 days
//! - Filter by name, UPN, email and deletion date
//! - Save as CSV or mail the report to an administrator

use clap::{ArgAction, Parser, Subcommand};
use tombstone_cli::commands;
use tombstone_cli::error::CliResult;
use tombstone_cli::logging;

/// tombstone - Recently deleted users report for Microsoft Entra ID
#[derive(Parser)]
#[command(name = "tombstone")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase diagnostic output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, fetch deleted users and print, save or mail the report
    Report(commands::report::ReportArgs),

    /// Start an interactive session
    Shell(commands::shell::ShellArgs),

    /// Set tenant, client and display settings
    Configure(commands::configure::ConfigureArgs),
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            tracing::error!(error = %e, exit_code = e.exit_code(), "Command failed");
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Report(args) => commands::report::execute(args).await,
        Commands::Shell(args) => commands::shell::execute(args).await,
        Commands::Configure(args) => commands::configure::execute(args).await,
    }
}

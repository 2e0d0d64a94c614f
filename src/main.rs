use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use envelope_grid::cli::{
    handle_config_command, handle_grid_command, handle_register_command, handle_report_command,
    handle_transactions_command, GridArgs, RegisterArgs, ReportArgs, TransactionsArgs,
};
use envelope_grid::config::{GridPaths, Settings};
use envelope_grid::logging::init_tracing;

#[derive(Parser)]
#[command(
    name = "envelope-grid",
    author = "Kaylee Beyene",
    version,
    about = "Budget grid and reports for YNAB4-style envelope budgets",
    long_about = "envelope-grid reads a YNAB4-style budget snapshot and derives the \
                  multi-month budget grid, account registers and income/expense \
                  reports from it. Budget data is never modified."
)]
struct Cli {
    /// Increase log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the multi-month budget grid
    Grid(GridArgs),

    /// Show an account register
    #[command(alias = "reg")]
    Register(RegisterArgs),

    /// Income and expenses by classification over a date range
    Report(ReportArgs),

    /// List the transactions behind one grid cell
    #[command(alias = "txn")]
    Transactions(TransactionsArgs),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = GridPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    debug!(base_dir = %paths.base_dir().display(), "settings loaded");

    match cli.command {
        Some(Commands::Grid(args)) => handle_grid_command(&settings, args)?,
        Some(Commands::Register(args)) => handle_register_command(&settings, args)?,
        Some(Commands::Report(args)) => handle_report_command(&settings, args)?,
        Some(Commands::Transactions(args)) => handle_transactions_command(&settings, args)?,
        Some(Commands::Config) => handle_config_command(&paths, &settings)?,
        None => {
            println!("envelope-grid - Budget grid and reports for envelope budgets");
            println!();
            println!("Run 'envelope-grid --help' for usage information.");
        }
    }

    Ok(())
}

//! The `register` command: one account's ledger, or all accounts

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use super::{create_output, parse_date};
use crate::config::Settings;
use crate::error::{GridError, GridResult};
use crate::export::export_register_csv;
use crate::reports::{AccountRegister, RegisterFilter, RegisterScope, SortDirection};
use crate::storage::BudgetSnapshot;

/// Register output options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RegisterOutput {
    /// Terminal table
    Table,
    /// CSV to stdout, or to `--file`
    Csv,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Budget snapshot file (JSON)
    #[arg(short, long)]
    pub budget: PathBuf,

    /// Account name or ID; all accounts when omitted
    #[arg(short, long)]
    pub account: Option<String>,

    /// Sort order (asc or desc), overrides settings
    #[arg(long)]
    pub sort: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Filter by payee (partial match)
    #[arg(long)]
    pub payee: Option<String>,

    /// Show only uncategorized transactions
    #[arg(long)]
    pub uncategorized: bool,

    #[arg(short, long, value_enum, default_value = "table")]
    pub output: RegisterOutput,

    /// Write CSV output to this file instead of stdout
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Handle the register command
pub fn handle_register_command(settings: &Settings, args: RegisterArgs) -> GridResult<()> {
    let snapshot = BudgetSnapshot::load(&args.budget)?;

    let scope = match &args.account {
        Some(name_or_id) => {
            let account = snapshot.find_account(name_or_id)?;
            RegisterScope::Account(account.entity_id.clone())
        }
        None => RegisterScope::All,
    };
    let sort = match &args.sort {
        Some(s) => s.parse::<SortDirection>()?,
        None => settings.register_sort,
    };

    let filter = RegisterFilter {
        start_date: args.from.as_deref().map(|s| parse_date(s, "start")).transpose()?,
        end_date: args.to.as_deref().map(|s| parse_date(s, "end")).transpose()?,
        payee_contains: args.payee,
        uncategorized_only: args.uncategorized,
        ..Default::default()
    };

    let register = AccountRegister::generate(
        &snapshot.transactions,
        &scope,
        sort,
        &snapshot.accounts,
        &snapshot.categories,
        &filter,
    )?;

    match (args.output, args.file) {
        (RegisterOutput::Csv, Some(path)) => {
            let mut writer = create_output(&path)?;
            export_register_csv(&register, &mut writer)?;
            writer.flush().map_err(|e| GridError::Export(e.to_string()))?;
            println!("Register exported to: {}", path.display());
        }
        (RegisterOutput::Csv, None) => {
            export_register_csv(&register, std::io::stdout().lock())?;
        }
        (RegisterOutput::Table, _) => {
            println!("{}", register.format_terminal(&settings.currency_symbol, &settings.date_format));
        }
    }

    Ok(())
}

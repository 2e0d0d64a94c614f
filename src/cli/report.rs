//! The `report` command: income and expenses by classification

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use super::{create_output, parse_date};
use crate::config::Settings;
use crate::error::{GridError, GridResult};
use crate::export::{export_classification_csv, export_json, export_yaml};
use crate::reports::ClassificationReport;
use crate::storage::BudgetSnapshot;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Budget snapshot file (JSON)
    #[arg(short, long)]
    pub budget: PathBuf,

    /// Start date (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: String,

    /// End date (YYYY-MM-DD)
    #[arg(short, long)]
    pub end: String,

    /// Export to a file; the extension (.csv, .json, .yaml) picks the format
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportFormat {
    Csv,
    Json,
    Yaml,
}

fn format_for(path: &Path) -> GridResult<ReportFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => Ok(ReportFormat::Csv),
        Some("json") => Ok(ReportFormat::Json),
        Some("yaml") | Some("yml") => Ok(ReportFormat::Yaml),
        _ => Err(GridError::Validation(format!(
            "Unsupported export format for {}. Use .csv, .json or .yaml",
            path.display()
        ))),
    }
}

/// Handle the report command
pub fn handle_report_command(settings: &Settings, args: ReportArgs) -> GridResult<()> {
    let start_date = parse_date(&args.start, "start")?;
    let end_date = parse_date(&args.end, "end")?;
    if start_date > end_date {
        return Err(GridError::Validation(format!(
            "Start date {} is after end date {}",
            start_date, end_date
        )));
    }

    let snapshot = BudgetSnapshot::load(&args.budget)?;
    let report = ClassificationReport::generate(
        &snapshot.transactions,
        &snapshot.categories,
        &snapshot.master_categories,
        start_date,
        end_date,
        &settings.classifications,
    );
    info!(
        months = report.months.len(),
        buckets = report.classifications.len(),
        "generated classification report"
    );

    let Some(path) = args.output else {
        println!("{}", report.format_terminal(&settings.currency_symbol, &settings.date_format));
        return Ok(());
    };

    let format = format_for(&path)?;
    let mut writer = create_output(&path)?;
    match format {
        ReportFormat::Csv => export_classification_csv(&report, &mut writer)?,
        ReportFormat::Json => export_json(&report, &mut writer)?,
        ReportFormat::Yaml => export_yaml(&report, "classification report", &mut writer)?,
    }
    writer.flush().map_err(|e| GridError::Export(e.to_string()))?;
    println!("Report exported to: {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(format_for(Path::new("out.csv")).unwrap(), ReportFormat::Csv);
        assert_eq!(format_for(Path::new("out.JSON")).unwrap(), ReportFormat::Json);
        assert_eq!(format_for(Path::new("out.yml")).unwrap(), ReportFormat::Yaml);
        assert!(format_for(Path::new("out.xlsx")).unwrap_err().is_validation());
        assert!(format_for(Path::new("out")).is_err());
    }
}

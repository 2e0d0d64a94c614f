//! Export module for envelope-grid
//!
//! Writes reports in multiple formats:
//! - CSV: classification rows and register entries (spreadsheet-compatible)
//! - JSON: machine-readable report trees
//! - YAML: human-readable report trees

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_classification_csv, export_register_csv};
pub use json::export_json;
pub use yaml::export_yaml;

//! User settings for envelope-grid
//!
//! View preferences (visible months, active-only filter, register order),
//! report classifications and the grid's column layout. Every field has a
//! default, so an older or hand-edited file still loads.

use std::collections::{BTreeMap, BTreeSet};

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::GridPaths;
use crate::error::{GridError, GridResult};
use crate::models::Classification;
use crate::reports::SortDirection;
use crate::storage::{read_json, write_json_atomic};

/// Largest month window the grid will render
pub const MAX_VISIBLE_MONTHS: usize = 12;

/// Settings layout this build reads and writes
pub const SETTINGS_SCHEMA_VERSION: u32 = 1;

/// Column widths and visibility for the budget grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub widths: BTreeMap<String, u16>,
    pub hidden: BTreeSet<String>,
}

impl ColumnConfig {
    pub fn is_visible(&self, column: &str) -> bool {
        !self.hidden.contains(column)
    }

    /// Configured width, or `default` when none is stored
    pub fn width_or(&self, column: &str, default: u16) -> u16 {
        self.widths.get(column).copied().unwrap_or(default)
    }

    pub fn set_width(&mut self, column: impl Into<String>, width: u16) {
        self.widths.insert(column.into(), width);
    }

    pub fn hide(&mut self, column: impl Into<String>) {
        self.hidden.insert(column.into());
    }

    pub fn show(&mut self, column: &str) {
        self.hidden.remove(column);
    }
}

/// User settings for envelope-grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Schema version for migration support
    pub schema_version: u32,

    /// Number of month columns in the grid
    pub visible_months: usize,

    /// Hide categories with no figures in the visible months
    pub show_only_active: bool,

    /// Register display order
    pub register_sort: SortDirection,

    /// Default currency symbol
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    pub date_format: String,

    /// Report buckets of master categories
    pub classifications: Vec<Classification>,

    pub columns: ColumnConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: SETTINGS_SCHEMA_VERSION,
            visible_months: 3,
            show_only_active: false,
            register_sort: SortDirection::Desc,
            currency_symbol: "$".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            classifications: Vec::new(),
            columns: ColumnConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist. The
    /// defaults are not written back.
    pub fn load_or_create(paths: &GridPaths) -> GridResult<Self> {
        let settings: Settings = read_json(paths.settings_file()).map_err(|e| {
            GridError::Config(format!("Failed to load settings: {}", e))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &GridPaths) -> GridResult<()> {
        self.validate()?;
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    pub fn validate(&self) -> GridResult<()> {
        if self.schema_version == 0 || self.schema_version > SETTINGS_SCHEMA_VERSION {
            return Err(GridError::Config(format!(
                "unsupported settings schema version {} (this build reads version {})",
                self.schema_version, SETTINGS_SCHEMA_VERSION
            )));
        }

        if self.date_format.trim().is_empty()
            || StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error))
        {
            return Err(GridError::Validation(format!(
                "invalid date_format '{}'",
                self.date_format
            )));
        }

        if self.visible_months == 0 || self.visible_months > MAX_VISIBLE_MONTHS {
            return Err(GridError::Validation(format!(
                "visible_months must be between 1 and {}, got {}",
                MAX_VISIBLE_MONTHS, self.visible_months
            )));
        }

        let mut labels = BTreeSet::new();
        for classification in &self.classifications {
            if classification.label.trim().is_empty() {
                return Err(GridError::Validation(
                    "classification label cannot be empty".into(),
                ));
            }
            if !labels.insert(classification.label.as_str()) {
                return Err(GridError::Validation(format!(
                    "duplicate classification label '{}'",
                    classification.label
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.visible_months, 3);
        assert!(!settings.show_only_active);
        assert_eq!(settings.register_sort, SortDirection::Desc);
        assert!(settings.classifications.is_empty());
    }

    #[test]
    fn test_missing_file_is_not_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GridPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(!paths.settings_file().exists());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GridPaths::with_base_dir(temp_dir.path().join("cfg"));

        let mut settings = Settings {
            visible_months: 5,
            register_sort: SortDirection::Asc,
            classifications: vec![Classification::new("Fixed", 1).with_masters(["MasterCategory/1"])],
            ..Settings::default()
        };
        settings.columns.set_width("budgeted", 14);
        settings.columns.hide("available");
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.columns.width_or("budgeted", 10), 14);
        assert_eq!(loaded.columns.width_or("activity", 10), 10);
        assert!(!loaded.columns.is_visible("available"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GridPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"show_only_active": true}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert!(loaded.show_only_active);
        assert_eq!(loaded.visible_months, 3);
        assert_eq!(loaded.currency_symbol, "$");
    }

    #[test]
    fn test_validation() {
        let zero = Settings {
            visible_months: 0,
            ..Settings::default()
        };
        assert!(zero.validate().unwrap_err().is_validation());

        let duplicate = Settings {
            classifications: vec![Classification::new("Fun", 1), Classification::new("Fun", 2)],
            ..Settings::default()
        };
        assert!(duplicate.validate().is_err());
    }

    #[test]
    fn test_schema_version_is_checked() {
        let newer = Settings {
            schema_version: SETTINGS_SCHEMA_VERSION + 1,
            ..Settings::default()
        };
        assert!(matches!(newer.validate(), Err(GridError::Config(_))));

        let temp_dir = TempDir::new().unwrap();
        let paths = GridPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"schema_version": 99}"#).unwrap();
        assert!(Settings::load_or_create(&paths).is_err());
    }

    #[test]
    fn test_date_format_is_checked() {
        let day_first = Settings {
            date_format: "%d/%m/%Y".to_string(),
            ..Settings::default()
        };
        assert!(day_first.validate().is_ok());

        let broken = Settings {
            date_format: "%Y-%Q".to_string(),
            ..Settings::default()
        };
        assert!(broken.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_column_show_hide() {
        let mut columns = ColumnConfig::default();
        columns.hide("activity");
        assert!(!columns.is_visible("activity"));
        columns.show("activity");
        assert!(columns.is_visible("activity"));
    }
}

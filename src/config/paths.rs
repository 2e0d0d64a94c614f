//! Path management for envelope-grid
//!
//! ## Path Resolution Order
//!
//! 1. `ENVELOPE_GRID_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/envelope-grid` or `~/.config/envelope-grid`
//! 3. Windows: `%APPDATA%\envelope-grid`

use std::path::{Path, PathBuf};

use crate::error::{GridError, GridResult};

/// Environment variable overriding the base directory
pub const DIR_ENV_VAR: &str = "ENVELOPE_GRID_DIR";

const APP_DIR: &str = "envelope-grid";

/// Locations of the files envelope-grid owns
#[derive(Debug, Clone)]
pub struct GridPaths {
    base_dir: PathBuf,
}

impl GridPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or application-data directory can be found.
    pub fn new() -> GridResult<Self> {
        let base_dir = resolve_with(|key| std::env::var(key).ok())?;
        Ok(Self { base_dir })
    }

    /// Create GridPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("settings.json")
    }

    pub fn ensure_directories(&self) -> GridResult<()> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| GridError::Io(format!("Failed to create base directory: {}", e)))
    }
}

fn resolve_with<F>(lookup: F) -> GridResult<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(custom) = non_empty(DIR_ENV_VAR) {
        return Ok(PathBuf::from(custom));
    }

    if cfg!(windows) {
        return non_empty("APPDATA")
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
            .ok_or_else(|| GridError::Config("Could not determine APPDATA directory".into()));
    }

    let config_base = non_empty("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| non_empty("HOME").map(|home| PathBuf::from(home).join(".config")))
        .ok_or_else(|| GridError::Config("Could not determine home directory".into()))?;

    Ok(config_base.join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_override_wins() {
        let dir = resolve_with(env(&[
            (DIR_ENV_VAR, "/tmp/grid"),
            ("XDG_CONFIG_HOME", "/xdg"),
            ("HOME", "/home/me"),
            ("APPDATA", "C:\\AppData"),
        ]))
        .unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/grid"));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_xdg_then_home() {
        let dir = resolve_with(env(&[("XDG_CONFIG_HOME", "/xdg"), ("HOME", "/home/me")])).unwrap();
        assert_eq!(dir, PathBuf::from("/xdg/envelope-grid"));

        let dir = resolve_with(env(&[("HOME", "/home/me")])).unwrap();
        assert_eq!(dir, PathBuf::from("/home/me/.config/envelope-grid"));

        assert!(resolve_with(env(&[])).is_err());
    }

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GridPaths::with_base_dir(temp_dir.path().join("grid"));

        assert_eq!(paths.settings_file(), temp_dir.path().join("grid").join("settings.json"));
        paths.ensure_directories().unwrap();
        assert!(paths.base_dir().exists());
    }
}

//! Configuration module for envelope-grid
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Grid column layout

pub mod paths;
pub mod settings;

pub use paths::GridPaths;
pub use settings::{ColumnConfig, Settings};

//! Storage layer for envelope-grid
//!
//! Budget data is read-only here: a snapshot file is loaded once per run.
//! The only thing ever written is the settings file.

pub mod file_io;
pub mod snapshot;

pub use file_io::{read_json, read_json_required, write_json_atomic};
pub use snapshot::BudgetSnapshot;

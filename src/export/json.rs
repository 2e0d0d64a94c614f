//! JSON Export functionality
//!
//! Every report derives `Serialize`, so one generic writer covers them all.

use std::io::Write;

use serde::Serialize;

use crate::error::{GridError, GridResult};

/// Export a report as pretty-printed JSON
pub fn export_json<T: Serialize, W: Write>(value: &T, mut writer: W) -> GridResult<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer).map_err(|e| GridError::Export(e.to_string()))?;
    Ok(())
}

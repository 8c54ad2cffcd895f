//! CSV export of the selected series.
//!
//! Each selection writes its own column set: the raw signals export as
//! `t` plus themselves, the derived ones as `t,x1,x2` plus the derived
//! column, so a derived file always carries its operands. The document is
//! assembled fully in memory, staged next to the target, and renamed into
//! place, so a failed export never leaves a truncated file behind.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::signal::{SampleBatch, SignalKind};

/// An export was refused or failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// Nothing to write: no sweep has completed since the last failure.
    NoData,
    /// CSV assembly failed.
    Encode(String),
    /// The filesystem write failed.
    Io(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::NoData => write!(f, "no completed sweep to export"),
            ExportError::Encode(e) => write!(f, "could not encode csv: {e}"),
            ExportError::Io(e) => write!(f, "could not write file: {e}"),
        }
    }
}

impl std::error::Error for ExportError {}

/// The CSV document for `kind`, headers included, as a string.
pub fn render_signal_csv(batch: &SampleBatch, kind: SignalKind) -> Result<String, ExportError> {
    if batch.is_empty() {
        return Err(ExportError::NoData);
    }

    let columns = kind.export_columns();
    let mut series = Vec::with_capacity(columns.len());
    for name in columns {
        let values = batch
            .column(name)
            .ok_or_else(|| ExportError::Encode(format!("batch has no column {name}")))?;
        series.push(values);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(columns)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    for i in 0..batch.len() {
        let row: Vec<String> = series.iter().map(|values| values[i].to_string()).collect();
        writer
            .write_record(&row)
            .map_err(|e| ExportError::Encode(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Render, stage at a sibling `.tmp` path, then rename into place.
/// `path` only ever holds a complete document.
pub fn write_signal_csv(
    batch: &SampleBatch,
    kind: SignalKind,
    path: &Path,
) -> Result<(), ExportError> {
    let document = render_signal_csv(batch, kind)?;
    let staging = staging_path(path);
    fs::write(&staging, document).map_err(|e| ExportError::Io(e.to_string()))?;
    if let Err(e) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(ExportError::Io(e.to_string()));
    }
    Ok(())
}

/// Sibling of `path` the document is staged at before the rename.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = match path.file_name() {
        Some(name) => name.to_os_string(),
        None => OsString::from("export.csv"),
    };
    name.push(".tmp");
    path.with_file_name(name)
}

/// `<stem>_<YYYYmmdd_HHMMSS>.csv` under `dir`, named after the selection.
pub fn default_export_path(kind: SignalKind, dir: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("{}_{stamp}.csv", kind.file_stem()))
}

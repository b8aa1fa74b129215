//! CSV export with all-or-nothing replacement of the target files.
//!
//! Each row set is first written to a temporary file next to its target.
//! Targets are only replaced once every staged file is complete.

use crate::table::RowSet;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// A fully written temporary file waiting to replace its target.
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    target: PathBuf,
    rows: usize,
}

impl StagedFile {
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Atomically move the staged file over its target.
    pub fn commit(self) -> Result<PathBuf, ExportError> {
        let target = self.target;
        self.temp
            .persist(&target)
            .map_err(|e| ExportError::Io {
                action: "replace",
                path: target.clone(),
                source: e.error,
            })?;
        tracing::info!(path = %target.display(), rows = self.rows, "wrote CSV");
        Ok(target)
    }
}

/// Write a row set to a temporary sibling of `path`, header first.
pub fn stage_csv(path: &Path, rows: &RowSet) -> Result<StagedFile, ExportError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|source| ExportError::Io {
        action: "create directory",
        path: dir.clone(),
        source,
    })?;

    let temp = NamedTempFile::new_in(&dir).map_err(|source| ExportError::Io {
        action: "create temporary file in",
        path: dir.clone(),
        source,
    })?;

    let csv_err = |source: csv::Error| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_writer(temp.as_file());
    writer.write_record(&rows.columns).map_err(csv_err)?;
    for row in &rows.rows {
        writer.write_record(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        action: "flush",
        path: path.to_path_buf(),
        source,
    })?;
    drop(writer);

    Ok(StagedFile {
        temp,
        target: path.to_path_buf(),
        rows: rows.len(),
    })
}

/// Write a single row set, replacing `path`.
pub fn write_csv(path: &Path, rows: &RowSet) -> Result<PathBuf, ExportError> {
    stage_csv(path, rows)?.commit()
}

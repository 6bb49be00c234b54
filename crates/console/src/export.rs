//! Report files written to the configured report directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::menu::{ConsoleError, ConsoleResult};

/// Timestamp layout used in report file names.
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `inventory_report_<stamp>.txt`
pub fn inventory_report_file_name(at: DateTime<Utc>) -> String {
    format!("inventory_report_{}.txt", at.format(FILE_STAMP_FORMAT))
}

/// `item_report_<CODE>_<stamp>.txt`. Characters outside `[A-Za-z0-9_-]` in
/// the code become `_` so the name stays inside `dir`.
pub fn item_report_file_name(code: &str, at: DateTime<Utc>) -> String {
    let code: String = code
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("item_report_{code}_{}.txt", at.format(FILE_STAMP_FORMAT))
}

/// Write `text` to `dir/file_name`, creating `dir` if needed.
pub fn write_report(dir: &Path, file_name: &str, text: &str) -> ConsoleResult<PathBuf> {
    let path = dir.join(file_name);
    fs::create_dir_all(dir).map_err(|source| ConsoleError::Export {
        path: dir.to_path_buf(),
        source,
    })?;
    fs::write(&path, text).map_err(|source| ConsoleError::Export {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = text.len(), "report written");
    Ok(path)
}

//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read a source file as UTF-8 text.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Replace a file's content atomically: write a sibling temp file, copy the
/// original permissions onto it, then rename over the target. Readers see
/// either the old or the new content, never a partial write.
pub fn write_file_atomic(path: &Path, content: &str, operation: &str) -> Result<()> {
    let tmp_path = temp_sibling(path).ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    if let Err(e) = fs::write(&tmp_path, content) {
        return Err(Error::internal_io(
            e.to_string(),
            Some(format!("{} (write temp)", operation)),
        ));
    }

    if let Ok(metadata) = fs::metadata(path) {
        let _ = fs::set_permissions(&tmp_path, metadata.permissions());
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::internal_io(e.to_string(), Some(format!("{} (rename)", operation)))
    })
}

fn temp_sibling(path: &Path) -> Option<PathBuf> {
    let parent = path.parent()?;
    let filename = path.file_name()?;
    Some(parent.join(format!(
        ".{}.{}.tmp",
        filename.to_string_lossy(),
        std::process::id()
    )))
}

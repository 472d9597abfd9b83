//! Recursive discovery of PHP source files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Directories skipped at any depth.
const ALWAYS_SKIP_DIRS: &[&str] = &["node_modules", ".git", ".svn", ".hg"];

const PHP_EXTENSIONS: &[&str] = &["php", "inc", "phtml"];

pub fn is_php_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| PHP_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Resolve a target to PHP files: a file is returned as is (whatever its
/// extension), a directory is walked recursively. Results are sorted.
///
/// A missing target, or any directory that cannot be listed, is an error
/// naming that path.
pub fn php_files(target: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(target).map_err(|e| unreadable(target, e))?;
    if !metadata.is_dir() {
        return Ok(vec![target.to_path_buf()]);
    }

    let mut files = Vec::new();
    walk_recursive(target, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir).map_err(|e| unreadable(dir, e))? {
        let entry = entry.map_err(|e| unreadable(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| unreadable(&path, e))?;

        if file_type.is_dir() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if ALWAYS_SKIP_DIRS.contains(&&*name) {
                continue;
            }
            walk_recursive(&path, files)?;
        } else if is_php_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn unreadable(path: &Path, err: std::io::Error) -> Error {
    let display = path.display().to_string();
    let cause = Error::internal_io(err.to_string(), Some(format!("list {}", display)));
    Error::transform_file_failed(display, "read", &cause)
}

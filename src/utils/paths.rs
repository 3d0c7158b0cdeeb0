//! Path normalization

use crate::error::{IoResultExt, ReorgError, Result};
use std::path::{Component, Path, PathBuf};

pub fn normalize_path(path: &str) -> String {
    // Convert backslashes to forward slashes and normalize
    path.replace('\\', "/")
}

/// Render a filesystem path with forward slashes.
pub fn display_path(path: &Path) -> String {
    normalize_path(&path.to_string_lossy())
}

/// `path` relative to `root`, with forward slashes.
pub fn relative_to(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(display_path)
}

/// Resolve `path` against the current directory without touching the filesystem.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir().at(path)?.join(path))
}

/// Turn a planner-supplied relative path into one that is safe to join onto a
/// root: leading separators are dropped, `.` segments are ignored, and any
/// segment that would climb out of the root is rejected.
pub fn sanitize_relative(raw: &str) -> Result<PathBuf> {
    let normalized = normalize_path(raw.trim());
    let trimmed = normalized.trim_start_matches('/');

    let mut out = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ReorgError::BadRequest(format!(
                    "Relative path escapes its root: {raw}"
                )));
            }
        }
    }

    if out.as_os_str().is_empty() {
        return Err(ReorgError::BadRequest(format!("Empty relative path: '{raw}'")));
    }
    Ok(out)
}

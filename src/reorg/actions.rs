//! Single filesystem actions: move or duplicate one entry.

use crate::domain::ActionMode;
use crate::error::{IoResultExt, ReorgError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// `rename` cannot cross filesystems; the OS reports that with this code.
#[cfg(unix)]
const CROSS_DEVICE_ERROR: i32 = 18; // EXDEV
#[cfg(windows)]
const CROSS_DEVICE_ERROR: i32 = 17; // ERROR_NOT_SAME_DEVICE
#[cfg(not(any(unix, windows)))]
const CROSS_DEVICE_ERROR: i32 = -1;

/// Apply `mode` to `src`, creating the parent of `dst` as needed.
///
/// When `src` is a file and `dst` is an existing directory the file lands
/// inside that directory under its own name. Returns where the entry ended up.
pub fn perform_action(src: &Path, dst: &Path, mode: ActionMode) -> Result<PathBuf> {
    if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).at(parent)?;
    }

    let target = resolve_target(src, dst);
    match mode {
        ActionMode::Move => move_entry(src, &target)?,
        ActionMode::Duplicate => duplicate_entry(src, &target)?,
    }
    tracing::debug!("{} {} -> {}", mode, src.display(), target.display());
    Ok(target)
}

fn resolve_target(src: &Path, dst: &Path) -> PathBuf {
    match src.file_name() {
        Some(name) if src.is_file() && dst.is_dir() => dst.join(name),
        _ => dst.to_path_buf(),
    }
}

fn move_entry(src: &Path, dst: &Path) -> Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(err) if err.raw_os_error() == Some(CROSS_DEVICE_ERROR) => {
            tracing::debug!("rename crossed devices, copying {}", src.display());
            duplicate_entry(src, dst)?;
            if src.is_dir() {
                fs::remove_dir_all(src).at(src)
            } else {
                fs::remove_file(src).at(src)
            }
        }
        Err(err) => Err(classify(src, dst, err)),
    }
}

fn duplicate_entry(src: &Path, dst: &Path) -> Result<()> {
    let metadata = fs::metadata(src).at(src)?;
    if metadata.is_dir() {
        copy_dir_recursive(src, dst)
    } else {
        fs::copy(src, dst).map_err(|err| classify(src, dst, err))?;
        Ok(())
    }
}

/// Deep copy of a directory. Symbolic links inside it are not followed.
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(src).to_path_buf();
            let source = err.into_io_error().unwrap_or_else(|| io::Error::other("walk failed"));
            ReorgError::from_io(&path, source)
        })?;

        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);
        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target).at(&target)?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target).map_err(|err| classify(entry.path(), &target, err))?;
        } else {
            tracing::warn!("skipping special entry during copy: {}", entry.path().display());
        }
    }
    Ok(())
}

/// A missing source is reported against the source, anything else against
/// the destination being written.
fn classify(src: &Path, dst: &Path, err: io::Error) -> ReorgError {
    if err.kind() == io::ErrorKind::NotFound && !src.exists() {
        ReorgError::from_io(src, err)
    } else {
        ReorgError::from_io(dst, err)
    }
}

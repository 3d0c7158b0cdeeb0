//! Collision-free names for duplicated roots.

use crate::error::{IoResultExt, ReorgError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

const DUPLICATE_SUFFIX: &str = "_duplicated";

/// `stem`, optional `_duplicated`, optional `_<N>` after it.
static DUPLICATE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)(_duplicated(?:_(\d+))?)?$").expect("valid duplicate name regex")
});

/// Split a file name into its stem and duplicate number (`_duplicated` is 1).
fn parse_name(name: &str) -> Option<(&str, Option<u64>)> {
    let caps = DUPLICATE_NAME.captures(name)?;
    let stem = caps.get(1).map_or("", |m| m.as_str());
    let number = match (caps.get(2), caps.get(3)) {
        (None, _) => None,
        (Some(_), None) => Some(1),
        (Some(_), Some(n)) => Some(n.as_str().parse().ok()?),
    };
    Some((stem, number))
}

/// Sibling path of `base` that no existing entry in its parent already uses.
///
/// `photos` becomes `photos_duplicated`, then `photos_duplicated_2`, and so on;
/// passing `photos_duplicated_2` itself yields the next free number for the
/// `photos` stem. Not safe against concurrent changes to the parent directory.
pub fn next_duplicate_path(base: &Path) -> Result<PathBuf> {
    let name = base
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| ReorgError::BadRequest(format!("Path has no name: {}", base.display())))?;
    let parent = match base.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        Some(_) => PathBuf::from("."),
        None => {
            return Err(ReorgError::BadRequest(format!(
                "Path has no parent directory: {}",
                base.display()
            )))
        }
    };

    let stem = parse_name(&name).map_or(name.as_str(), |(stem, _)| stem).to_string();

    let mut highest: Option<u64> = None;
    for entry in fs::read_dir(&parent).at(&parent)? {
        let entry = entry.at(&parent)?;
        let entry_name = entry.file_name().to_string_lossy().to_string();
        if let Some((entry_stem, Some(number))) = parse_name(&entry_name) {
            if entry_stem == stem {
                highest = Some(highest.map_or(number, |h| h.max(number)));
            }
        }
    }

    let candidate = match highest {
        Some(n) => format!("{stem}{DUPLICATE_SUFFIX}_{}", n + 1),
        None => format!("{stem}{DUPLICATE_SUFFIX}"),
    };
    tracing::debug!("duplicate of {} will be {}", base.display(), candidate);
    Ok(parent.join(candidate))
}

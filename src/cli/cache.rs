//! Default location of the summary cache database.

use std::path::PathBuf;

const APP_DIR: &str = "reorg";
const DB_FILE: &str = "summaries.db";

/// `<cache root>/reorg/summaries.db`, if a cache root can be determined.
pub fn default_db_path() -> Option<PathBuf> {
    cache_root_dir().map(|root| root.join(APP_DIR).join(DB_FILE))
}

pub fn cache_root_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("LOCALAPPDATA").map(PathBuf::from)
    }
    #[cfg(not(target_os = "windows"))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CACHE_HOME").filter(|v| !v.is_empty()) {
            return Some(PathBuf::from(xdg));
        }
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_db_path_ends_with_app_file() {
        if let Some(path) = default_db_path() {
            assert!(path.ends_with("reorg/summaries.db"));
        }
    }
}

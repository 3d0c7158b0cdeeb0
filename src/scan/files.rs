//! Discovers the files under a root that should be summarized and planned.

use crate::error::{ReorgError, Result};
use crate::utils::relative_to;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::PathBuf;

/// Directories that never hold user documents worth reorganizing.
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules", "__pycache__", ".venv", "venv"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Relative to the scan root, forward slashes.
    pub relative_path: String,
    pub size_bytes: u64,
}

/// Walks a root and returns its regular files.
pub struct FileScanner {
    root_path: PathBuf,
    exclude_globs: Vec<String>,
    respect_gitignore: bool,
    include_hidden: bool,
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path, exclude_globs: Vec::new(), respect_gitignore: false, include_hidden: false }
    }

    /// Set glob patterns (matched against relative paths) to exclude
    pub fn exclude_globs(mut self, globs: Vec<String>) -> Self {
        self.exclude_globs = globs;
        self
    }

    /// Set whether to respect gitignore files
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Set whether dot-files and dot-directories are included
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    fn build_exclude_globset(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude_globs {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => tracing::warn!("ignoring invalid exclude glob '{}': {}", pattern, err),
            }
        }
        builder
            .build()
            .map_err(|err| ReorgError::BadRequest(format!("Invalid exclude globs: {err}")))
    }

    /// Regular files sorted by relative path. Symbolic links are not followed.
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        if !self.root_path.is_dir() {
            return Err(ReorgError::BadRequest(format!(
                "Path does not exist in filesystem: {}",
                self.root_path.display()
            )));
        }

        let exclude_globset = self.build_exclude_globset()?;
        let include_hidden = self.include_hidden;

        let mut builder = WalkBuilder::new(&self.root_path);
        builder
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .follow_links(false)
            .hidden(!include_hidden)
            .parents(self.respect_gitignore)
            .filter_entry(|entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                let name = entry.file_name().to_str().unwrap_or("");
                !(is_dir && SKIPPED_DIRS.contains(&name))
            });

        let mut files = Vec::new();
        for entry_result in builder.build() {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let path = entry.path();
            let Some(relative_path) = relative_to(&self.root_path, path) else {
                continue;
            };
            if exclude_globset.is_match(&relative_path) {
                tracing::debug!("excluded by glob: {}", relative_path);
                continue;
            }

            let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
            files.push(ScannedFile { path: path.to_path_buf(), relative_path, size_bytes });
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        tracing::debug!("scanned {} files under {}", files.len(), self.root_path.display());
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn scan_files(root: &Path) -> Result<Vec<ScannedFile>> {
        FileScanner::new(root.to_path_buf()).scan()
    }

    fn rels(files: &[ScannedFile]) -> Vec<&str> {
        files.iter().map(|f| f.relative_path.as_str()).collect()
    }

    #[test]
    fn scan_returns_sorted_relative_paths() {
        let tmp = TempDir::new().expect("tmp");
        let root = tmp.path();
        fs::create_dir_all(root.join("photos/2024")).expect("mkdir");
        fs::write(root.join("photos/2024/beach.jpg"), "jpg").expect("write");
        fs::write(root.join("b.txt"), "b").expect("write");
        fs::write(root.join("a.pdf"), "a").expect("write");

        let files = scan_files(root).expect("scan");
        assert_eq!(rels(&files), vec!["a.pdf", "b.txt", "photos/2024/beach.jpg"]);
        assert_eq!(files[0].size_bytes, 1);
    }

    #[test]
    fn scan_skips_noise_and_hidden_entries() {
        let tmp = TempDir::new().expect("tmp");
        let root = tmp.path();
        fs::create_dir_all(root.join("node_modules/pkg")).expect("mkdir");
        fs::write(root.join("node_modules/pkg/index.js"), "x").expect("write");
        fs::write(root.join(".DS_Store"), "x").expect("write");
        fs::write(root.join("keep.txt"), "x").expect("write");

        let files = scan_files(root).expect("scan");
        assert_eq!(rels(&files), vec!["keep.txt"]);

        let with_hidden = FileScanner::new(root.to_path_buf()).include_hidden(true).scan().unwrap();
        assert_eq!(rels(&with_hidden), vec![".DS_Store", "keep.txt"]);
    }

    #[test]
    fn scan_applies_exclude_globs() {
        let tmp = TempDir::new().expect("tmp");
        let root = tmp.path();
        fs::write(root.join("draft.tmp"), "x").expect("write");
        fs::write(root.join("final.txt"), "x").expect("write");

        let files = FileScanner::new(root.to_path_buf())
            .exclude_globs(vec!["*.tmp".to_string()])
            .scan()
            .expect("scan");
        assert_eq!(rels(&files), vec!["final.txt"]);
    }

    #[test]
    fn scan_respects_gitignore_when_asked() {
        let tmp = TempDir::new().expect("tmp");
        let root = tmp.path();
        fs::write(root.join(".gitignore"), "ignored.txt\n").expect("write");
        fs::write(root.join("ignored.txt"), "x").expect("write");
        fs::write(root.join("kept.txt"), "x").expect("write");

        let plain = scan_files(root).expect("scan");
        assert!(rels(&plain).contains(&"ignored.txt"));

        let filtered = FileScanner::new(root.to_path_buf()).respect_gitignore(true).scan().unwrap();
        assert_eq!(rels(&filtered), vec!["kept.txt"]);
    }

    #[test]
    fn scan_rejects_missing_root() {
        let tmp = TempDir::new().expect("tmp");
        let err = scan_files(&tmp.path().join("missing")).expect_err("missing root");
        assert_eq!(err.kind(), crate::error::ErrorKind::BadRequest);
    }
}

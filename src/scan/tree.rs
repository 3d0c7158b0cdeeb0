//! Directory tree generation for the folder view.

use crate::cache::SummaryCache;
use crate::domain::TreeNode;
use crate::error::{IoResultExt, ReorgError, Result};
use crate::utils::{absolutize, display_path, format_mtime, format_size};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds annotated directory trees.
///
/// Entries of one directory are processed in parallel on the current rayon
/// pool; a parent's size is only computed once every child has finished.
/// Symbolic links are reported as leaves and never descended into.
pub struct TreeBuilder<'a> {
    cache: &'a SummaryCache,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(cache: &'a SummaryCache) -> Self {
        Self { cache }
    }

    /// Entries of `root` (directories first) and the total size in bytes.
    pub fn build(&self, root: &Path) -> Result<(Vec<TreeNode>, u64)> {
        let root = absolutize(root)?;
        let metadata = fs::metadata(&root).at(&root)?;
        if !metadata.is_dir() {
            return Err(ReorgError::BadRequest(format!(
                "Not a directory: {}",
                root.display()
            )));
        }
        self.build_level(&root, 0)
    }

    fn build_level(&self, dir: &Path, depth: usize) -> Result<(Vec<TreeNode>, u64)> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(dir).at(dir)? {
            paths.push(entry.at(dir)?.path());
        }

        // Indexed collect keeps encounter order regardless of completion order.
        let built: Vec<(TreeNode, u64)> = paths
            .par_iter()
            .map(|path| self.build_entry(path, depth))
            .collect::<Result<Vec<_>>>()?;

        let total_size = built.iter().map(|(_, size)| *size).sum();
        let mut nodes: Vec<TreeNode> = built.into_iter().map(|(node, _)| node).collect();
        nodes.sort_by_key(|node| !node.is_directory);
        Ok((nodes, total_size))
    }

    fn build_entry(&self, path: &Path, depth: usize) -> Result<(TreeNode, u64)> {
        let metadata = fs::symlink_metadata(path).at(path)?;
        let summary = self.cache.summary_for_path(path)?;
        let is_directory = metadata.is_dir();

        let (children, size) = if is_directory {
            self.build_level(path, depth + 1)?
        } else {
            (Vec::new(), metadata.len())
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| display_path(path));
        tracing::trace!("tree entry {} ({} bytes)", display_path(path), size);

        let node = TreeNode {
            name,
            absolute_path: display_path(path),
            is_directory,
            size: format_size(size),
            modified: format_mtime(metadata.modified().at(path)?),
            children,
            children_expanded: false,
            depth,
            summary,
        };
        Ok((node, size))
    }
}

//! Filesystem traversal: the annotated folder view and the flat file scan

pub mod files;
pub mod tree;

pub use files::{FileScanner, ScannedFile};
pub use tree::TreeBuilder;

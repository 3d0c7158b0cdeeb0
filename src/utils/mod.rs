//! Small shared helpers: fingerprints, path handling, labels, text excerpts.

pub mod format;
pub mod hashing;
pub mod paths;
pub mod text;

pub use format::{format_mtime, format_size};
pub use hashing::hash_file;
pub use paths::{absolutize, display_path, normalize_path, relative_to, sanitize_relative};
pub use text::{read_text_excerpt, TextExcerpt};

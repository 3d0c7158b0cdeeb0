//! Human-readable output.

pub mod tree;

pub use tree::{render_tree, TreeRenderOptions};

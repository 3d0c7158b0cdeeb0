//! Runtime settings for the CLI
//!
//! A `reorg.toml`/`reorg.yaml` file is read first, then `REORG_*` environment
//! variables, then command-line flags (CLI > Env > File > Defaults).

pub mod loader;
pub mod merge;

pub use loader::load_config;
pub use merge::{merge_cli_with_config, CliOverrides};

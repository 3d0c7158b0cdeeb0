//! reorg: reorganize folders using file summaries from a language model
//!
//! The library exposes the [`engine::Engine`] operations (folder view, single
//! file summaries, full reorganization, accepted-change commits and cache
//! lookups) over a content-addressed summary cache. The `reorg` binary is a
//! thin CLI on top.

pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod llm;
pub mod render;
pub mod reorg;
pub mod scan;
pub mod utils;

pub use engine::{Engine, EngineOptions, ReorganizeOutcome};
pub use error::{ErrorKind, ReorgError, Result};

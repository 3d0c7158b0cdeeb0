//! External collaborators: the summarizer and the layout planner.
//!
//! The engine only sees the two traits below. [`ChatClient`] implements both
//! against an OpenAI-compatible chat completions endpoint; tests substitute
//! their own implementations.

pub mod client;
pub mod json;
pub mod prompts;

use crate::domain::{FileSummary, ModelSettings, PlanItem, PlanSettings};
use crate::error::Result;
use std::path::Path;

pub use client::ChatClient;

/// Produces a short natural-language description of one file.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, path: &Path, settings: &ModelSettings) -> Result<String>;
}

/// Proposes a new relative path for each summarized file.
pub trait Planner: Send + Sync {
    fn plan(&self, summaries: &[FileSummary], settings: &PlanSettings) -> Result<Vec<PlanItem>>;
}

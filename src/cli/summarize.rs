//! Summarize command: describe one file and cache the description.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

use super::utils::{build_engine, print_json, resolve_config, GlobalOpts};
use crate::config::CliOverrides;

#[derive(Args)]
pub struct SummarizeArgs {
    /// File to summarize
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Model name passed to the chat endpoint
    #[arg(short, long)]
    pub model: Option<String>,

    /// Extra instruction appended to the prompt
    #[arg(short, long)]
    pub instruction: Option<String>,

    /// API key for the chat endpoint (overrides REORG_API_KEY / GROQ_API_KEY)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,
}

pub fn run(args: SummarizeArgs, globals: &GlobalOpts) -> Result<()> {
    let overrides = CliOverrides {
        model: args.model,
        instruction: args.instruction,
        api_key: args.api_key,
        api_base: args.api_base,
        ..Default::default()
    };
    let config = resolve_config(globals, overrides)?;
    let engine = build_engine(&config, false)?;

    let summary = engine
        .summarize_file(&args.path, &config.model_settings())
        .with_context(|| format!("Failed to summarize {}", args.path.display()))?;
    print_json(&json!({ "summary": summary }))
}

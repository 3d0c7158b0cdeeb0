//! Lookup command: show a file's fingerprint and cached summary.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

use super::utils::{build_engine, print_json, resolve_config, GlobalOpts};
use crate::config::CliOverrides;

#[derive(Args)]
pub struct LookupArgs {
    /// File to look up
    #[arg(value_name = "FILE")]
    pub path: PathBuf,
}

pub fn run(args: LookupArgs, globals: &GlobalOpts) -> Result<()> {
    let config = resolve_config(globals, CliOverrides::default())?;
    let engine = build_engine(&config, false)?;

    let (fingerprint, record) = engine
        .lookup(&args.path)
        .with_context(|| format!("Failed to look up {}", args.path.display()))?;

    print_json(&json!({
        "file_hash": fingerprint,
        "cached": record.is_some(),
        "file_type": record.as_ref().map(|r| r.kind.as_str()),
        "summary": record.as_ref().map(|r| r.summary.as_str()),
    }))
}

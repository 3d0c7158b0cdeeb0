//! Apply command: commit one accepted change from a proposed layout.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

use super::utils::{build_engine, print_json, resolve_config, GlobalOpts};
use crate::config::CliOverrides;
use crate::utils::display_path;

#[derive(Args)]
pub struct ApplyArgs {
    /// Directory both paths are relative to
    #[arg(value_name = "BASE")]
    pub base: PathBuf,

    /// Current relative path of the file
    #[arg(value_name = "SRC")]
    pub src: String,

    /// Accepted new relative path
    #[arg(value_name = "DST")]
    pub dst: String,
}

pub fn run(args: ApplyArgs, globals: &GlobalOpts) -> Result<()> {
    let config = resolve_config(globals, CliOverrides::default())?;
    let engine = build_engine(&config, false)?;

    let landed = engine
        .apply_change(&args.base, &args.src, &args.dst)
        .with_context(|| format!("Failed to move {} to {}", args.src, args.dst))?;
    tracing::info!("moved {} to {}", args.src, display_path(&landed));
    print_json(&json!({ "destination": display_path(&landed) }))
}

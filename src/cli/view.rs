//! View command: the annotated folder tree of a directory.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::utils::{build_engine, print_json, resolve_config, root_label, GlobalOpts, OutputFormat};
use crate::config::CliOverrides;
use crate::render::{render_tree, TreeRenderOptions};

#[derive(Args)]
pub struct ViewArgs {
    /// Directory to display
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Deepest level drawn in text output (0 = top level only)
    #[arg(long, value_name = "N")]
    pub depth: Option<usize>,

    /// Append cached summaries to entries in text output
    #[arg(long)]
    pub summaries: bool,
}

pub fn run(args: ViewArgs, globals: &GlobalOpts) -> Result<()> {
    let config = resolve_config(globals, CliOverrides::default())?;
    let engine = build_engine(&config, false)?;

    let nodes = engine
        .folder_view(&args.path)
        .with_context(|| format!("Failed to read folder {}", args.path.display()))?;

    match args.format {
        OutputFormat::Json => print_json(&nodes),
        OutputFormat::Text => {
            let options = TreeRenderOptions { max_depth: args.depth, show_summaries: args.summaries };
            println!("{}", render_tree(&root_label(&args.path), &nodes, &options));
            Ok(())
        }
    }
}

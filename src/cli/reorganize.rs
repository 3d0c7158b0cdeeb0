//! Reorganize command: summarize, plan and apply a new layout for a folder.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::utils::{
    build_engine, parse_csv, print_json, resolve_config, root_label, GlobalOpts, OutputFormat,
};
use crate::config::CliOverrides;
use crate::domain::{ActionMode, ReorganizeRequest, MAX_TREE_DEPTH_LIMIT};
use crate::render::{render_tree, TreeRenderOptions};

#[derive(Args)]
pub struct ReorganizeArgs {
    /// Directory to reorganize
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// `move` rearranges in place; `duplicate` builds a reorganized copy next to it
    #[arg(long, value_name = "MODE")]
    pub mode: Option<ActionMode>,

    /// Summarize every file again instead of reusing cached summaries
    #[arg(long)]
    pub fresh: bool,

    /// Deepest folder nesting the planner may use (0-10)
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// File naming template, e.g. "{Y}-{M}-{D}_{CONTENT}.{EXT}"
    #[arg(long, value_name = "TEMPLATE")]
    pub template: Option<String>,

    /// Model name passed to the chat endpoint
    #[arg(short, long)]
    pub model: Option<String>,

    /// Extra instruction for the summarizer and planner
    #[arg(short, long)]
    pub instruction: Option<String>,

    /// API key for the chat endpoint (overrides REORG_API_KEY / GROQ_API_KEY)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Skip paths matching these globs (comma-separated)
    #[arg(short = 'e', long, value_name = "GLOBS")]
    pub exclude_glob: Option<String>,

    /// Honor .gitignore files while scanning
    #[arg(long)]
    pub gitignore: bool,

    /// Also reorganize dot-files and dot-directories
    #[arg(long)]
    pub hidden: bool,

    /// Worker threads (0 = one per CPU)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

pub fn run(args: ReorganizeArgs, globals: &GlobalOpts) -> Result<()> {
    if let Some(depth) = args.max_depth.filter(|d| *d > MAX_TREE_DEPTH_LIMIT) {
        tracing::warn!("--max-depth {} exceeds {}, clamping", depth, MAX_TREE_DEPTH_LIMIT);
    }

    let overrides = CliOverrides {
        model: args.model,
        instruction: args.instruction,
        max_tree_depth: args.max_depth,
        naming_template: args.template,
        mode: args.mode,
        api_base: args.api_base,
        api_key: args.api_key,
        max_concurrency: args.jobs,
        reuse_cached_summaries: if args.fresh { Some(false) } else { None },
        respect_gitignore: if args.gitignore { Some(true) } else { None },
        include_hidden: if args.hidden { Some(true) } else { None },
        exclude_globs: parse_csv(&args.exclude_glob),
        ..Default::default()
    };
    let config = resolve_config(globals, overrides)?;
    let engine = build_engine(&config, true)?;

    let request = ReorganizeRequest {
        root: args.path.clone(),
        model: config.model_settings(),
        max_depth: config.max_tree_depth,
        template: config.naming_template.clone(),
        mode: config.mode,
    };
    let outcome = engine
        .reorganize(&request)
        .with_context(|| format!("Failed to reorganize {}", args.path.display()))?;

    match args.format {
        OutputFormat::Json => print_json(&outcome),
        OutputFormat::Text => {
            let options = TreeRenderOptions { max_depth: None, show_summaries: true };
            println!("{}", render_tree(&root_label(&outcome.result_root), &outcome.tree, &options));
            let verb = match outcome.report.mode {
                ActionMode::Move => "moved",
                ActionMode::Duplicate => "copied",
            };
            eprintln!("{} files {}", outcome.report.applied.len(), verb);
            Ok(())
        }
    }
}

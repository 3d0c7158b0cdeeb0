//! Command-line interface for reorg
//!
//! Provides `view`, `summarize`, `reorganize`, `apply` and `lookup` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod apply;
mod cache;
mod lookup;
mod reorganize;
mod summarize;
mod utils;
mod view;

use utils::GlobalOpts;

/// Reorganize folders using file summaries from a language model
#[derive(Parser)]
#[command(name = "reorg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: reorg.toml, .reorg.toml, reorg.yml or reorg.yaml in the working directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Summary cache database (default: <cache dir>/reorg/summaries.db)
    #[arg(long, global = true, value_name = "FILE")]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a directory tree annotated with sizes, dates and cached summaries
    View(view::ViewArgs),

    /// Summarize one file and store the summary in the cache
    Summarize(summarize::SummarizeArgs),

    /// Summarize, plan and apply a new layout for a directory
    Reorganize(Box<reorganize::ReorganizeArgs>),

    /// Move one file as part of an accepted layout
    Apply(apply::ApplyArgs),

    /// Show a file's content hash and cached summary
    Lookup(lookup::LookupArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let globals = GlobalOpts { config: cli.config, db: cli.db };
    match cli.command {
        Commands::View(args) => view::run(args, &globals),
        Commands::Summarize(args) => summarize::run(args, &globals),
        Commands::Reorganize(args) => reorganize::run(*args, &globals),
        Commands::Apply(args) => apply::run(args, &globals),
        Commands::Lookup(args) => lookup::run(args, &globals),
    }
}

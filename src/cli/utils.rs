//! Shared CLI utilities.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::cache::default_db_path;
use crate::cache::SummaryCache;
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::Config;
use crate::engine::{Engine, EngineOptions};
use crate::llm::ChatClient;

/// Options every subcommand accepts.
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    pub config: Option<PathBuf>,
    pub db: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Parse a comma-separated string into a `Vec<String>`, trimming whitespace and
/// discarding empty segments.  Returns `None` when `value` is `None`.
pub fn parse_csv(value: &Option<String>) -> Option<Vec<String>> {
    value.as_ref().map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
    })
}

/// File config from the working directory (or `--config`), then env, then flags.
pub fn resolve_config(globals: &GlobalOpts, mut overrides: CliOverrides) -> Result<Config> {
    let anchor = std::env::current_dir().context("Failed to read the working directory")?;
    let file_config = load_config(&anchor, globals.config.as_deref())?;
    if overrides.db_path.is_none() {
        overrides.db_path = globals.db.clone();
    }
    Ok(merge_cli_with_config(file_config, overrides))
}

pub fn open_cache(config: &Config) -> Result<SummaryCache> {
    let db_path = match &config.db_path {
        Some(path) => path.clone(),
        None => default_db_path().context(
            "Could not determine a cache directory; pass --db or set REORG_DB",
        )?,
    };
    SummaryCache::open(&db_path)
        .with_context(|| format!("Failed to open summary cache at {}", db_path.display()))
}

/// Engine backed by the configured cache and the chat endpoint.
pub fn build_engine(config: &Config, show_progress: bool) -> Result<Engine> {
    let cache = Arc::new(open_cache(config)?);
    let client = Arc::new(
        ChatClient::new(
            &config.api_base,
            Duration::from_secs(config.request_timeout_secs),
            config.max_excerpt_bytes,
        )
        .context("Failed to set up the model client")?,
    );

    let options = EngineOptions { show_progress, ..EngineOptions::from(config) };
    Engine::new(cache, client.clone(), client, options).context("Failed to start the engine")
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

/// Label for the top line of a text tree.
pub fn root_label(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| crate::utils::display_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_csv_trims_and_drops_empty_parts() {
        let parsed = parse_csv(&Some(" *.tmp, ,build/** ".to_string())).unwrap();
        assert_eq!(parsed, vec!["*.tmp".to_string(), "build/**".to_string()]);
        assert!(parse_csv(&None).is_none());
    }

    #[test]
    fn root_label_uses_directory_name() {
        assert_eq!(root_label(Path::new("/home/me/Downloads")), "Downloads");
        assert_eq!(root_label(Path::new("/")), "/");
    }
}

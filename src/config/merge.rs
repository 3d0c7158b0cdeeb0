//! Layering of environment variables and command-line flags over file config.

use crate::domain::{ActionMode, Config};
use std::path::PathBuf;

pub const API_KEY_ENV: &str = "REORG_API_KEY";
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const DB_PATH_ENV: &str = "REORG_DB";

/// Values given on the command line. `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db_path: Option<PathBuf>,
    pub model: Option<String>,
    pub instruction: Option<String>,
    pub max_tree_depth: Option<usize>,
    pub naming_template: Option<String>,
    pub mode: Option<ActionMode>,
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub max_concurrency: Option<usize>,
    pub reuse_cached_summaries: Option<bool>,
    pub respect_gitignore: Option<bool>,
    pub include_hidden: Option<bool>,
    pub exclude_globs: Option<Vec<String>>,
}

/// Apply environment variables, then CLI flags, on top of `config`.
pub fn merge_cli_with_config(config: Config, cli: CliOverrides) -> Config {
    let merged = apply_env(config, |key| std::env::var(key).ok());
    apply_cli(merged, cli)
}

/// Fill settings from the environment. `REORG_API_KEY` wins over
/// `GROQ_API_KEY`; empty values are ignored.
pub fn apply_env<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = non_empty(API_KEY_ENV).or_else(|| non_empty(GROQ_API_KEY_ENV)) {
        config.api_key = Some(key);
    }
    if let Some(db) = non_empty(DB_PATH_ENV) {
        config.db_path = Some(PathBuf::from(db));
    }
    config
}

fn apply_cli(mut config: Config, cli: CliOverrides) -> Config {
    if let Some(v) = cli.db_path {
        config.db_path = Some(v);
    }
    if let Some(v) = cli.model {
        config.model = v;
    }
    if let Some(v) = cli.instruction {
        config.instruction = v;
    }
    if let Some(v) = cli.max_tree_depth {
        config.max_tree_depth = v;
    }
    if let Some(v) = cli.naming_template {
        config.naming_template = v;
    }
    if let Some(v) = cli.mode {
        config.mode = v;
    }
    if let Some(v) = cli.api_base {
        config.api_base = v;
    }
    if let Some(v) = cli.api_key {
        config.api_key = Some(v);
    }
    if let Some(v) = cli.max_concurrency {
        config.max_concurrency = v;
    }
    if let Some(v) = cli.reuse_cached_summaries {
        config.reuse_cached_summaries = v;
    }
    if let Some(v) = cli.respect_gitignore {
        config.respect_gitignore = v;
    }
    if let Some(v) = cli.include_hidden {
        config.include_hidden = v;
    }
    if let Some(globs) = cli.exclude_globs {
        for glob in globs {
            if !config.exclude_globs.contains(&glob) {
                config.exclude_globs.push(glob);
            }
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn reorg_key_wins_over_groq_key() {
        let cfg = apply_env(
            Config::default(),
            env(&[(API_KEY_ENV, "primary"), (GROQ_API_KEY_ENV, "fallback")]),
        );
        assert_eq!(cfg.api_key.as_deref(), Some("primary"));

        let cfg = apply_env(Config::default(), env(&[(GROQ_API_KEY_ENV, "fallback")]));
        assert_eq!(cfg.api_key.as_deref(), Some("fallback"));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut base = Config::default();
        base.api_key = Some("from-file".to_string());
        let cfg = apply_env(base, env(&[(API_KEY_ENV, "  "), (DB_PATH_ENV, "")]));
        assert_eq!(cfg.api_key.as_deref(), Some("from-file"));
        assert!(cfg.db_path.is_none());
    }

    #[test]
    fn cli_overrides_env_and_file() {
        let file = apply_env(Config::default(), env(&[(DB_PATH_ENV, "/env/cache.db")]));
        let cfg = apply_cli(
            file,
            CliOverrides {
                db_path: Some(PathBuf::from("/cli/cache.db")),
                mode: Some(ActionMode::Move),
                reuse_cached_summaries: Some(false),
                include_hidden: Some(true),
                exclude_globs: Some(vec!["*.log".to_string()]),
                ..Default::default()
            },
        );
        assert_eq!(cfg.db_path, Some(PathBuf::from("/cli/cache.db")));
        assert_eq!(cfg.mode, ActionMode::Move);
        assert!(!cfg.reuse_cached_summaries);
        assert!(cfg.include_hidden);
        assert_eq!(cfg.exclude_globs, vec!["*.log".to_string()]);
        assert_eq!(cfg.model, "llama3");
    }
}

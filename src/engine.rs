//! Transport-agnostic operations over a root directory.
//!
//! An [`Engine`] owns the shared summary cache, the two collaborators and a
//! bounded worker pool. Every public method is one user-facing operation; the
//! CLI is a thin layer over them and a server layer would be too.

use crate::cache::SummaryCache;
use crate::domain::{
    ActionMode, Config, FileSummary, Fingerprint, ModelSettings, PlanItem, ReorganizeRequest,
    SummaryRecord, TreeNode,
};
use crate::error::{IoResultExt, ReorgError, Result};
use crate::llm::{Planner, Summarizer};
use crate::reorg::{perform_action, ExecutionReport, ReorganizationExecutor};
use crate::scan::{FileScanner, ScannedFile, TreeBuilder};
use crate::utils::{absolutize, hash_file, sanitize_relative};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Tunables that are not part of any single request.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Worker threads for tree building and summarization; 0 means one per CPU.
    pub max_concurrency: usize,
    pub reuse_cached_summaries: bool,
    pub respect_gitignore: bool,
    pub include_hidden: bool,
    pub exclude_globs: Vec<String>,
    pub show_progress: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_concurrency: 0,
            reuse_cached_summaries: true,
            respect_gitignore: false,
            include_hidden: false,
            exclude_globs: Vec::new(),
            show_progress: false,
        }
    }
}

impl From<&Config> for EngineOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_concurrency: config.max_concurrency,
            reuse_cached_summaries: config.reuse_cached_summaries,
            respect_gitignore: config.respect_gitignore,
            include_hidden: config.include_hidden,
            exclude_globs: config.exclude_globs.clone(),
            show_progress: false,
        }
    }
}

/// Result of a full reorganization.
#[derive(Debug, Serialize)]
pub struct ReorganizeOutcome {
    pub result_root: PathBuf,
    pub tree: Vec<TreeNode>,
    pub report: ExecutionReport,
}

pub struct Engine {
    cache: Arc<SummaryCache>,
    summarizer: Arc<dyn Summarizer>,
    planner: Arc<dyn Planner>,
    pool: rayon::ThreadPool,
    options: EngineOptions,
}

impl Engine {
    pub fn new(
        cache: Arc<SummaryCache>,
        summarizer: Arc<dyn Summarizer>,
        planner: Arc<dyn Planner>,
        options: EngineOptions,
    ) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.max_concurrency)
            .thread_name(|i| format!("reorg-worker-{i}"))
            .build()
            .map_err(|e| ReorgError::Internal(format!("Failed to start worker pool: {e}")))?;
        tracing::debug!("engine worker pool has {} threads", pool.current_num_threads());

        Ok(Self { cache, summarizer, planner, pool, options })
    }

    pub fn cache(&self) -> &SummaryCache {
        &self.cache
    }

    /// Annotated tree of `path`'s contents, directories first.
    pub fn folder_view(&self, path: &Path) -> Result<Vec<TreeNode>> {
        if !path.exists() {
            return Err(ReorgError::NotFound(path.to_path_buf()));
        }
        let (nodes, total) = self.pool.install(|| TreeBuilder::new(&self.cache).build(path))?;
        tracing::debug!("folder view of {}: {} entries, {} bytes", path.display(), nodes.len(), total);
        Ok(nodes)
    }

    /// Summarize one file and cache the result under its fingerprint.
    pub fn summarize_file(&self, path: &Path, settings: &ModelSettings) -> Result<String> {
        if !path.is_file() {
            return Err(ReorgError::BadRequest(format!("Not a regular file: {}", path.display())));
        }

        let summary = self.summarize_checked(path, settings)?;
        let fingerprint = hash_file(path)?;
        self.cache.upsert(&fingerprint, &extension_of(path), &summary)?;
        Ok(summary)
    }

    /// Summarize, plan and apply a new layout for `request.root`.
    pub fn reorganize(&self, request: &ReorganizeRequest) -> Result<ReorganizeOutcome> {
        let root = absolutize(&request.root)?;
        if !root.exists() {
            return Err(ReorgError::BadRequest(format!(
                "Path does not exist in filesystem: {}",
                root.display()
            )));
        }

        let files = FileScanner::new(root.clone())
            .respect_gitignore(self.options.respect_gitignore)
            .include_hidden(self.options.include_hidden)
            .exclude_globs(self.options.exclude_globs.clone())
            .scan()?;
        tracing::info!("reorganizing {} files under {}", files.len(), root.display());

        let summaries = self.collect_summaries(&files, &request.model)?;
        let plan = self.planner.plan(&summaries, &request.plan_settings())?;
        check_plan_covers(&summaries, &plan)?;

        let report =
            ReorganizationExecutor::new(&self.cache).execute(&root, &summaries, &plan, request.mode)?;
        tracing::info!(
            "applied {} changes, result at {}",
            report.applied.len(),
            report.result_root.display()
        );

        let tree = self.folder_view(&report.result_root)?;
        Ok(ReorganizeOutcome { result_root: report.result_root.clone(), tree, report })
    }

    /// Move one file of an accepted plan from `src` to `dst`, both relative to
    /// `base`. Content is unchanged so its cached summary stays valid.
    pub fn apply_change(&self, base: &Path, src: &str, dst: &str) -> Result<PathBuf> {
        let source = base.join(sanitize_relative(src)?);
        let destination = base.join(sanitize_relative(dst)?);
        std::fs::symlink_metadata(&source).at(&source)?;
        perform_action(&source, &destination, ActionMode::Move)
    }

    /// Fingerprint of `path` and the cached record for it, if any.
    pub fn lookup(&self, path: &Path) -> Result<(Fingerprint, Option<SummaryRecord>)> {
        std::fs::metadata(path).at(path)?;
        let fingerprint = hash_file(path)?;
        let record = self.cache.lookup(&fingerprint)?;
        Ok((fingerprint, record))
    }

    fn collect_summaries(
        &self,
        files: &[ScannedFile],
        settings: &ModelSettings,
    ) -> Result<Vec<FileSummary>> {
        let progress = self.progress_bar(files.len() as u64);

        let summaries = self.pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    let summary = self.summary_for(file, settings);
                    progress.inc(1);
                    summary.map(|summary| FileSummary {
                        relative_path: file.relative_path.clone(),
                        summary,
                    })
                })
                .collect::<Result<Vec<_>>>()
        });

        progress.finish_and_clear();
        summaries
    }

    fn summary_for(&self, file: &ScannedFile, settings: &ModelSettings) -> Result<String> {
        if self.options.reuse_cached_summaries {
            let fingerprint = hash_file(&file.path)?;
            if let Some(record) = self.cache.lookup(&fingerprint)? {
                if !record.summary.trim().is_empty() {
                    tracing::debug!("cache hit for {}", file.relative_path);
                    return Ok(record.summary);
                }
            }
        }
        self.summarize_checked(&file.path, settings)
    }

    fn summarize_checked(&self, path: &Path, settings: &ModelSettings) -> Result<String> {
        let summary = self.summarizer.summarize(path, settings)?;
        let summary = summary.trim();
        if summary.is_empty() {
            return Err(ReorgError::Upstream(format!(
                "Summarizer returned nothing for {}",
                path.display()
            )));
        }
        Ok(summary.to_string())
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.options.show_progress || !std::io::stderr().is_terminal() {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::with_template(
            "  {spinner:.cyan} Summarizing [{bar:30.cyan/dim}] {pos}/{len} files ({eta} remaining)",
        ) {
            pb.set_style(style.progress_chars("━╸─"));
        }
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    }
}

/// The plan must mention every summarized file and nothing else.
fn check_plan_covers(summaries: &[FileSummary], plan: &[PlanItem]) -> Result<()> {
    let expected: HashSet<PathBuf> =
        summaries.iter().filter_map(|s| sanitize_relative(&s.relative_path).ok()).collect();
    let mut seen = HashSet::new();
    for item in plan {
        let original = sanitize_relative(&item.original_path)?;
        if !expected.contains(&original) {
            return Err(ReorgError::Upstream(format!(
                "Planner returned an unknown file: {}",
                item.original_path
            )));
        }
        seen.insert(original);
    }

    if let Some(missing) = expected.difference(&seen).next() {
        return Err(ReorgError::Upstream(format!(
            "Planner left out {}",
            missing.display()
        )));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension().map(|ext| ext.to_string_lossy().to_string()).unwrap_or_default()
}

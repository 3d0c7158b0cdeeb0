//! Applies a reorganization plan to the filesystem and keeps the summary cache
//! in step with the files' new locations.

use super::actions::perform_action;
use super::duplicate::next_duplicate_path;
use crate::cache::SummaryCache;
use crate::domain::{ActionMode, FileSummary, Fingerprint, PlanItem};
use crate::error::{IoResultExt, ReorgError, Result};
use crate::utils::{display_path, hash_file, sanitize_relative};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// One item that made it to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedAction {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub fingerprint: Fingerprint,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    pub result_root: PathBuf,
    pub mode: ActionMode,
    pub applied: Vec<AppliedAction>,
}

/// A plan item after validation, ready to apply.
#[derive(Debug)]
struct StagedItem<'a> {
    /// Position in the plan as given.
    index: usize,
    source: PathBuf,
    destination: PathBuf,
    kind: String,
    summary: &'a str,
}

pub struct ReorganizationExecutor<'a> {
    cache: &'a SummaryCache,
}

impl<'a> ReorganizationExecutor<'a> {
    pub fn new(cache: &'a SummaryCache) -> Self {
        Self { cache }
    }

    /// Validate the whole plan, then apply it item by item.
    ///
    /// Items run in plan order except where one item's destination is
    /// another's source; the vacating item then runs first. Nothing is touched unless every item stages cleanly. Once mutation has
    /// started a failure stops the batch with [`ReorgError::Action`]; items
    /// applied before it stay applied.
    pub fn execute(
        &self,
        root: &Path,
        summaries: &[FileSummary],
        plan: &[PlanItem],
        mode: ActionMode,
    ) -> Result<ExecutionReport> {
        let result_root = match mode {
            ActionMode::Move => root.to_path_buf(),
            ActionMode::Duplicate => next_duplicate_path(root)?,
        };

        let staged = stage(root, &result_root, summaries, plan)?;
        tracing::info!(
            "applying {} planned changes ({}) into {}",
            staged.len(),
            mode,
            result_root.display()
        );

        if mode == ActionMode::Duplicate {
            fs::create_dir_all(&result_root).at(&result_root)?;
        }

        let mut applied = Vec::with_capacity(staged.len());
        for item in &staged {
            let fingerprint = self.apply(item, mode).map_err(|error| ReorgError::Action {
                index: item.index,
                source_path: item.source.clone(),
                destination: item.destination.clone(),
                error: Box::new(error),
            })?;
            applied.push(AppliedAction {
                source: item.source.clone(),
                destination: item.destination.clone(),
                fingerprint,
            });
        }

        Ok(ExecutionReport { result_root, mode, applied })
    }

    fn apply(&self, item: &StagedItem<'_>, mode: ActionMode) -> Result<Fingerprint> {
        let landed = perform_action(&item.source, &item.destination, mode)?;

        let fingerprint = hash_file(&landed)?;
        if fingerprint.is_empty() {
            tracing::debug!("no fingerprint for {}, cache untouched", display_path(&landed));
        } else {
            self.cache.upsert(&fingerprint, &item.kind, item.summary)?;
        }
        Ok(fingerprint)
    }
}

fn stage<'s>(
    root: &Path,
    result_root: &Path,
    summaries: &'s [FileSummary],
    plan: &[PlanItem],
) -> Result<Vec<StagedItem<'s>>> {
    let by_path: HashMap<PathBuf, &str> = summaries
        .iter()
        .filter_map(|s| sanitize_relative(&s.relative_path).ok().map(|p| (p, s.summary.as_str())))
        .collect();

    let mut parsed = Vec::with_capacity(plan.len());
    let mut sources = HashSet::new();
    for item in plan {
        let original = sanitize_relative(&item.original_path)?;
        let target = sanitize_relative(&item.new_path)?;

        let summary = by_path.get(&original).copied().ok_or_else(|| {
            ReorgError::Upstream(format!(
                "Planner returned a file without a summary: {}",
                item.original_path
            ))
        })?;

        let source = root.join(&original);
        if !sources.insert(source.clone()) {
            return Err(ReorgError::Upstream(format!(
                "Planner listed {} more than once",
                item.original_path
            )));
        }
        fs::symlink_metadata(&source).at(&source)?;
        parsed.push((item, original, source, result_root.join(target), summary));
    }

    // Paths that will be directories once the batch has run.
    let planned_dirs: HashSet<PathBuf> = parsed
        .iter()
        .flat_map(|(_, _, _, raw, _)| raw.ancestors().skip(1).map(Path::to_path_buf))
        .collect();

    let mut destinations = HashSet::new();
    let mut staged = Vec::with_capacity(parsed.len());
    for (index, (item, original, source, raw, summary)) in parsed.into_iter().enumerate() {
        let destination = match original.file_name() {
            Some(name) if raw != source && (raw.is_dir() || planned_dirs.contains(&raw)) => {
                raw.join(name)
            }
            _ => raw,
        };

        if !destinations.insert(destination.clone()) {
            return Err(ReorgError::Upstream(format!(
                "Planner assigned more than one file to {}",
                item.new_path
            )));
        }
        let occupied = fs::symlink_metadata(&destination).is_ok();
        if occupied && destination != source && !sources.contains(&destination) {
            return Err(ReorgError::Upstream(format!(
                "Planner would overwrite existing {}",
                display_path(&destination)
            )));
        }

        let kind = original
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_default();
        tracing::debug!("staged {} -> {}", display_path(&source), display_path(&destination));
        staged.push(StagedItem { index, source, destination, kind, summary });
    }
    order_for_chains(staged)
}

/// Reorder so that an item whose destination is another item's source runs
/// after that item has moved out of the way. Cycles cannot be ordered.
fn order_for_chains(staged: Vec<StagedItem<'_>>) -> Result<Vec<StagedItem<'_>>> {
    let by_source: HashMap<&Path, usize> =
        staged.iter().enumerate().map(|(i, item)| (item.source.as_path(), i)).collect();
    let blockers: Vec<Option<usize>> = staged
        .iter()
        .enumerate()
        .map(|(i, item)| by_source.get(item.destination.as_path()).copied().filter(|&j| j != i))
        .collect();

    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Pending,
        Visiting,
        Done,
    }

    let mut marks = vec![Mark::Pending; staged.len()];
    let mut order = Vec::with_capacity(staged.len());
    for start in 0..staged.len() {
        let mut chain = Vec::new();
        let mut next = Some(start);
        while let Some(i) = next {
            match marks[i] {
                Mark::Done => break,
                Mark::Visiting => {
                    return Err(ReorgError::Upstream(format!(
                        "Planner's moves form a cycle through {}",
                        display_path(&staged[i].source)
                    )));
                }
                Mark::Pending => {
                    marks[i] = Mark::Visiting;
                    chain.push(i);
                    next = blockers[i];
                }
            }
        }
        for &i in chain.iter().rev() {
            marks[i] = Mark::Done;
            order.push(i);
        }
    }

    if order.iter().enumerate().any(|(pos, &i)| pos != i) {
        tracing::debug!("reordered plan so chained moves do not overwrite each other");
    }
    let mut slots: Vec<Option<StagedItem<'_>>> = staged.into_iter().map(Some).collect();
    Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
}

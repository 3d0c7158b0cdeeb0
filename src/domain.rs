//! Core domain types shared across the engine, cache, collaborators and CLI.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_MODEL: &str = "llama3";
pub const DEFAULT_MAX_TREE_DEPTH: usize = 3;
pub const MAX_TREE_DEPTH_LIMIT: usize = 10;
pub const DEFAULT_NAMING_TEMPLATE: &str = "{Y}-{M}-{D}_{CONTENT}.{EXT}";
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Lowercase hex SHA-256 of a file's bytes. Empty when the file could not be
/// fingerprinted (missing, or not a regular file); an empty fingerprint is a
/// cache miss, never a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cached description of a piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub fingerprint: Fingerprint,
    /// File extension without the leading dot.
    pub kind: String,
    pub summary: String,
}

/// One entry of a directory view. Field names on the wire follow the
/// front-end's folder view contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub name: String,
    pub absolute_path: String,
    pub is_directory: bool,
    pub size: String,
    pub modified: String,
    #[serde(rename = "folderContents")]
    pub children: Vec<TreeNode>,
    #[serde(rename = "folderContentsDisplayed")]
    pub children_expanded: bool,
    pub depth: usize,
    pub summary: String,
}

/// Summary produced for one file, keyed by its path relative to the root
/// being reorganized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    #[serde(rename = "file_path")]
    pub relative_path: String,
    pub summary: String,
}

/// One planned relocation, relative to the source and result roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    #[serde(rename = "file_path")]
    pub original_path: String,
    pub new_path: String,
}

/// How a batch applies its plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionMode {
    Move,
    #[default]
    Duplicate,
}

impl fmt::Display for ActionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move => write!(f, "move"),
            Self::Duplicate => write!(f, "duplicate"),
        }
    }
}

impl FromStr for ActionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Numeric codes are what the desktop front-end sends.
        match s.trim().to_ascii_lowercase().as_str() {
            "move" | "0" => Ok(Self::Move),
            "duplicate" | "copy" | "1" => Ok(Self::Duplicate),
            other => Err(format!("Invalid action mode: '{other}' (expected move or duplicate)")),
        }
    }
}

/// Model selection and credential forwarded to the summarizer.
#[derive(Debug, Clone, Default)]
pub struct ModelSettings {
    pub model: String,
    pub instruction: String,
    pub credential: String,
}

/// Everything the planner needs besides the summaries themselves.
#[derive(Debug, Clone)]
pub struct PlanSettings {
    pub model: ModelSettings,
    pub max_depth: usize,
    pub template: String,
}

#[derive(Debug, Clone)]
pub struct ReorganizeRequest {
    pub root: PathBuf,
    pub model: ModelSettings,
    pub max_depth: usize,
    pub template: String,
    pub mode: ActionMode,
}

impl ReorganizeRequest {
    pub fn plan_settings(&self) -> PlanSettings {
        PlanSettings {
            model: self.model.clone(),
            max_depth: self.max_depth.min(MAX_TREE_DEPTH_LIMIT),
            template: self.template.clone(),
        }
    }
}

/// Layered runtime configuration. Every field has a default so partial config
/// files deserialize cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub db_path: Option<PathBuf>,
    pub model: String,
    pub instruction: String,
    pub max_tree_depth: usize,
    pub naming_template: String,
    pub mode: ActionMode,
    pub api_base: String,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub max_concurrency: usize,
    pub reuse_cached_summaries: bool,
    pub respect_gitignore: bool,
    /// Plan dot-files and dot-directories too.
    pub include_hidden: bool,
    pub exclude_globs: Vec<String>,
    pub max_excerpt_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            model: DEFAULT_MODEL.to_string(),
            instruction: String::new(),
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
            naming_template: DEFAULT_NAMING_TEMPLATE.to_string(),
            mode: ActionMode::default(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            request_timeout_secs: 120,
            max_concurrency: 0,
            reuse_cached_summaries: true,
            respect_gitignore: false,
            include_hidden: false,
            exclude_globs: Vec::new(),
            max_excerpt_bytes: 16_384,
        }
    }
}

impl Config {
    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            model: self.model.clone(),
            instruction: self.instruction.clone(),
            credential: self.api_key.clone().unwrap_or_default(),
        }
    }
}

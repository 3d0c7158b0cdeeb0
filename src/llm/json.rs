//! Pulling structured data out of free-form model replies.

use crate::domain::PlanItem;
use crate::error::{ReorgError, Result};
use serde::Deserialize;

/// Body of a fenced code block, preferring one tagged `json`.
fn fenced_block(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let body_start = start + 7;
        if let Some(end) = text[body_start..].find("```") {
            return Some(text[body_start..body_start + end].trim());
        }
    }

    let start = text.find("```")? + 3;
    let body_start = text[start..].find('\n').map(|i| start + i + 1).unwrap_or(start);
    let end = text[body_start..].find("```")?;
    Some(text[body_start..body_start + end].trim())
}

/// Extract a JSON object from a reply that may wrap it in prose or a code fence.
pub fn extract_json_object(text: &str) -> Option<&str> {
    if let Some(block) = fenced_block(text).filter(|b| b.starts_with('{')) {
        return Some(block);
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Extract a JSON array from a reply that may wrap it in prose or a code fence.
pub fn extract_json_array(text: &str) -> Option<&str> {
    if let Some(block) = fenced_block(text).filter(|b| b.starts_with('[')) {
        return Some(block);
    }
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (start < end).then(|| &text[start..=end])
}

#[derive(Deserialize)]
struct PlanEnvelope {
    files: Vec<PlanItem>,
}

/// Parse a planner reply: either a bare array of items or `{"files": [...]}`.
pub fn parse_plan(reply: &str) -> Result<Vec<PlanItem>> {
    if let Some(object) = extract_json_object(reply) {
        if let Ok(envelope) = serde_json::from_str::<PlanEnvelope>(object) {
            return Ok(envelope.files);
        }
    }

    let array = extract_json_array(reply)
        .ok_or_else(|| ReorgError::Upstream("Planner reply contained no JSON plan".to_string()))?;
    serde_json::from_str(array)
        .map_err(|err| ReorgError::Upstream(format!("Planner reply is not a valid plan: {err}")))
}

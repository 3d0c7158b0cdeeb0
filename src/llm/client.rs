//! Blocking client for OpenAI-compatible chat completion APIs.
//!
//! Handles:
//! - bearer authentication (skipped when no credential is configured)
//! - retries with exponential backoff on rate limiting
//! - turning file content and summaries into prompts

use super::json::parse_plan;
use super::prompts::{self, FileContent};
use super::{Planner, Summarizer};
use crate::domain::{FileSummary, ModelSettings, PlanItem, PlanSettings};
use crate::error::{IoResultExt, ReorgError, Result};
use crate::utils::read_text_excerpt;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const MAX_RETRIES: u32 = 3;
const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn system(content: &str) -> Self {
        Self { role: "system".to_string(), content: content.to_string() }
    }

    fn user(content: String) -> Self {
        Self { role: "user".to_string(), content }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

pub struct ChatClient {
    client: Client,
    api_base: String,
    max_excerpt_bytes: usize,
}

impl ChatClient {
    pub fn new(api_base: &str, timeout: Duration, max_excerpt_bytes: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReorgError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            max_excerpt_bytes,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    /// Send one chat exchange and return the assistant's reply text.
    fn complete(&self, settings: &ModelSettings, messages: Vec<ChatMessage>) -> Result<String> {
        let request = ChatRequest { model: &settings.model, messages, temperature: 0.2 };
        let mut retry_delay = INITIAL_RETRY_DELAY;

        for retry in 0..=MAX_RETRIES {
            if retry > 0 {
                std::thread::sleep(retry_delay);
                retry_delay *= 2;
            }

            let mut builder = self.client.post(self.endpoint()).json(&request);
            if !settings.credential.is_empty() {
                builder = builder.bearer_auth(&settings.credential);
            }

            match builder.send() {
                Ok(resp) if resp.status() == StatusCode::TOO_MANY_REQUESTS => {
                    tracing::warn!("Rate limited, retry {}/{}", retry + 1, MAX_RETRIES);
                    continue;
                }
                Ok(resp) if resp.status().is_success() => {
                    let body: ChatResponse = resp.json().map_err(|e| {
                        ReorgError::Upstream(format!("Failed to parse model response: {e}"))
                    })?;
                    return body
                        .choices
                        .into_iter()
                        .next()
                        .map(|choice| choice.message.content)
                        .ok_or_else(|| ReorgError::Upstream("Model returned no choices".to_string()));
                }
                Ok(resp) => {
                    let status = resp.status();
                    let text = resp.text().unwrap_or_default();
                    return Err(ReorgError::Upstream(format!("Model API error ({status}): {text}")));
                }
                Err(e) => {
                    if retry == MAX_RETRIES {
                        return Err(ReorgError::Upstream(format!(
                            "Model request failed after retries: {e}"
                        )));
                    }
                    tracing::warn!("Model request failed, retrying: {}", e);
                }
            }
        }

        Err(ReorgError::Upstream("Model API still rate limited after retries".to_string()))
    }
}

impl Summarizer for ChatClient {
    fn summarize(&self, path: &Path, settings: &ModelSettings) -> Result<String> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let excerpt = read_text_excerpt(path, self.max_excerpt_bytes)?;
        let content = match &excerpt {
            Some(text) => FileContent::Text(text),
            None => FileContent::Binary { size_bytes: std::fs::metadata(path).at(path)?.len() },
        };

        let messages = vec![
            ChatMessage::system(prompts::summary_system_prompt()),
            ChatMessage::user(prompts::summary_user_prompt(&file_name, &content, &settings.instruction)),
        ];
        tracing::debug!("summarizing {} with {}", path.display(), settings.model);
        Ok(self.complete(settings, messages)?.trim().to_string())
    }
}

impl Planner for ChatClient {
    fn plan(&self, summaries: &[FileSummary], settings: &PlanSettings) -> Result<Vec<PlanItem>> {
        let messages = vec![
            ChatMessage::system(prompts::plan_system_prompt()),
            ChatMessage::user(prompts::plan_user_prompt(summaries, settings)),
        ];
        tracing::debug!("planning layout for {} files with {}", summaries.len(), settings.model.model);
        let reply = self.complete(&settings.model, messages)?;
        parse_plan(&reply)
    }
}

//! Prompt construction for the chat collaborator.

use crate::domain::{FileSummary, PlanSettings};
use crate::utils::{format_size, TextExcerpt};

const SUMMARY_SYSTEM: &str = "You describe files so they can be filed sensibly. \
Reply with one or two plain sentences naming what the file is, who or what it concerns, \
and any dates it mentions. Do not use markdown.";

const PLAN_SYSTEM: &str = "You organize files into a clean folder structure. \
You receive a JSON array of files with their current relative path and a summary. \
Reply with JSON only, in the form {\"files\": [{\"file_path\": \"<current path>\", \
\"new_path\": \"<proposed path>\"}]}. Include every input file exactly once, keep each \
file's extension, and never give two files the same new_path.";

/// What the summarizer gets to see of a file.
pub enum FileContent<'a> {
    Text(&'a TextExcerpt),
    Binary { size_bytes: u64 },
}

pub fn summary_system_prompt() -> &'static str {
    SUMMARY_SYSTEM
}

pub fn summary_user_prompt(file_name: &str, content: &FileContent<'_>, instruction: &str) -> String {
    let mut prompt = format!("File name: {file_name}\n");
    match content {
        FileContent::Text(excerpt) => {
            if excerpt.truncated {
                prompt.push_str("Content (beginning only):\n");
            } else {
                prompt.push_str("Content:\n");
            }
            prompt.push_str(&excerpt.text);
            prompt.push('\n');
        }
        FileContent::Binary { size_bytes } => {
            prompt.push_str(&format!(
                "This is a binary file of {}; describe it from its name and type.\n",
                format_size(*size_bytes)
            ));
        }
    }
    append_instruction(&mut prompt, instruction);
    prompt
}

pub fn plan_system_prompt() -> &'static str {
    PLAN_SYSTEM
}

pub fn plan_user_prompt(summaries: &[FileSummary], settings: &PlanSettings) -> String {
    let files = serde_json::to_string_pretty(summaries).unwrap_or_else(|_| "[]".to_string());
    let mut prompt = format!(
        "Folders may be at most {} levels deep.\n\
         Name files using the template {} where {{Y}}, {{M}} and {{D}} are the year, month and day \
         the content refers to, {{CONTENT}} is a short snake_case description and {{EXT}} is the \
         original extension.\n\nFiles:\n{}\n",
        settings.max_depth, settings.template, files
    );
    append_instruction(&mut prompt, &settings.model.instruction);
    prompt
}

fn append_instruction(prompt: &mut String, instruction: &str) {
    let instruction = instruction.trim();
    if !instruction.is_empty() {
        prompt.push_str("\nAdditional instruction from the user: ");
        prompt.push_str(instruction);
        prompt.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelSettings, DEFAULT_NAMING_TEMPLATE};

    #[test]
    fn summary_prompt_includes_text_and_instruction() {
        let excerpt = TextExcerpt {
            text: "Invoice #42 for ACME".to_string(),
            encoding: "UTF-8".to_string(),
            truncated: true,
        };
        let prompt =
            summary_user_prompt("inv.txt", &FileContent::Text(&excerpt), "mention the amount");
        assert!(prompt.contains("File name: inv.txt"));
        assert!(prompt.contains("beginning only"));
        assert!(prompt.contains("Invoice #42 for ACME"));
        assert!(prompt.contains("mention the amount"));
    }

    #[test]
    fn binary_files_are_described_by_size() {
        let prompt = summary_user_prompt("pic.jpg", &FileContent::Binary { size_bytes: 1536 }, "  ");
        assert!(prompt.contains("1.5 KB"));
        assert!(!prompt.contains("Additional instruction"));
    }

    #[test]
    fn plan_prompt_lists_files_with_depth_and_template() {
        let settings = PlanSettings {
            model: ModelSettings::default(),
            max_depth: 2,
            template: DEFAULT_NAMING_TEMPLATE.to_string(),
        };
        let summaries = vec![FileSummary {
            relative_path: "a.txt".to_string(),
            summary: "notes".to_string(),
        }];
        let prompt = plan_user_prompt(&summaries, &settings);
        assert!(prompt.contains("at most 2 levels"));
        assert!(prompt.contains(DEFAULT_NAMING_TEMPLATE));
        assert!(prompt.contains("\"file_path\": \"a.txt\""));
    }
}

//! Classifier prompt templates
//!
//! Prompts are markdown files with YAML frontmatter, compiled into the
//! binary. The body has `# System` and `# User` sections and uses
//! mustache-style `{{var}}` placeholders plus `{{#if var}}...{{/if}}` blocks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded prompt files
mod defaults {
    pub const CLASSIFY_TRANSCRIPT: &str =
        include_str!("../../../prompts/classify_transcript.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Transcript → status, promised date, amount, reasoning
    ClassifyTranscript,
}

impl PromptId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClassifyTranscript => "classify_transcript",
        }
    }

    pub fn all() -> &'static [PromptId] {
        &[Self::ClassifyTranscript]
    }

    fn content(&self) -> &'static str {
        match self {
            Self::ClassifyTranscript => defaults::CLASSIFY_TRANSCRIPT,
        }
    }
}

impl std::str::FromStr for PromptId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PromptId::all()
            .iter()
            .find(|id| id.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown prompt: {}", s))
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMetadata {
    pub id: String,
    /// Bumped whenever the wording changes
    pub version: u32,
    #[serde(default)]
    pub description: String,
}

/// A parsed prompt
#[derive(Debug, Clone)]
pub struct Prompt {
    pub metadata: PromptMetadata,
    /// Body after the frontmatter (system + user sections)
    pub content: String,
}

impl Prompt {
    /// Load an embedded prompt
    pub fn load(id: PromptId) -> Result<Self> {
        let (metadata, content) = parse_prompt(id.content())?;
        if metadata.id != id.as_str() {
            return Err(Error::InvalidData(format!(
                "Prompt file for {} declares id {}",
                id.as_str(),
                metadata.id
            )));
        }
        Ok(Self { metadata, content })
    }

    pub fn system_section(&self) -> Option<&str> {
        extract_section(&self.content, "# System")
    }

    pub fn user_section(&self) -> Option<&str> {
        extract_section(&self.content, "# User")
    }

    /// Render the system and user sections as one instruction block
    pub fn render(&self, vars: &HashMap<&str, &str>) -> String {
        match (self.system_section(), self.user_section()) {
            (Some(system), Some(user)) => {
                substitute(&format!("{}\n\n{}", system, user), vars)
            }
            _ => substitute(&self.content, vars),
        }
    }
}

/// Resolve conditionals, then fill placeholders in one left-to-right pass
///
/// Substituted values are never rescanned, so a transcript containing `{{..}}`
/// reaches the model verbatim. Unknown placeholders are left as written.
fn substitute(template: &str, vars: &HashMap<&str, &str>) -> String {
    let template = remove_unmatched_conditionals(template, vars);
    let mut result = String::with_capacity(template.len());
    let mut rest = template.as_str();

    while let Some(open) = rest.find("{{") {
        result.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        match after.find("}}") {
            Some(close) => match vars.get(&after[..close]) {
                Some(value) => {
                    result.push_str(value);
                    rest = &after[close + 2..];
                }
                None => {
                    result.push_str("{{");
                    rest = after;
                }
            },
            None => {
                result.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);

    result
}

/// Parse a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    if !content.starts_with("---") {
        return Err(Error::InvalidData(
            "Prompt must start with YAML frontmatter (---)".into(),
        ));
    }

    let rest = &content[3..];
    let end = rest.find("---").ok_or_else(|| {
        Error::InvalidData("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = rest[..end].trim();
    let body = rest[end + 3..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)?;

    Ok((metadata, body.to_string()))
}

/// Extract a section from the prompt content
fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after_header = &content[start + header.len()..];
    let end = after_header.find("\n# ").unwrap_or(after_header.len());
    Some(after_header[..end].trim())
}

/// Keep `{{#if var}}` blocks whose variable is set and non-empty, drop the rest
fn remove_unmatched_conditionals(content: &str, vars: &HashMap<&str, &str>) -> String {
    let mut result = content.to_string();

    while let Some(if_start) = result.find("{{#if ") {
        let var_start = if_start + 6;
        let Some(var_end) = result[var_start..].find("}}") else {
            break;
        };
        let var_name = result[var_start..var_start + var_end].to_string();
        let block_start = var_start + var_end + 2;
        let Some(endif_pos) = result[block_start..].find("{{/if}}") else {
            break;
        };
        let block_content = result[block_start..block_start + endif_pos].to_string();
        let full_end = block_start + endif_pos + 7;

        let keep = vars.get(var_name.as_str()).is_some_and(|v| !v.is_empty());
        result = if keep {
            format!("{}{}{}", &result[..if_start], block_content, &result[full_end..])
        } else {
            format!("{}{}", &result[..if_start], &result[full_end..])
        };
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_classify_prompt() {
        let prompt = Prompt::load(PromptId::ClassifyTranscript).unwrap();
        assert_eq!(prompt.metadata.id, "classify_transcript");
        assert!(prompt.metadata.version >= 1);
        assert!(prompt.system_section().unwrap().contains("debt collection"));
        let user = prompt.user_section().unwrap();
        for status in crate::models::Status::all() {
            assert!(user.contains(status.as_str()), "missing rule for {}", status);
        }
    }

    #[test]
    fn test_render_substitutes_transcript() {
        let prompt = Prompt::load(PromptId::ClassifyTranscript).unwrap();
        let mut vars = HashMap::new();
        vars.insert("transcript", "cheque bounced again");
        let rendered = prompt.render(&vars);
        assert!(rendered.contains("Transcript: \"cheque bounced again\""));
        assert!(!rendered.contains("{{"));
        assert!(!rendered.contains("Today's date"));

        vars.insert("today", "2026-10-16");
        let rendered = prompt.render(&vars);
        assert!(rendered.contains("Today's date is 2026-10-16."));
    }

    #[test]
    fn test_render_keeps_template_syntax_in_transcript() {
        let prompt = Prompt::load(PromptId::ClassifyTranscript).unwrap();
        let transcript = "paid {{#if x}}50000 by cheque{{/if}} on {{today}}";
        let mut vars = HashMap::new();
        vars.insert("transcript", transcript);
        vars.insert("today", "2026-10-16");

        for _ in 0..5 {
            let rendered = prompt.render(&vars);
            assert!(
                rendered.contains(&format!("Transcript: \"{}\"", transcript)),
                "{}",
                rendered
            );
            assert!(rendered.contains("Today's date is 2026-10-16."));
        }
    }

    #[test]
    fn test_substitute_leaves_unknown_placeholders() {
        let mut vars = HashMap::new();
        vars.insert("name", "{{other}}");
        assert_eq!(
            substitute("Hi {{name}}, {{missing}} {{", &vars),
            "Hi {{other}}, {{missing}} {{"
        );
    }

    #[test]
    fn test_parse_prompt_requires_frontmatter() {
        assert!(parse_prompt("no frontmatter").is_err());
        assert!(parse_prompt("---\nid: x\nversion: 1\n").is_err());

        let (meta, body) = parse_prompt("---\nid: x\nversion: 2\n---\nHello {{name}}").unwrap();
        assert_eq!(meta.id, "x");
        assert_eq!(meta.version, 2);
        assert_eq!(body, "Hello {{name}}");
    }

    #[test]
    fn test_conditionals() {
        let mut vars = HashMap::new();
        vars.insert("a", "1");
        vars.insert("b", "");
        let out = remove_unmatched_conditionals("x{{#if a}}A{{/if}}y{{#if b}}B{{/if}}z", &vars);
        assert_eq!(out, "xAyz");
    }

    #[test]
    fn test_prompt_id_from_str() {
        assert_eq!(
            "classify_transcript".parse::<PromptId>(),
            Ok(PromptId::ClassifyTranscript)
        );
        assert!("explain".parse::<PromptId>().is_err());
    }
}

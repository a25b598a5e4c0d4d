//! Prompt inspection command

use std::collections::HashMap;

use anyhow::{Context, Result};
use recover_core::{today_local, Prompt, PromptId};

/// Print the classification prompt as it would be sent
pub fn cmd_prompt(transcript: Option<&str>) -> Result<()> {
    println!("{}", render_prompt(transcript)?);
    Ok(())
}

pub fn render_prompt(transcript: Option<&str>) -> Result<String> {
    let prompt =
        Prompt::load(PromptId::ClassifyTranscript).context("Failed to load classification prompt")?;
    let today = today_local().format("%Y-%m-%d").to_string();

    let mut vars = HashMap::new();
    vars.insert("transcript", transcript.unwrap_or("{{transcript}}"));
    vars.insert("today", today.as_str());

    Ok(format!(
        "# {} (v{})\n\n{}",
        prompt.metadata.id,
        prompt.metadata.version,
        prompt.render(&vars)
    ))
}

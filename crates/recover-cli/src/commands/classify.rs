//! Transcript classification command

use anyhow::{Context, Result};
use recover_core::{ClassificationResult, ClassifierClient};

/// Classify one transcript and print the suggestion
pub async fn cmd_classify(client: &ClassifierClient, transcript: &str, json: bool) -> Result<()> {
    let result = client.classify(transcript).await;

    if json {
        let out =
            serde_json::to_string_pretty(&result).context("Failed to serialize classification")?;
        println!("{}", out);
        return Ok(());
    }

    println!("🔍 Classifier: {}\n", client.backend_name());
    print!("{}", describe(&result));
    Ok(())
}

/// Human-readable summary of a classification
pub fn describe(result: &ClassificationResult) -> String {
    let date = result.extracted_date.as_deref().unwrap_or("-");
    let amount = result
        .extracted_amount
        .map(|a| a.to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "  Status:    {} ({})\n  Date:      {}\n  Amount:    {}\n  Reasoning: {}\n",
        result.suggested_status.label(),
        result.suggested_status,
        date,
        amount,
        result.reasoning
    )
}

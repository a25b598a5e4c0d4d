//! JSON parsing for classifier replies
//!
//! Models sometimes wrap the JSON payload in prose or code fences even when
//! asked for raw JSON, so the outermost `{...}` is extracted first.

use crate::error::{Error, Result};
use crate::models::ClassificationResult;

const MAX_RAW_IN_ERROR: usize = 200;

/// Parse a classification from the model's reply text
pub fn parse_classification(response: &str) -> Result<ClassificationResult> {
    let json_str = extract_json_object(response)?;
    serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid classification JSON: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })
}

fn extract_json_object(response: &str) -> Result<&str> {
    let response = response.trim();
    match (response.find('{'), response.rfind('}')) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(Error::InvalidData(format!(
            "No JSON found in classifier response | Raw: {}",
            truncate(response)
        ))),
    }
}

fn truncate(s: &str) -> String {
    if s.len() <= MAX_RAW_IN_ERROR {
        return s.to_string();
    }
    let mut end = MAX_RAW_IN_ERROR;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    #[test]
    fn test_parse_plain_json() {
        let result = parse_classification(
            r#"{"suggestedStatus":"DISHONORED","extractedDate":null,"extractedAmount":null,"reasoning":"Cheque bounced"}"#,
        )
        .unwrap();
        assert_eq!(result.suggested_status, Status::Dishonored);
        assert_eq!(result.extracted_date, None);
        assert_eq!(result.extracted_amount, None);
        assert_eq!(result.reasoning, "Cheque bounced");
    }

    #[test]
    fn test_parse_wrapped_in_fences() {
        let reply = "Sure! Here you go:\n```json\n{\"suggestedStatus\":\"PARTIAL_PAYMENT\",\"extractedDate\":\"2026-11-01\",\"extractedAmount\":\"25,000\",\"reasoning\":\"Paid half\"}\n```";
        let result = parse_classification(reply).unwrap();
        assert_eq!(result.suggested_status, Status::PartialPayment);
        assert_eq!(result.extracted_date.as_deref(), Some("2026-11-01"));
        assert_eq!(result.extracted_amount, Some(25000.0));
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(parse_classification("I could not decide").is_err());
        assert!(parse_classification("} backwards {").is_err());
        assert!(parse_classification(r#"{"suggestedStatus":"SETTLED","reasoning":"x"}"#).is_err());
        assert!(parse_classification(r#"{"reasoning":"no status"}"#).is_err());
    }

    #[test]
    fn test_parse_requires_reasoning() {
        let err = parse_classification(r#"{"suggestedStatus":"PENDING","extractedDate":null}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("reasoning"), "{}", err);
    }

    #[test]
    fn test_error_truncates_long_replies() {
        let long = "x".repeat(1000);
        let err = parse_classification(&long).unwrap_err().to_string();
        assert!(err.len() < 400);
        assert!(err.ends_with("..."));
    }
}

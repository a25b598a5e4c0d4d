//! Mock classifier backend
//!
//! Keyword heuristics over the transcript, good enough for development and
//! tests without network access or a credential.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::models::{ClassificationResult, Status};

use super::ClassifierBackend;

/// Mock classifier backend
#[derive(Clone, Default)]
pub struct MockBackend {
    /// When set, every call fails as if the transport broke
    pub failing: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self { failing: false }
    }

    /// A backend whose calls always error
    pub fn failing() -> Self {
        Self { failing: true }
    }
}

#[async_trait]
impl ClassifierBackend for MockBackend {
    async fn classify(&self, transcript: &str) -> Result<ClassificationResult> {
        if self.failing {
            return Err(Error::Classifier("mock transport failure".into()));
        }
        Ok(heuristic_classification(transcript))
    }

    async fn health_check(&self) -> bool {
        !self.failing
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }

    fn is_configured(&self) -> bool {
        true
    }
}

/// Classify a transcript by keyword
///
/// Checked most-specific first: settlement, bounced cheque, part payment,
/// evasive answers. Anything else is a plain promise to pay.
pub fn heuristic_classification(transcript: &str) -> ClassificationResult {
    let text = transcript.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| text.contains(w));

    let (status, reasoning) = if has(&["no dues", "fully paid", "settled", "cleared all"]) {
        (Status::NoDues, "Customer says the account is settled")
    } else if has(&["bounce", "dishonor", "dishonour", "insufficient funds", "returned unpaid"]) {
        (Status::Dishonored, "Cheque or payment was returned")
    } else if has(&["partial", "part payment", "half", "remaining", "balance later"]) {
        (Status::PartialPayment, "Customer paid part of the dues")
    } else if has(&["excuse", "not sure", "will try", "maybe", "call later", "don't remember"]) {
        (Status::FakeCommitment, "Vague promise without a firm plan")
    } else {
        (Status::Pending, "Customer promised to pay")
    };

    ClassificationResult {
        suggested_status: status,
        extracted_date: find_date(transcript),
        extracted_amount: find_amount(transcript),
        reasoning: reasoning.to_string(),
    }
}

fn find_date(text: &str) -> Option<String> {
    text.split(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | ';' | '(' | ')'))
        .find(|token| NaiveDate::parse_from_str(token, "%Y-%m-%d").is_ok())
        .map(str::to_string)
}

fn find_amount(text: &str) -> Option<f64> {
    text.split_whitespace()
        .filter(|token| !token.contains('-'))
        .filter_map(|token| {
            let digits: String = token
                .trim_start_matches(|c: char| !c.is_ascii_digit())
                .trim_end_matches(|c: char| !c.is_ascii_digit())
                .replace(',', "");
            digits.parse::<f64>().ok()
        })
        .find(|amount| *amount >= 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_statuses() {
        let cases = [
            ("I have cleared all my dues, no dues now", Status::NoDues),
            ("The cheque bounced due to insufficient funds", Status::Dishonored),
            ("Paid half, remaining next week", Status::PartialPayment),
            ("Maybe I will try next month, call later", Status::FakeCommitment),
            ("I will pay on 2026-11-05", Status::Pending),
        ];
        for (transcript, expected) in cases {
            assert_eq!(
                heuristic_classification(transcript).suggested_status,
                expected,
                "{}",
                transcript
            );
        }
    }

    #[test]
    fn test_heuristic_extracts_date_and_amount() {
        let result = heuristic_classification("Will send Rs.25,000 on 2026-11-05.");
        assert_eq!(result.extracted_date.as_deref(), Some("2026-11-05"));
        assert_eq!(result.extracted_amount, Some(25000.0));

        let result = heuristic_classification("call me tomorrow");
        assert_eq!(result.extracted_date, None);
        assert_eq!(result.extracted_amount, None);
    }

    #[tokio::test]
    async fn test_failing_backend_errors() {
        let backend = MockBackend::failing();
        assert!(backend.classify("anything").await.is_err());
        assert!(!backend.health_check().await);
    }
}

//! Pluggable transcript classifier
//!
//! # Architecture
//!
//! - `ClassifierBackend` trait: the interface every backend implements
//! - `ClassifierClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backends: `GeminiBackend` (remote), `FallbackBackend` (no credential), `MockBackend`
//!
//! The backend is picked once at construction. `ClassifierClient::classify`
//! never fails: backend errors are logged and degraded to a PENDING result.
//!
//! # Configuration
//!
//! Environment variables:
//! - `CLASSIFIER_BACKEND`: `gemini` (default) or `mock`
//! - `GEMINI_API_KEY` (or `API_KEY`): credential; without it the fallback is used
//! - `GEMINI_MODEL`: model name (default: gemini-2.5-flash)
//! - `GEMINI_HOST`: API base URL (default: https://generativelanguage.googleapis.com)

mod fallback;
mod gemini;
mod mock;
pub mod parsing;

pub use fallback::FallbackBackend;
pub use gemini::{GeminiBackend, DEFAULT_HOST, DEFAULT_MODEL};
pub use mock::{heuristic_classification, MockBackend};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::ClassificationResult;

/// Interface for all classifier backends
#[async_trait]
pub trait ClassifierBackend: Send + Sync {
    /// Classify one call transcript
    async fn classify(&self, transcript: &str) -> Result<ClassificationResult>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    fn model(&self) -> &str;

    fn host(&self) -> &str;

    /// False when requests are answered without consulting a model
    fn is_configured(&self) -> bool;
}

/// Concrete classifier client
#[derive(Clone)]
pub enum ClassifierClient {
    Gemini(GeminiBackend),
    Fallback(FallbackBackend),
    Mock(MockBackend),
}

/// Classifier configuration as reported to users
#[derive(Debug, Clone, Serialize)]
pub struct ClassifierInfo {
    pub backend: String,
    pub model: String,
    pub host: String,
    pub configured: bool,
}

impl ClassifierClient {
    /// Create a classifier client from environment variables
    ///
    /// Never fails: a missing credential selects the fallback backend.
    pub fn from_env() -> Self {
        let backend =
            std::env::var("CLASSIFIER_BACKEND").unwrap_or_else(|_| "gemini".to_string());

        match backend.to_lowercase().as_str() {
            "mock" => Self::mock(),
            "gemini" => Self::gemini_from_env(),
            _ => {
                warn!(backend = %backend, "Unknown CLASSIFIER_BACKEND, using gemini");
                Self::gemini_from_env()
            }
        }
    }

    fn gemini_from_env() -> Self {
        match GeminiBackend::from_env() {
            Some(backend) => Self::Gemini(backend),
            None => {
                info!("No Gemini API key configured, classification will return PENDING");
                Self::fallback()
            }
        }
    }

    pub fn gemini(host: &str, model: &str, api_key: &str) -> Self {
        Self::Gemini(GeminiBackend::new(host, model, api_key))
    }

    pub fn fallback() -> Self {
        Self::Fallback(FallbackBackend)
    }

    pub fn mock() -> Self {
        Self::Mock(MockBackend::new())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Gemini(_) => "gemini",
            Self::Fallback(_) => "fallback",
            Self::Mock(_) => "mock",
        }
    }

    pub fn info(&self) -> ClassifierInfo {
        ClassifierInfo {
            backend: self.backend_name().to_string(),
            model: self.model().to_string(),
            host: self.host().to_string(),
            configured: self.is_configured(),
        }
    }

    /// Classify a transcript, degrading every failure to a PENDING result
    pub async fn classify(&self, transcript: &str) -> ClassificationResult {
        if transcript.trim().is_empty() {
            return ClassificationResult::empty_transcript();
        }

        match ClassifierBackend::classify(self, transcript).await {
            Ok(result) => {
                let result = result.sanitized();
                info!(
                    backend = self.backend_name(),
                    status = %result.suggested_status,
                    "Classified transcript"
                );
                result
            }
            Err(e) => {
                warn!(backend = self.backend_name(), error = %e, "Transcript classification failed");
                ClassificationResult::analysis_failed()
            }
        }
    }
}

// Implement ClassifierBackend for ClassifierClient by delegating to the inner backend
#[async_trait]
impl ClassifierBackend for ClassifierClient {
    async fn classify(&self, transcript: &str) -> Result<ClassificationResult> {
        match self {
            Self::Gemini(b) => b.classify(transcript).await,
            Self::Fallback(b) => b.classify(transcript).await,
            Self::Mock(b) => b.classify(transcript).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            Self::Gemini(b) => b.health_check().await,
            Self::Fallback(b) => b.health_check().await,
            Self::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            Self::Gemini(b) => b.model(),
            Self::Fallback(b) => b.model(),
            Self::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            Self::Gemini(b) => b.host(),
            Self::Fallback(b) => b.host(),
            Self::Mock(b) => b.host(),
        }
    }

    fn is_configured(&self) -> bool {
        match self {
            Self::Gemini(b) => b.is_configured(),
            Self::Fallback(b) => b.is_configured(),
            Self::Mock(b) => b.is_configured(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Status, REASON_ANALYSIS_FAILED, REASON_EMPTY_TRANSCRIPT, REASON_NOT_CONFIGURED};
    use crate::test_utils::{MockGeminiMode, MockGeminiServer};

    #[test]
    fn test_client_info() {
        let client = ClassifierClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");

        let info = ClassifierClient::fallback().info();
        assert_eq!(info.backend, "fallback");
        assert!(!info.configured);
    }

    #[tokio::test]
    async fn test_fallback_returns_not_configured() {
        let client = ClassifierClient::fallback();
        let result = client.classify("I will pay tomorrow").await;
        assert_eq!(result.suggested_status, Status::Pending);
        assert_eq!(result.extracted_date, None);
        assert_eq!(result.extracted_amount, None);
        assert_eq!(result.reasoning, REASON_NOT_CONFIGURED);
    }

    #[tokio::test]
    async fn test_empty_transcript_short_circuits() {
        let client = ClassifierClient::Mock(MockBackend::failing());
        let result = client.classify("   \n").await;
        assert_eq!(result.reasoning, REASON_EMPTY_TRANSCRIPT);
        assert_eq!(result.suggested_status, Status::Pending);
    }

    #[tokio::test]
    async fn test_backend_failure_degrades() {
        let client = ClassifierClient::Mock(MockBackend::failing());
        let result = client.classify("cheque bounced").await;
        assert_eq!(result.suggested_status, Status::Pending);
        assert_eq!(result.reasoning, REASON_ANALYSIS_FAILED);
    }

    #[tokio::test]
    async fn test_gemini_failures_degrade() {
        let server = MockGeminiServer::start_with_mode(MockGeminiMode::Malformed).await;
        let client = ClassifierClient::gemini(&server.url(), DEFAULT_MODEL, "test-key");
        let result = client.classify("cheque bounced").await;
        assert_eq!(result.reasoning, REASON_ANALYSIS_FAILED);
        assert_eq!(result.extracted_date, None);
    }

    #[tokio::test]
    async fn test_gemini_success_is_sanitized() {
        let server = MockGeminiServer::start_with_mode(MockGeminiMode::Fixed(
            r#"{"suggestedStatus":"PARTIAL_PAYMENT","extractedDate":"next friday","extractedAmount":-20,"reasoning":"  paid half  "}"#
                .to_string(),
        ))
        .await;
        let client = ClassifierClient::gemini(&server.url(), DEFAULT_MODEL, "test-key");
        let result = client.classify("paid half").await;
        assert_eq!(result.suggested_status, Status::PartialPayment);
        assert_eq!(result.extracted_date, None);
        assert_eq!(result.extracted_amount, None);
        assert_eq!(result.reasoning, "paid half");
    }

    #[tokio::test]
    async fn test_gemini_reply_without_reasoning_degrades() {
        let server = MockGeminiServer::start_with_mode(MockGeminiMode::Fixed(
            r#"{"suggestedStatus":"NO_DUES","extractedDate":null,"extractedAmount":null}"#
                .to_string(),
        ))
        .await;
        let client = ClassifierClient::gemini(&server.url(), DEFAULT_MODEL, "test-key");
        let result = client.classify("all settled").await;
        assert_eq!(result.suggested_status, Status::Pending);
        assert_eq!(result.reasoning, REASON_ANALYSIS_FAILED);
    }
}

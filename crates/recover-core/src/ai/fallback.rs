//! Deterministic backend used when no credential is configured

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ClassificationResult;

use super::ClassifierBackend;

/// Answers every request with the "not configured" result, without I/O
#[derive(Clone, Default)]
pub struct FallbackBackend;

#[async_trait]
impl ClassifierBackend for FallbackBackend {
    async fn classify(&self, _transcript: &str) -> Result<ClassificationResult> {
        Ok(ClassificationResult::not_configured())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn model(&self) -> &str {
        "none"
    }

    fn host(&self) -> &str {
        "none"
    }

    fn is_configured(&self) -> bool {
        false
    }
}

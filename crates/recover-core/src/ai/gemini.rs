//! Gemini backend
//!
//! Calls the `generateContent` REST endpoint with a JSON response schema so
//! the model replies with exactly one classification object.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::aggregation::today_local;
use crate::error::{Error, Result};
use crate::models::{ClassificationResult, Status};
use crate::prompts::{Prompt, PromptId};

use super::parsing::parse_classification;
use super::ClassifierBackend;

pub const DEFAULT_HOST: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const TEMPERATURE: f32 = 0.2;

/// Remote classifier backed by the Gemini API
#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create from environment variables
    ///
    /// Returns None when no non-empty `GEMINI_API_KEY` (or `API_KEY`) is set.
    pub fn from_env() -> Option<Self> {
        let api_key = ["GEMINI_API_KEY", "API_KEY"]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty())?;
        let host = std::env::var("GEMINI_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Some(Self::new(&host, &model, &api_key))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_request(&self, transcript: &str) -> Result<GenerateRequest> {
        let prompt = Prompt::load(PromptId::ClassifyTranscript)?;
        let today = today_local().format("%Y-%m-%d").to_string();
        let mut vars = HashMap::new();
        vars.insert("transcript", transcript);
        vars.insert("today", today.as_str());

        Ok(GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.render(&vars),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        })
    }
}

/// Schema the model's JSON reply must follow
fn response_schema() -> serde_json::Value {
    let statuses: Vec<&str> = Status::all().iter().map(|s| s.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "suggestedStatus": { "type": "STRING", "enum": statuses },
            "extractedDate": { "type": "STRING", "nullable": true },
            "extractedAmount": { "type": "NUMBER", "nullable": true },
            "reasoning": { "type": "STRING" }
        },
        "required": ["suggestedStatus", "reasoning"]
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Text of the first candidate's parts
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[async_trait]
impl ClassifierBackend for GeminiBackend {
    async fn classify(&self, transcript: &str) -> Result<ClassificationResult> {
        let request = self.build_request(transcript)?;

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: GenerateResponse = response.json().await?;
        let text = body
            .text()
            .ok_or_else(|| Error::Classifier("Gemini returned no candidate text".into()))?;
        debug!("Gemini response: {}", text);

        parse_classification(&text)
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/v1beta/models/{}", self.base_url, self.model);
        match self
            .http_client
            .get(url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
        {
            Ok(r) => r.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }

    fn is_configured(&self) -> bool {
        true
    }
}

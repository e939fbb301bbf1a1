//! Gemini API client
//!
//! Submits a transcript to the `generateContent` endpoint and returns the
//! generated text. Uses a long-lived reqwest::Client for connection pooling.

use crate::error::AssistantError;
use crate::memory::Turn;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Anything that can turn a transcript into generated text
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// `transcript` is ordered oldest first and ends with a user turn.
    async fn generate(&self, transcript: &[Turn]) -> crate::Result<String>;
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: i32,
    pub max_output_tokens: i32,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.4,
            top_p: 0.9,
            top_k: 40,
            max_output_tokens: 2048,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()
            .map_err(|e| {
                AssistantError::ConfigError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        )
    }

    fn build_request(&self, transcript: &[Turn]) -> GeminiRequest {
        GeminiRequest {
            contents: transcript
                .iter()
                .map(|turn| Content {
                    role: Some(turn.role.as_str().to_string()),
                    parts: vec![Part {
                        text: Some(turn.text.clone()),
                    }],
                })
                .collect(),
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                top_k: self.config.top_k,
                max_output_tokens: self.config.max_output_tokens,
            },
        }
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn generate(&self, transcript: &[Turn]) -> crate::Result<String> {
        if self.config.api_key.is_empty() {
            return Err(AssistantError::GenerationError(
                "API key not configured".to_string(),
            ));
        }

        let request = self.build_request(transcript);

        info!(
            model = %self.config.model,
            turns = transcript.len(),
            "Calling Gemini API"
        );

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                // reqwest includes the URL (and so the key) in its message
                let e = e.without_url();
                error!("Gemini API request failed: {}", e);
                AssistantError::GenerationError(format!("Gemini API request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error response ({}): {}", status, error_text);
            return Err(AssistantError::GenerationError(format!(
                "Gemini API returned {}: {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            AssistantError::GenerationError(format!("Gemini parse error: {}", e.without_url()))
        })?;

        extract_text(gemini_response)
    }
}

/// Concatenate the text parts of the first candidate, unmodified.
fn extract_text(response: GeminiResponse) -> crate::Result<String> {
    let candidate = response.candidates.into_iter().next().ok_or_else(|| {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "none".to_string());
        AssistantError::GenerationError(format!(
            "No candidates in Gemini response (block reason: {})",
            reason
        ))
    })?;

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason != "STOP" {
            warn!("Gemini finished with reason {}", reason);
        }
    }

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.is_empty() {
        return Err(AssistantError::GenerationError(
            "Empty response from Gemini".to_string(),
        ));
    }

    if let Some(usage) = response.usage_metadata {
        info!(
            prompt_tokens = usage.prompt_token_count,
            response_tokens = usage.candidates_token_count,
            "Gemini response received"
        );
    }

    Ok(text)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: i32,
    #[serde(default)]
    candidates_token_count: i32,
}

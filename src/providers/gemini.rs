//! Gemini provider implementation for SchemaBridge
//!
//! Calls the Generative Language REST API (`models/*:generateContent`) with a
//! single user turn and concatenates the text parts of the first candidate.

use crate::config::GeminiConfig;
use crate::error::{Result, SchemaBridgeError};
use crate::providers::{CompletionResponse, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini API provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` when no API key is configured, or a
    /// provider error if the HTTP client cannot be built
    ///
    /// # Examples
    ///
    /// ```
    /// use schemabridge::config::GeminiConfig;
    /// use schemabridge::providers::GeminiProvider;
    ///
    /// let config = GeminiConfig {
    ///     api_key: Some("test-key".to_string()),
    ///     ..GeminiConfig::default()
    /// };
    /// assert!(GeminiProvider::new(config).is_ok());
    /// assert!(GeminiProvider::new(GeminiConfig::default()).is_err());
    /// ```
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SchemaBridgeError::MissingCredentials("gemini".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent(concat!("schemabridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                SchemaBridgeError::Provider(format!("Failed to create HTTP client: {}", e))
            })?;

        tracing::info!("Initialized Gemini provider: model={}", config.model);

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Endpoint for the configured model
    ///
    /// Model identifiers may be given with or without the `models/` prefix.
    fn endpoint(&self) -> String {
        let model = &self.config.model;
        let resource = if model.starts_with("models/") {
            model.clone()
        } else {
            format!("models/{}", model)
        };
        format!(
            "{}/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            resource
        )
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };

        tracing::debug!(
            "Sending Gemini request: model={}, prompt_len={}",
            self.config.model,
            prompt.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                SchemaBridgeError::Provider(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(SchemaBridgeError::Provider(format!(
                "Gemini returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            SchemaBridgeError::Provider(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .ok_or_else(|| {
                SchemaBridgeError::Provider("Gemini response contained no candidates".to_string())
            })?;

        Ok(match body.usage_metadata {
            Some(usage) => CompletionResponse::with_usage(
                text,
                TokenUsage::new(usage.prompt_token_count, usage.candidates_token_count),
            ),
            None => CompletionResponse::new(text),
        })
    }

    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> String {
        self.config.model.clone()
    }
}

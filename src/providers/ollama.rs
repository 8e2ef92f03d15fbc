//! Ollama provider implementation for SchemaBridge
//!
//! Sends single-prompt chat requests to a local or remote Ollama server.

use crate::config::OllamaConfig;
use crate::error::{Result, SchemaBridgeError};
use crate::providers::{CompletionResponse, Message, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama API provider
///
/// # Examples
///
/// ```no_run
/// use schemabridge::config::OllamaConfig;
/// use schemabridge::providers::{OllamaProvider, Provider};
///
/// # async fn example() -> schemabridge::error::Result<()> {
/// let provider = OllamaProvider::new(OllamaConfig::default())?;
/// let completion = provider.complete("Hello!").await?;
/// println!("{}", completion.text);
/// # Ok(())
/// # }
/// ```
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

/// Request structure for Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Message structure returned by the Ollama API
#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

/// Response structure from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

impl OllamaProvider {
    /// Create a new Ollama provider instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use schemabridge::config::OllamaConfig;
    /// use schemabridge::providers::OllamaProvider;
    ///
    /// let provider = OllamaProvider::new(OllamaConfig::default());
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent(concat!("schemabridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                SchemaBridgeError::Provider(format!("Failed to create HTTP client: {}", e))
            })?;

        tracing::info!(
            "Initialized Ollama provider: host={}, model={}",
            config.host,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Get the configured Ollama host
    pub fn host(&self) -> &str {
        &self.config.host
    }

    fn build_request(&self, prompt: &str) -> OllamaRequest {
        OllamaRequest {
            model: self.config.model.clone(),
            messages: vec![Message::user(prompt)],
            stream: false,
            options: OllamaOptions { temperature: 0.0 },
        }
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse> {
        let url = format!("{}/api/chat", self.config.host.trim_end_matches('/'));
        let request = self.build_request(prompt);

        tracing::debug!(
            "Sending Ollama request: model={}, prompt_len={}",
            request.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {}", e);
                SchemaBridgeError::Provider(format!("Ollama request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(SchemaBridgeError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let ollama_response: OllamaResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            SchemaBridgeError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        tracing::debug!(
            "Ollama response: done={}, prompt_tokens={}, completion_tokens={}",
            ollama_response.done,
            ollama_response.prompt_eval_count,
            ollama_response.eval_count
        );

        let text = ollama_response.message.content;
        let completion = if ollama_response.prompt_eval_count > 0 || ollama_response.eval_count > 0
        {
            CompletionResponse::with_usage(
                text,
                TokenUsage::new(ollama_response.prompt_eval_count, ollama_response.eval_count),
            )
        } else {
            CompletionResponse::new(text)
        };

        Ok(completion)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> String {
        self.config.model.clone()
    }
}

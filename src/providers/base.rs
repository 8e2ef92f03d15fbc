//! Base provider trait and common types for SchemaBridge
//!
//! This module defines the Provider trait that every external model backend
//! implements, along with the message, response and usage types shared by
//! the backends.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Message structure for a model request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (user, assistant, system)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use schemabridge::providers::Message;
    ///
    /// let msg = Message::user("Hello, assistant!");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Token usage information from a completion
///
/// Tracks the number of tokens used in prompts and completions,
/// as reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use schemabridge::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Text returned by a provider for one prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    /// Completion text
    pub text: String,
    /// Token usage, when the provider reports it
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }

    pub fn with_usage(text: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            text: text.into(),
            usage: Some(usage),
        }
    }
}

/// External model capability
///
/// A provider turns one text prompt into one text completion. It may fail
/// (network, HTTP status, unparseable envelope) but it never retries.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Completes a single prompt
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails or the response envelope is invalid
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse>;

    /// Short backend name ("ollama", "gemini")
    fn name(&self) -> &'static str;

    /// Model identifier this provider sends requests to
    fn model(&self) -> String;
}

/// Creates providers bound to a model identifier
///
/// The conversion path resolves the active model from the registry on every
/// call and asks the factory for a provider bound to that identifier.
pub trait ProviderFactory: Send + Sync {
    /// Create a provider, optionally overriding the configured model
    fn create(&self, model_override: Option<&str>) -> Result<Arc<dyn Provider>>;
}

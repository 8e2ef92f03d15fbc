//! Test utilities for SchemaBridge
//!
//! Temporary directory helpers, deterministic providers and a provider
//! factory that records which models were requested.

use crate::error::{Result, SchemaBridgeError};
use crate::providers::{CompletionResponse, Provider, ProviderFactory};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Provider that replays canned replies in order and records every prompt
///
/// Once the script is exhausted every call fails with a provider error.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => Ok(CompletionResponse::new(reply)),
            None => Err(SchemaBridgeError::Provider("script exhausted".to_string()).into()),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> String {
        "scripted-model".to_string()
    }
}

/// Provider that answers a conversion prompt with its own masked source
///
/// This makes the model step the identity function.
pub struct EchoSourceProvider;

#[async_trait]
impl Provider for EchoSourceProvider {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse> {
        let start = prompt
            .find("```json\n")
            .map(|i| i + "```json\n".len())
            .ok_or_else(|| SchemaBridgeError::Provider("no source block".to_string()))?;
        let end = prompt[start..]
            .find("\n```")
            .map(|i| start + i)
            .ok_or_else(|| SchemaBridgeError::Provider("unterminated block".to_string()))?;
        Ok(CompletionResponse::new(&prompt[start..end]))
    }

    fn name(&self) -> &'static str {
        "echo"
    }

    fn model(&self) -> String {
        "echo".to_string()
    }
}

/// Factory that always hands out the same provider
pub struct ScriptedFactory {
    provider: Arc<dyn Provider>,
    requested: Mutex<Vec<Option<String>>>,
}

impl ScriptedFactory {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Model overrides passed to `create`, in call order
    pub fn requested_models(&self) -> Vec<Option<String>> {
        self.requested.lock().unwrap().clone()
    }
}

impl ProviderFactory for ScriptedFactory {
    fn create(&self, model_override: Option<&str>) -> Result<Arc<dyn Provider>> {
        self.requested
            .lock()
            .unwrap()
            .push(model_override.map(str::to_string));
        Ok(Arc::clone(&self.provider))
    }
}

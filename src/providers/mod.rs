//! Provider module for SchemaBridge
//!
//! This module contains the external model abstraction and implementations
//! for Ollama and Gemini.

pub mod base;
pub mod gemini;
pub mod ollama;

pub use base::{CompletionResponse, Message, Provider, ProviderFactory, TokenUsage};
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

use crate::config::ProviderConfig;
use crate::error::{Result, SchemaBridgeError};
use std::sync::Arc;

/// Create a provider instance based on configuration
///
/// # Errors
///
/// Returns error if provider type is invalid or initialization fails
pub fn create_provider(provider_type: &str, config: &ProviderConfig) -> Result<Box<dyn Provider>> {
    let mut config = config.clone();
    config.provider_type = provider_type.to_string();
    create_provider_with_override(&config, None, None)
}

/// Create a provider instance with optional provider and model overrides
///
/// The conversion path uses the model override to bind a provider to the
/// model currently marked active in the registry.
///
/// # Examples
///
/// ```no_run
/// use schemabridge::providers::create_provider_with_override;
/// use schemabridge::config::ProviderConfig;
///
/// # fn example() -> schemabridge::error::Result<()> {
/// let config = ProviderConfig::default();
///
/// let ollama = create_provider_with_override(&config, Some("ollama"), Some("qwen2.5:7b"))?;
/// assert_eq!(ollama.model(), "qwen2.5:7b");
/// # Ok(())
/// # }
/// ```
pub fn create_provider_with_override(
    config: &ProviderConfig,
    provider_override: Option<&str>,
    model_override: Option<&str>,
) -> Result<Box<dyn Provider>> {
    let provider_type = provider_override.unwrap_or(&config.provider_type);

    match provider_type {
        "ollama" => {
            let mut ollama_config = config.ollama.clone();
            if let Some(model) = model_override {
                ollama_config.model = model.to_string();
            }
            Ok(Box::new(OllamaProvider::new(ollama_config)?))
        }
        "gemini" => {
            let mut gemini_config = config.gemini.clone();
            if let Some(model) = model_override {
                gemini_config.model = model.to_string();
            }
            Ok(Box::new(GeminiProvider::new(gemini_config)?))
        }
        _ => Err(SchemaBridgeError::Provider(format!(
            "Unknown provider type: {}",
            provider_type
        ))
        .into()),
    }
}

/// [`ProviderFactory`] backed by the loaded provider configuration
#[derive(Debug, Clone)]
pub struct ConfiguredProviderFactory {
    config: ProviderConfig,
}

impl ConfiguredProviderFactory {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }
}

impl ProviderFactory for ConfiguredProviderFactory {
    fn create(&self, model_override: Option<&str>) -> Result<Arc<dyn Provider>> {
        let provider = create_provider_with_override(&self.config, None, model_override)?;
        Ok(Arc::from(provider))
    }
}

//! Masked document conversion through the active model
//!
//! A conversion resolves the active model from the registry, masks the
//! source document, asks the model to reshape it after the sink sample,
//! parses the reply as JSON and restores the masked literals.

use crate::error::{Result, SchemaBridgeError};
use crate::masking::{unmask_value, MaskingCodec};
use crate::prompts::generate_conversion_prompt;
use crate::providers::ProviderFactory;
use crate::storage::ModelRegistry;
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, OnceLock};

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*(.*?)\s*(?:```)?$").expect("fence pattern is valid")
    })
}

/// Remove surrounding Markdown code-fence markup from a model reply
///
/// # Examples
///
/// ```
/// use schemabridge::conversion::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
/// ```
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    match fence_regex().captures(trimmed).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => trimmed,
    }
}

/// Parse a model reply as JSON after stripping code fences
///
/// # Errors
///
/// Returns `MalformedModelOutput` if the cleaned reply is not valid JSON
pub fn parse_model_json(reply: &str) -> Result<Value> {
    let cleaned = strip_code_fences(reply);
    serde_json::from_str(cleaned).map_err(|e| {
        tracing::error!("Model did not return valid JSON: {}; reply: {}", e, reply);
        SchemaBridgeError::MalformedModelOutput(e.to_string()).into()
    })
}

/// Converts source documents into the shape of a sink sample
pub struct ConversionService {
    registry: Arc<dyn ModelRegistry>,
    providers: Arc<dyn ProviderFactory>,
    codec: MaskingCodec,
}

impl ConversionService {
    pub fn new(
        registry: Arc<dyn ModelRegistry>,
        providers: Arc<dyn ProviderFactory>,
        codec: MaskingCodec,
    ) -> Self {
        Self {
            registry,
            providers,
            codec,
        }
    }

    /// Convert `source` into the structure of `sink_sample`
    ///
    /// The source is masked before it leaves the process; the sink sample is
    /// sent as given.
    ///
    /// # Errors
    ///
    /// - `NoActiveModel` if the registry has no active record
    /// - provider errors from the model call
    /// - `MalformedModelOutput` if the reply is not JSON
    pub async fn convert(&self, source: &Value, sink_sample: &Value) -> Result<Value> {
        let model = self.registry.active_model()?.ok_or_else(|| {
            tracing::error!("No active model found in the registry");
            SchemaBridgeError::NoActiveModel
        })?;

        let (masked_source, masking_map) = self.codec.mask_value(source);
        tracing::info!(
            "Converting with model {} ({} masked literals, policy {})",
            model,
            masking_map.len(),
            self.codec.policy()
        );

        let prompt = generate_conversion_prompt(&masked_source, sink_sample);
        tracing::debug!("Sending conversion prompt: {}", prompt);

        let provider = self.providers.create(Some(&model))?;
        let completion = provider.complete(&prompt).await?;
        tracing::debug!("Received conversion reply: {}", completion.text);

        let masked_output = parse_model_json(&completion.text)?;
        Ok(unmask_value(&masked_output, &masking_map))
    }
}

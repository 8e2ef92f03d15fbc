//! Configuration management for SchemaBridge
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, SchemaBridgeError};
use crate::masking::MaskingPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for SchemaBridge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (Ollama, Gemini)
    #[serde(default)]
    pub provider: ProviderConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Model registry settings
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Conversation flow settings
    #[serde(default)]
    pub session: SessionConfig,
    /// Masking settings for conversion requests
    #[serde(default)]
    pub masking: MaskingConfig,
}

/// Provider configuration
///
/// Specifies which model backend to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
}

fn default_provider_type() -> String {
    "gemini".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            ollama: OllamaConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model used for draft generation when no override is given
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API key; usually supplied through `GEMINI_API_KEY`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// API base URL (useful for tests and proxies)
    #[serde(default = "default_gemini_api_base")]
    pub api_base: String,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,
}

fn default_gemini_model() -> String {
    "models/gemini-flash-latest".to_string()
}

fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_key: None,
            api_base: default_gemini_api_base(),
            temperature: 0.0,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Model registry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Path to the SQLite database; the user data directory when unset
    #[serde(default)]
    pub db_path: Option<String>,
}

/// Conversation flow configuration
///
/// Keyword tables used to classify chat messages, and whether approval runs
/// the conversion of the uploaded documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Substrings that signal the user wants a source-to-sink conversion
    #[serde(default = "default_intent_keywords")]
    pub intent_keywords: Vec<String>,

    /// Whole messages that approve the current draft
    #[serde(default = "default_approval_phrases")]
    pub approval_phrases: Vec<String>,

    /// Run the conversion when a draft is approved
    #[serde(default = "default_execute_on_approval")]
    pub execute_on_approval: bool,
}

fn default_intent_keywords() -> Vec<String> {
    ["convert", "transform", "map", "source", "sink"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_approval_phrases() -> Vec<String> {
    ["ok", "okay", "proceed", "submit", "looks good"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_execute_on_approval() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            intent_keywords: default_intent_keywords(),
            approval_phrases: default_approval_phrases(),
            execute_on_approval: default_execute_on_approval(),
        }
    }
}

/// Masking configuration
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MaskingConfig {
    /// Traversal policy for string leaves
    #[serde(default)]
    pub policy: MaskingPolicy,
}

impl Config {
    /// Load configuration from file, environment, and CLI
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged. Environment variables override file values, CLI flags
    /// override both.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SchemaBridgeError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| SchemaBridgeError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("SCHEMABRIDGE_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(ollama_host) = std::env::var("SCHEMABRIDGE_OLLAMA_HOST") {
            self.provider.ollama.host = ollama_host;
        }

        if let Ok(ollama_model) = std::env::var("SCHEMABRIDGE_OLLAMA_MODEL") {
            self.provider.ollama.model = ollama_model;
        }

        if let Ok(gemini_model) = std::env::var("SCHEMABRIDGE_GEMINI_MODEL") {
            self.provider.gemini.model = gemini_model;
        }

        if let Ok(api_key) = std::env::var("SCHEMABRIDGE_GEMINI_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
        {
            self.provider.gemini.api_key = Some(api_key);
        }

        if let Ok(bind) = std::env::var("SCHEMABRIDGE_BIND") {
            self.server.bind = bind;
        }

        if let Ok(db_path) = std::env::var("SCHEMABRIDGE_REGISTRY_DB") {
            self.registry.db_path = Some(db_path);
        }

        if let Ok(policy) = std::env::var("SCHEMABRIDGE_MASKING_POLICY") {
            match MaskingPolicy::parse_str(&policy) {
                Ok(value) => self.masking.policy = value,
                Err(_) => tracing::warn!("Invalid SCHEMABRIDGE_MASKING_POLICY: {}", policy),
            }
        }

        if let Ok(execute) = std::env::var("SCHEMABRIDGE_EXECUTE_ON_APPROVAL") {
            if let Ok(value) = execute.parse() {
                self.session.execute_on_approval = value;
            } else {
                tracing::warn!("Invalid SCHEMABRIDGE_EXECUTE_ON_APPROVAL: {}", execute);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(provider) = &cli.provider {
            self.provider.provider_type = provider.clone();
        }
        if let Some(db_path) = &cli.registry_db {
            self.registry.db_path = Some(db_path.clone());
        }
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let valid_providers = ["ollama", "gemini"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(SchemaBridgeError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(SchemaBridgeError::Config(format!(
                "server.bind is not a socket address: {}",
                self.server.bind
            ))
            .into());
        }

        if !(0.0..=2.0).contains(&self.provider.gemini.temperature) {
            return Err(SchemaBridgeError::Config(
                "provider.gemini.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        let blank = |list: &[String]| list.iter().any(|s| s.trim().is_empty());
        if self.session.intent_keywords.is_empty() || blank(&self.session.intent_keywords) {
            return Err(SchemaBridgeError::Config(
                "session.intent_keywords must contain non-empty keywords".to_string(),
            )
            .into());
        }

        if self.session.approval_phrases.is_empty() || blank(&self.session.approval_phrases) {
            return Err(SchemaBridgeError::Config(
                "session.approval_phrases must contain non-empty phrases".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

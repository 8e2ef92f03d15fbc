//! SchemaBridge - JSON source to sink mapping assistant library
//!
//! This library drafts a field mapping between a source JSON document and a
//! sink JSON sample through conversation, and converts source documents with
//! an external model without sending their literal string values.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `schema`: Shallow schema extraction from one record
//! - `masking`: Reversible placeholder masking of string leaves
//! - `session`: Draft session state, message classification and session store
//! - `assistant`: The draft session state machine
//! - `conversion`: Masked conversion through the active model
//! - `providers`: External model abstraction and implementations (Gemini, Ollama)
//! - `storage`: SQLite model registry
//! - `server`: HTTP API
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` and `commands`: Command-line interface and handlers
//!
//! # Example
//!
//! ```no_run
//! use schemabridge::{commands, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let assistant = commands::build_assistant(&config)?;
//!     let mut session = schemabridge::Session::new();
//!     let reply = assistant.chat(&mut session, "convert my users file").await?;
//!     println!("{}", reply.reply);
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod cli;
pub mod commands;
pub mod config;
pub mod conversion;
pub mod error;
pub mod masking;
pub mod prompts;
pub mod providers;
pub mod schema;
pub mod server;
pub mod session;
pub mod storage;
pub mod upload;

// Re-export commonly used types
pub use assistant::{Assistant, ChatReply, UploadReply};
pub use config::Config;
pub use conversion::ConversionService;
pub use error::{Result, SchemaBridgeError};
pub use masking::{mask, unmask, MaskingCodec, MaskingMap, MaskingPolicy};
pub use schema::{extract_schema, FieldDescriptor, SchemaDescriptor};
pub use session::{Session, Status};
pub use upload::UploadedDocument;

#[cfg(test)]
pub mod test_utils;

/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `serve`   - Run the HTTP API
- `chat`    - Interactive drafting session in the terminal
- `convert` - One-shot masked conversion of a document pair
- `models`  - Model registry management

The handlers wire configuration into the library components and leave the
actual work to [`Assistant`] and [`ConversionService`].
*/

pub mod models;
pub mod special_commands;

use crate::assistant::Assistant;
use crate::config::Config;
use crate::conversion::ConversionService;
use crate::error::Result;
use crate::masking::MaskingCodec;
use crate::providers::{create_provider, ConfiguredProviderFactory, Provider};
use crate::session::{KeywordTable, MessageClassifier};
use crate::storage::SqliteModelRegistry;
use std::sync::Arc;

/// Build the conversion service from configuration
///
/// # Errors
///
/// Returns error if the model registry cannot be opened
pub fn build_conversion_service(config: &Config) -> Result<ConversionService> {
    let registry = SqliteModelRegistry::open(config.registry.db_path.as_deref())?;
    tracing::debug!("Model registry: {}", registry.db_path().display());

    Ok(ConversionService::new(
        Arc::new(registry),
        Arc::new(ConfiguredProviderFactory::new(config.provider.clone())),
        MaskingCodec::new(config.masking.policy),
    ))
}

/// Build the assistant from configuration
///
/// The drafting provider is the configured provider with its configured
/// model. Conversion on approval is wired in only when
/// `session.execute_on_approval` is set.
///
/// # Errors
///
/// Returns error if the provider cannot be created or the registry cannot
/// be opened
pub fn build_assistant(config: &Config) -> Result<Assistant> {
    let drafter: Arc<dyn Provider> =
        Arc::from(create_provider(&config.provider.provider_type, &config.provider)?);
    tracing::info!("Drafting with {} ({})", drafter.name(), drafter.model());

    let converter = if config.session.execute_on_approval {
        Some(build_conversion_service(config)?)
    } else {
        None
    };

    Ok(Assistant::new(
        drafter,
        converter,
        MessageClassifier::new(KeywordTable::from_config(&config.session)),
    ))
}

pub mod serve {
    //! HTTP server command

    use super::*;
    use crate::error::SchemaBridgeError;
    use crate::server::{build_router, serve, AppState};
    use std::net::SocketAddr;

    /// Run the HTTP API until interrupted
    ///
    /// `bind` overrides `server.bind` from the configuration.
    pub async fn run_serve(config: Config, bind: Option<String>) -> Result<()> {
        let bind = bind.unwrap_or_else(|| config.server.bind.clone());
        let addr: SocketAddr = bind.parse().map_err(|e| {
            SchemaBridgeError::Config(format!("Invalid bind address '{}': {}", bind, e))
        })?;

        let assistant = build_assistant(&config)?;
        serve(build_router(AppState::new(assistant)), addr).await
    }
}

pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Runs a readline loop over a single in-memory session. Lines starting
    //! with `/` are special commands; everything else is a chat message.

    use super::special_commands::{parse_special_command, print_help, SpecialCommand};
    use super::*;
    use crate::session::Session;
    use crate::upload::UploadedDocument;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::path::Path;

    /// Start interactive chat mode
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let assistant = build_assistant(&config)?;
        let mut session = Session::new();
        let mut rl = DefaultEditor::new()?;

        print_welcome_banner();

        loop {
            let prompt = format!("[{}] >> ", session.status).cyan().to_string();
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::Upload { source, sink }) => {
                            handle_upload(&assistant, &mut session, &source, &sink).await;
                            continue;
                        }
                        Ok(SpecialCommand::ShowStatus) => {
                            print_status(&session);
                            continue;
                        }
                        Ok(SpecialCommand::ShowDraft) => {
                            match session.draft.as_deref() {
                                Some(draft) if session.has_draft() => println!("\n{}\n", draft),
                                _ => println!("No draft yet. Use /upload <source> <sink>.\n"),
                            }
                            continue;
                        }
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => {}
                        Err(e) => {
                            eprintln!("{}", e.to_string().red());
                            continue;
                        }
                    }

                    match assistant.chat(&mut session, trimmed).await {
                        Ok(reply) => {
                            println!("\n{}\n", reply.reply.bold());
                            if let Some(draft) = &reply.draft {
                                println!("{}\n", draft);
                            }
                            if let Some(output) = &reply.final_output {
                                println!("{}\n{}\n", "Final draft:".green(), output);
                            }
                            if let Some(result) = &reply.result {
                                println!(
                                    "{}\n{}\n",
                                    "Converted document:".green(),
                                    serde_json::to_string_pretty(result)?
                                );
                            }
                        }
                        Err(e) => {
                            tracing::error!("Chat turn failed: {:#}", e);
                            eprintln!("{} {}\n", "Error:".red(), e);
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    async fn handle_upload(
        assistant: &Assistant,
        session: &mut Session,
        source: &Path,
        sink: &Path,
    ) {
        let documents = UploadedDocument::from_path(source)
            .and_then(|s| UploadedDocument::from_path(sink).map(|t| (s, t)));
        let (source, sink) = match documents {
            Ok(pair) => pair,
            Err(e) => {
                eprintln!("{} {}\n", "Upload rejected:".red(), e);
                return;
            }
        };

        match assistant.upload(session, source, sink).await {
            Ok(reply) => println!("\n{}\n\n{}\n", reply.message.bold(), reply.draft),
            Err(e) => {
                tracing::error!("Upload failed: {:#}", e);
                eprintln!("{} {}\n", "Error:".red(), e);
            }
        }
    }

    fn print_welcome_banner() {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║        SchemaBridge Interactive Chat - Welcome!              ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Tell me what you want to do, or upload files with /upload <source> <sink>.");
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    fn print_status(session: &Session) {
        let field_count = |schema: &Option<crate::schema::SchemaDescriptor>| {
            schema
                .as_ref()
                .map(|s| format!("{} fields", s.len()))
                .unwrap_or_else(|| "not uploaded".to_string())
        };

        println!("\nStatus:        {}", session.status.to_string().bold());
        println!(
            "Intent:        {}",
            if session.intent.is_some() { "source to sink" } else { "unknown" }
        );
        println!("Source schema: {}", field_count(&session.source_schema));
        println!("Sink schema:   {}", field_count(&session.sink_schema));
        println!("Draft:         {}\n", if session.has_draft() { "yes" } else { "no" });
    }
}

pub mod convert {
    //! One-shot conversion command

    use super::*;
    use crate::upload::UploadedDocument;
    use anyhow::Context;
    use std::path::Path;

    /// Convert `source` into the shape of `sink` and write the result
    ///
    /// The result goes to `output` when given, stdout otherwise.
    pub async fn run_convert(
        config: Config,
        source: &Path,
        sink: &Path,
        output: Option<&Path>,
    ) -> Result<()> {
        let source = UploadedDocument::from_path(source)?;
        let sink = UploadedDocument::from_path(sink)?;

        let service = build_conversion_service(&config)?;
        let converted = service.convert(&source.document, &sink.document).await?;
        let rendered = serde_json::to_string_pretty(&converted)?;

        match output {
            Some(path) => {
                std::fs::write(path, format!("{}\n", rendered))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                tracing::info!("Wrote converted document to {}", path.display());
            }
            None => println!("{}", rendered),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_build_assistant_with_ollama() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.provider.provider_type = "ollama".to_string();
        config.registry.db_path = Some(dir.path().join("models.db").to_string_lossy().to_string());
        assert!(build_assistant(&config).is_ok());
    }

    #[test]
    fn test_build_assistant_without_conversion_skips_registry() {
        let mut config = Config::default();
        config.provider.provider_type = "ollama".to_string();
        config.session.execute_on_approval = false;
        config.registry.db_path = Some("/proc/schemabridge/unwritable/models.db".to_string());
        assert!(build_assistant(&config).is_ok());
    }

    #[test]
    fn test_build_assistant_unknown_provider() {
        let mut config = Config::default();
        config.provider.provider_type = "nope".to_string();
        assert!(build_assistant(&config).is_err());
    }
}

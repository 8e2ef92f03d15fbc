//! Command-line interface definition for SchemaBridge
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the HTTP server, the interactive chat, one-shot
//! conversion and model registry management.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SchemaBridge - JSON source to sink mapping assistant
///
/// Draft a field mapping between two JSON documents through conversation,
/// then convert the source with an external model without sending its
/// literal values.
#[derive(Parser, Debug, Clone)]
#[command(name = "schemabridge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml", global = true)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the provider from config (gemini, ollama)
    #[arg(short, long, global = true)]
    pub provider: Option<String>,

    /// Override the model registry database path
    #[arg(long, global = true)]
    pub registry_db: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for SchemaBridge
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on (overrides server.bind)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Start an interactive drafting session in the terminal
    Chat,

    /// Convert a source document into the shape of a sink sample
    Convert {
        /// Source JSON document
        #[arg(long)]
        source: PathBuf,

        /// Sink JSON sample
        #[arg(long)]
        sink: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage the model registry
    Models {
        /// Model management subcommand
        #[command(subcommand)]
        command: ModelCommand,
    },
}

/// Model registry subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ModelCommand {
    /// List registered models
    List {
        /// Output as JSON instead of a table
        #[arg(short, long)]
        json: bool,
    },

    /// Register a model
    Add {
        /// Model name, e.g. models/gemini-flash-latest
        model: String,

        /// Make it the active model
        #[arg(long)]
        activate: bool,
    },

    /// Make a registered model the active one
    Activate {
        /// Model name
        model: String,
    },

    /// Remove a model from the registry
    Remove {
        /// Model name
        model: String,
    },

    /// Show the currently active model
    Current,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            provider: None,
            registry_db: None,
            command: Commands::Chat,
        }
    }
}

//! Model registry commands for SchemaBridge
//!
//! These commands manage which model identifiers are known to the registry
//! and which one conversions use.

use crate::cli::ModelCommand;
use crate::config::Config;
use crate::error::{Result, SchemaBridgeError};
use crate::storage::{ModelRecord, ModelRegistry, SqliteModelRegistry};
use colored::Colorize;
use prettytable::{cell, row, Table};

/// Dispatch a `models` subcommand
///
/// # Examples
///
/// ```no_run
/// use schemabridge::cli::ModelCommand;
/// use schemabridge::commands::models::run_models_command;
/// use schemabridge::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::default();
/// run_models_command(&config, ModelCommand::Current)?;
/// # Ok(())
/// # }
/// ```
pub fn run_models_command(config: &Config, command: ModelCommand) -> Result<()> {
    let registry = SqliteModelRegistry::open(config.registry.db_path.as_deref())?;
    tracing::debug!("Using model registry at {}", registry.db_path().display());

    match command {
        ModelCommand::List { json } => list_models(&registry, json),
        ModelCommand::Add { model, activate } => add_model(&registry, &model, activate),
        ModelCommand::Activate { model } => {
            registry.activate(&model)?;
            println!("Active model: {}", model.green());
            Ok(())
        }
        ModelCommand::Remove { model } => {
            if registry.remove_model(&model)? {
                println!("Removed {}", model);
            } else {
                println!("{} is not registered", model.yellow());
            }
            Ok(())
        }
        ModelCommand::Current => show_current_model(&registry),
    }
}

/// List registered models as a table or as JSON
pub fn list_models(registry: &SqliteModelRegistry, json: bool) -> Result<()> {
    let models = registry.list_models()?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&models).map_err(SchemaBridgeError::Serialization)?;
        println!("{}", rendered);
        return Ok(());
    }

    if models.is_empty() {
        println!("No models registered. Add one with `schemabridge models add <name> --activate`.");
        return Ok(());
    }

    output_models_table(&models);
    Ok(())
}

fn add_model(registry: &SqliteModelRegistry, model: &str, activate: bool) -> Result<()> {
    if registry.add_model(model)? {
        println!("Registered {}", model);
    } else {
        println!("{} is already registered", model);
    }

    if activate {
        registry.activate(model.trim())?;
        println!("Active model: {}", model.trim().green());
    }
    Ok(())
}

/// Print the currently active model
pub fn show_current_model(registry: &SqliteModelRegistry) -> Result<()> {
    match registry.active_model()? {
        Some(model) => println!("Active Model:   {}", model),
        None => println!("{}", "No active model configured".yellow()),
    }
    Ok(())
}

fn output_models_table(models: &[ModelRecord]) {
    let mut table = Table::new();
    table.add_row(row!["Model Name", "Active", "Registered"]);

    for model in models {
        let active = if model.is_active { "yes" } else { "" };
        table.add_row(row![
            model.model_name,
            active,
            model.created_at.format("%Y-%m-%d %H:%M:%S")
        ]);
    }

    println!("\nRegistered models:\n");
    table.printstd();
    println!();
}

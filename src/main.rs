//! SchemaBridge - JSON source to sink mapping assistant
//!
#![doc = "Main entry point for the SchemaBridge application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use schemabridge::cli::{Cli, Commands};
use schemabridge::commands;
use schemabridge::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(b) = &bind {
                tracing::debug!("Using bind override: {}", b);
            }
            commands::serve::run_serve(config, bind).await?;
        }
        Commands::Chat => {
            commands::chat::run_chat(config).await?;
        }
        Commands::Convert {
            source,
            sink,
            output,
        } => {
            commands::convert::run_convert(config, &source, &sink, output.as_deref()).await?;
        }
        Commands::Models { command } => {
            commands::models::run_models_command(&config, command)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "schemabridge=debug"
    } else {
        "schemabridge=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

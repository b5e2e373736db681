//! GeoLayer CLI - Command-line interface
//!
//! Thin binary over the `geolayer` library: loads configuration,
//! initialises logging, and runs the minimap streaming loop.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "geolayer",
    version,
    about = "Live geolocation minimap tiles, streamed on demand"
)]
struct Cli {
    /// Path to the config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connect to the relay and stream the minimap
    Start {
        /// Write each completed frame to this SVG file
        #[arg(long)]
        out: Option<PathBuf>,

        /// Override the relay websocket URL
        #[arg(long)]
        relay: Option<String>,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match geolayer::config::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("geolayer: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = geolayer::telemetry::init_logging(&config.logging.filter) {
        eprintln!("geolayer: logging unavailable: {e}");
    }

    match cli.command {
        Command::Start { out, relay } => {
            if let Some(url) = relay {
                config.relay.url = url;
            }
            match commands::start::run(config, out).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    tracing::error!(error = %e, "start failed");
                    eprintln!("geolayer: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Config => {
            commands::config::run(&config);
            ExitCode::SUCCESS
        }
    }
}

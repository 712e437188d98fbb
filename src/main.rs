mod config;
mod inspect;

use anyhow::Result;
use clap::{Parser, Subcommand};
use glam::Vec2;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{InspectorConfig, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(author, version, about = "Layout inspector for surviveler UI documents", long_about = None)]
struct Args {
    /// Inspector configuration (TOML)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build and bind a layout document, reporting the first error
    Check {
        /// Layout document (.toml or .json)
        document: PathBuf,
    },
    /// Print the resolved rectangle of every item
    Bind {
        /// Layout document (.toml or .json)
        document: PathBuf,
        /// Emit a JSON snapshot instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List items under a point, front to back
    Hit {
        /// Layout document (.toml or .json)
        document: PathBuf,
        /// Pointer x in viewport pixels
        #[arg(long, allow_negative_numbers = true)]
        x: f32,
        /// Pointer y in viewport pixels
        #[arg(long, allow_negative_numbers = true)]
        y: f32,
        /// Only items listening to this event; also reports which one consumes it
        #[arg(long)]
        event: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Config warnings are emitted before the real subscriber exists.
    let config = tracing::subscriber::with_default(
        tracing_subscriber::fmt().with_writer(std::io::stderr).finish(),
        || InspectorConfig::load_from_path(&args.config),
    );

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    info!("surviveler-layout v{}", env!("CARGO_PKG_VERSION"));

    let output = match &args.command {
        Command::Check { document } => inspect::check(document, &config)?,
        Command::Bind { document, json } => inspect::bind(document, *json, &config)?,
        Command::Hit {
            document,
            x,
            y,
            event,
        } => inspect::hit(document, Vec2::new(*x, *y), event.as_deref(), &config)?,
    };
    print!("{output}");
    Ok(())
}

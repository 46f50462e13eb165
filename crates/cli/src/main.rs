//! StyleCraft CLI: the main entry point.
//!
//! Commands:
//! - `serve`: Start the HTTP API server
//! - `transform`: Rewrite one query from the command line
//! - `history`: List stored transformations
//! - `init`: Write a default config file
//! - `doctor`: Diagnose config, model backend, and storage

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stylecraft_config::{AppConfig, LoggingConfig};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "stylecraft",
    about = "StyleCraft — rewrite text in a casual or formal style",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ~/.stylecraft/config.toml)
    #[arg(long, global = true, env = "STYLECRAFT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Rewrite a query in the given style
    Transform {
        /// casual or formal
        #[arg(short, long)]
        style: String,

        /// The text to rewrite
        query: String,
    },

    /// List stored transformations, newest first
    History {
        /// Records per page (at least 1)
        #[arg(
            short,
            long,
            default_value_t = 10,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        limit: usize,

        #[arg(short, long, default_value_t = 0)]
        offset: usize,
    },

    /// Write a default configuration file
    Init,

    /// Diagnose system health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    // Only the logging section is needed here; commands validate the rest.
    let logging = AppConfig::read_file(
        &config_path
            .map(PathBuf::from)
            .unwrap_or_else(|| AppConfig::config_dir().join("config.toml")),
    )
    .map(|config| config.logging)
    .unwrap_or_default();
    init_tracing(cli.verbose, &logging);

    match cli.command {
        Commands::Serve { port } => commands::serve::run(config_path, port).await?,
        Commands::Transform { style, query } => {
            commands::transform::run(config_path, &query, &style).await?
        }
        Commands::History { limit, offset } => {
            commands::history::run(config_path, limit, offset).await?
        }
        Commands::Init => commands::init::run(config_path).await?,
        Commands::Doctor => commands::doctor::run(config_path).await?,
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `-v` means debug, else the configured level.
fn init_tracing(verbose: bool, logging: &LoggingConfig) {
    let default_directive = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}

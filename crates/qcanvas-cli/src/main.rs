//! qcanvas Command-Line Interface
//!
//! Loads circuits saved by the canvas editor, checks them against the
//! circuit invariants and prints the per-qubit Bloch projection.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::project::ProjectOptions;
use commands::{project, validate, version};
use config::{Config, LoggingConfig};

/// qcanvas - per-qubit Bloch sphere projection for quantum circuit designs
#[derive(Parser)]
#[command(name = "qcanvas")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ~/.qcanvas/config.yaml)
    #[arg(long, global = true, env = "QCANVAS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the projected Bloch state of each qubit
    Project {
        /// Input circuit file (canvas JSON)
        #[arg(short, long)]
        input: String,

        /// Only project this qubit
        #[arg(short, long)]
        qubit: Option<u32>,

        /// Output format (table, json); defaults to the configured format
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Check a circuit against the circuit invariants
    Validate {
        /// Input circuit file (canvas JSON)
        #[arg(short, long)]
        input: String,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    init_logging(cli.verbose, &config.logging);

    // Execute command
    let result = match cli.command {
        Commands::Project {
            input,
            qubit,
            format,
        } => {
            let options = ProjectOptions {
                qubit,
                format: format.as_deref().unwrap_or(&config.output.format),
                precision: config.output.precision,
                use_cache: config.cache.enabled,
            };
            project::execute(&input, &options)
        }

        Commands::Validate { input } => validate::execute(&input),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

/// Install the global subscriber. `-v` flags take precedence over the
/// configured level. Logs go to stderr so JSON output stays parseable.
fn init_logging(verbose: u8, logging: &LoggingConfig) {
    let filter = match verbose {
        0 => logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

mod commands;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eventcal_core::ShapePolicy;
use eventcal_core::eventcal_config::EventcalConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eventcal")]
#[command(about = "Compile declarative event definitions into .ics calendar files")]
struct Cli {
    /// Log debug details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an .ics file from a definition file
    Generate {
        /// Definition file (.toml, or .json)
        input: PathBuf,

        /// Desired output .ics file name
        output: PathBuf,

        /// Fail on events that mix keys of several shapes
        #[arg(long)]
        strict: bool,
    },
    /// List the occurrences a definition file produces
    Preview {
        /// Definition file (.toml, or .json)
        input: PathBuf,

        /// First day to show (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        from: Option<String>,

        /// How far ahead to look (e.g. "90d", "52weeks")
        #[arg(long, default_value = "365d")]
        within: String,

        /// Fail on events that mix keys of several shapes
        #[arg(long)]
        strict: bool,
    },
    /// Show the events of an existing .ics file
    Inspect {
        /// Calendar file to read
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = EventcalConfig::load().context("Failed to load eventcal config")?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Generate {
            input,
            output,
            strict,
        } => {
            let policy = shape_policy(&config, strict);
            let output = config.resolve_output(&output);
            commands::generate::run(&input, &output, policy, &config.product_id)
        }
        Commands::Preview {
            input,
            from,
            within,
            strict,
        } => {
            let policy = shape_policy(&config, strict);
            commands::preview::run(&input, from.as_deref(), &within, policy)
        }
        Commands::Inspect { file } => commands::inspect::run(&file),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// `--strict` wins over the configured policy.
fn shape_policy(config: &EventcalConfig, strict: bool) -> ShapePolicy {
    if strict {
        ShapePolicy::Strict
    } else {
        config.shape_policy
    }
}

//! Depictio CLI agent
//!
//! Registers workflows and data collections with a Depictio catalog and
//! triggers their server-side processing.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{config, login, setup, validate};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Depictio CLI agent - sync workflows and data collections with a Depictio catalog
#[derive(Parser)]
#[command(name = "depictio")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Agent config file (default: ~/.depictio/agent.yaml)
    #[arg(long, global = true, env = "DEPICTIO_AGENT_CONFIG")]
    pub agent_config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect the agent configuration
    Config(config::ConfigArgs),

    /// Check the agent credentials against the catalog
    Login(login::LoginArgs),

    /// Validate a pipeline config locally and against the catalog
    ValidatePipeline(validate::ValidatePipelineArgs),

    /// Register the workflows of a pipeline config and process their data
    Setup(setup::SetupArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "depictio=debug,depictio_sync=debug,depictio_client=debug,depictio_config=debug,info"
    } else {
        "depictio=info,depictio_sync=info,depictio_client=warn,warn"
    };

    let log_dir = depictio_config::depictio_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "depictio.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(cli.verbose)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "depictio=trace,depictio_sync=trace,depictio_client=trace,depictio_config=trace,info",
                )),
        )
        .init();

    let agent_config_path = cli
        .agent_config
        .unwrap_or_else(depictio_config::default_agent_config_path);

    let ctx = commands::Context {
        agent_config_path,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Config(args) => config::run(args, &ctx).await,
        Commands::Login(args) => login::run(args, &ctx).await,
        Commands::ValidatePipeline(args) => validate::run(args, &ctx).await,
        Commands::Setup(args) => setup::run(args, &ctx).await,
    }
}

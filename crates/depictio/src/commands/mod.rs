//! CLI command handlers.

pub mod config;
pub mod login;
pub mod setup;
pub mod validate;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use console::Style;
use depictio_client::CatalogClient;
use depictio_config::{AgentConfig, PipelineConfig};
use tracing::{debug, info};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Agent config file to load credentials from.
    pub agent_config_path: PathBuf,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Load and locally validate the agent config.
    pub fn load_agent_config(&self) -> Result<AgentConfig> {
        debug!("Loading agent config from {}", self.agent_config_path.display());
        depictio_config::load_agent_config(&self.agent_config_path).with_context(|| {
            format!(
                "invalid agent config {}",
                self.agent_config_path.display()
            )
        })
    }
}

/// Build a catalog client for the agent's session.
pub fn connect(agent: &AgentConfig) -> Result<CatalogClient> {
    let mut builder = CatalogClient::builder().session(&agent.session());
    if let Some(secs) = agent.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = agent.action_timeout_secs {
        builder = builder.action_timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Load the agent config and have the catalog accept its credentials.
pub async fn login(ctx: &Context) -> Result<(AgentConfig, CatalogClient)> {
    let agent = ctx.load_agent_config()?;
    let client = connect(&agent)?;
    client
        .cli()
        .validate_agent_config(&agent)
        .await
        .with_context(|| format!("login failed for {}", agent.user.email))?;
    info!("Logged in as {} on {}", agent.user.email, agent.api_base_url);
    Ok((agent, client))
}

/// Validate a pipeline config locally, then remotely.
///
/// Returns the config as accepted by the server.
pub async fn validate_pipeline(client: &CatalogClient, path: &Path) -> Result<PipelineConfig> {
    let local = depictio_config::load_pipeline_config(path)
        .with_context(|| format!("invalid pipeline config {}", path.display()))?;

    let validation = client.cli().validate_pipeline_config(&local).await?;
    if !validation.success {
        anyhow::bail!("pipeline config rejected by the catalog: {}", validation.message);
    }
    debug!("Pipeline config {} accepted by the catalog", path.display());
    Ok(validation.config.unwrap_or(local))
}

/// Print a green check line.
pub fn print_ok(message: impl std::fmt::Display) {
    let green = Style::new().green();
    println!("{} {}", green.apply_to("✓"), message);
}

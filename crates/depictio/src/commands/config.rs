//! Config command - inspect the agent configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the agent configuration with the token masked
    Show,

    /// Show the agent configuration file path
    Path,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Path => cmd_path(ctx),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let agent = ctx.load_agent_config()?.redacted();

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&agent)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!();
    println!("{}", style("Depictio Agent Configuration").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();
    println!(
        "  {} {}",
        dim.apply_to("File:"),
        ctx.agent_config_path.display()
    );
    println!("  {} {}", dim.apply_to("API:"), agent.api_base_url);
    println!("  {} {}", dim.apply_to("User:"), agent.user.email);
    if agent.user.is_admin {
        println!("  {} yes", dim.apply_to("Admin:"));
    }
    println!(
        "  {} {} (expires {})",
        dim.apply_to("Token:"),
        agent.user.token.name,
        agent.user.token.expire_datetime
    );
    if let Some(secs) = agent.timeout_secs {
        println!("  {} {}s", dim.apply_to("Timeout:"), secs);
    }
    if let Some(secs) = agent.action_timeout_secs {
        println!("  {} {}s", dim.apply_to("Action timeout:"), secs);
    }
    println!();
    Ok(())
}

fn cmd_path(ctx: &Context) -> Result<()> {
    let path = depictio_config::expand_path(&ctx.agent_config_path);
    if ctx.json_output {
        println!(
            "{}",
            serde_json::json!({
                "path": path.display().to_string(),
                "exists": path.exists(),
            })
        );
    } else {
        println!("{}", path.display());
    }
    Ok(())
}

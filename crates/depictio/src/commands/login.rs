//! Login command - check the agent credentials against the catalog.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::Context;

/// Arguments for the login command.
#[derive(Args, Debug)]
pub struct LoginArgs {}

#[derive(Debug, Serialize)]
struct LoginOutput<'a> {
    success: bool,
    email: &'a str,
    api_base_url: &'a str,
}

/// Run the login command.
pub async fn run(_args: LoginArgs, ctx: &Context) -> Result<()> {
    let (agent, _client) = super::login(ctx).await?;

    if ctx.json_output {
        let output = LoginOutput {
            success: true,
            email: &agent.user.email,
            api_base_url: &agent.api_base_url,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        super::print_ok(format!(
            "Logged in as {} on {}",
            agent.user.email, agent.api_base_url
        ));
    }
    Ok(())
}

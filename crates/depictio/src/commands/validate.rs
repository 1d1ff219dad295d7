//! Validate-pipeline command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::Context;

/// Arguments for the validate-pipeline command.
#[derive(Args, Debug)]
pub struct ValidatePipelineArgs {
    /// Pipeline config file
    #[arg(short, long)]
    pub pipeline_config: PathBuf,

    /// Only run the local checks; do not contact the catalog
    #[arg(long)]
    pub offline: bool,
}

#[derive(Debug, Serialize)]
struct ValidateOutput {
    valid: bool,
    remote: bool,
    workflows: Vec<String>,
}

/// Run the validate-pipeline command.
pub async fn run(args: ValidatePipelineArgs, ctx: &Context) -> Result<()> {
    let config = if args.offline {
        depictio_config::load_pipeline_config(&args.pipeline_config)?
    } else {
        let (_agent, client) = super::login(ctx).await?;
        super::validate_pipeline(&client, &args.pipeline_config).await?
    };

    let workflows: Vec<String> = config.workflows.iter().map(|w| w.workflow_tag()).collect();

    if ctx.json_output {
        let output = ValidateOutput {
            valid: true,
            remote: !args.offline,
            workflows,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        super::print_ok(format!(
            "Pipeline config {} is valid ({} workflows)",
            args.pipeline_config.display(),
            workflows.len()
        ));
        if ctx.verbose {
            for tag in &workflows {
                println!("  {}", tag);
            }
        }
    }
    Ok(())
}

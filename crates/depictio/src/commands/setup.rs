//! Setup command - register workflows and process their data collections.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use depictio_sync::{
    ProcessOptions, ScanFailurePolicy, SyncOptions, SyncSummary, WorkflowReport, WorkflowStatus,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::Context;

/// Arguments for the setup command.
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Pipeline config file
    #[arg(short, long)]
    pub pipeline_config: PathBuf,

    /// Update workflows that differ from the catalog
    #[arg(long)]
    pub update: bool,

    /// Delete existing workflows from the catalog before registering them
    #[arg(long)]
    pub erase_all: bool,

    /// Scan data collection files before materializing
    #[arg(long)]
    pub scan_files: bool,

    /// Only process the data collection with this tag
    #[arg(long)]
    pub data_collection_tag: Option<String>,

    /// Skip materialize / track-set for a data collection whose scan failed
    #[arg(long, requires = "scan_files")]
    pub stop_on_scan_failure: bool,
}

impl SetupArgs {
    fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            allow_update: self.update,
            erase_all: self.erase_all,
            process: ProcessOptions {
                scan_files: self.scan_files,
                data_collection_tag: self.data_collection_tag.clone(),
                on_scan_failure: if self.stop_on_scan_failure {
                    ScanFailurePolicy::SkipPostProcessing
                } else {
                    ScanFailurePolicy::Continue
                },
            },
        }
    }
}

/// Run the setup command.
pub async fn run(args: SetupArgs, ctx: &Context) -> Result<()> {
    let (_agent, client) = super::login(ctx).await?;
    let pipeline = super::validate_pipeline(&client, &args.pipeline_config).await?;
    info!(
        "Syncing {} workflows from {}",
        pipeline.workflows.len(),
        args.pipeline_config.display()
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; stopping after the current workflow");
            on_interrupt.cancel();
        }
    });

    let summary = depictio_sync::run(&client, &pipeline.workflows, &args.sync_options(), &cancel)
        .await?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, ctx.verbose);
    }

    if !summary.is_success() {
        anyhow::bail!("sync finished with failures");
    }
    Ok(())
}

fn print_summary(summary: &SyncSummary, verbose: bool) {
    let dim = Style::new().dim();

    println!();
    println!("{}", style("Depictio Sync").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();

    for report in &summary.workflows {
        print_workflow(report, verbose);
    }

    println!();
    println!(
        "  {} {} created, {} updated, {} unchanged, {} conflicts, {} failed",
        dim.apply_to("Workflows:"),
        summary.count("created"),
        summary.count("updated"),
        summary.count("unchanged"),
        summary.count("conflict"),
        summary.count("failed"),
    );
    let failed_dcs = summary.failed_data_collections();
    if failed_dcs > 0 {
        println!(
            "  {} {} with failed steps",
            dim.apply_to("Data collections:"),
            failed_dcs
        );
    }
    println!();
}

fn print_workflow(report: &WorkflowReport, verbose: bool) {
    let green = Style::new().green();
    let yellow = Style::new().yellow();
    let red = Style::new().red();
    let dim = Style::new().dim();

    let marker = match &report.status {
        s if s.is_success() => green.apply_to("●"),
        WorkflowStatus::Duplicate | WorkflowStatus::Cancelled => yellow.apply_to("●"),
        _ => red.apply_to("●"),
    };
    println!(
        "  {} {} {}",
        marker,
        style(&report.workflow_tag).bold(),
        dim.apply_to(report.status.label())
    );

    match &report.status {
        WorkflowStatus::Created { workflow_id }
        | WorkflowStatus::Updated { workflow_id }
        | WorkflowStatus::Unchanged { workflow_id }
            if verbose =>
        {
            println!("      {} {}", dim.apply_to("id:"), workflow_id);
        }
        WorkflowStatus::Conflict { message } => {
            println!("      {}", red.apply_to(message));
            println!(
                "      {}",
                dim.apply_to("Re-run with --update to overwrite the catalog copy")
            );
        }
        WorkflowStatus::Failed { error } => println!("      {}", red.apply_to(error)),
        _ => {}
    }

    for dc in &report.data_collections {
        let steps: Vec<String> = dc
            .steps
            .iter()
            .map(|step| match step.error {
                None => format!("{} {}", green.apply_to("✓"), step.action),
                Some(_) => format!("{} {}", red.apply_to("✗"), step.action),
            })
            .collect();
        println!(
            "      {} {} {}",
            dc.tag,
            dim.apply_to(format!("({})", dc.data_collection_type)),
            steps.join("  ")
        );
        for step in dc.failed_steps() {
            if let Some(error) = &step.error {
                println!("        {} {}", red.apply_to(format!("{}:", step.action)), error);
            }
        }
        if dc.skipped_post_processing {
            println!(
                "        {}",
                dim.apply_to("post-processing skipped after failed scan")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: SetupArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::parse_from(["setup", "--pipeline-config", "pipeline.yaml"]);
        let options = cli.args.sync_options();
        assert!(!options.allow_update);
        assert!(!options.erase_all);
        assert!(!options.process.scan_files);
        assert_eq!(options.process.on_scan_failure, ScanFailurePolicy::Continue);
    }

    #[test]
    fn test_flags_map_to_options() {
        let cli = TestCli::parse_from([
            "setup",
            "-p",
            "pipeline.yaml",
            "--update",
            "--scan-files",
            "--stop-on-scan-failure",
            "--data-collection-tag",
            "samples",
        ]);
        let options = cli.args.sync_options();
        assert!(options.allow_update);
        assert!(options.process.scan_files);
        assert_eq!(
            options.process.on_scan_failure,
            ScanFailurePolicy::SkipPostProcessing
        );
        assert_eq!(options.process.data_collection_tag.as_deref(), Some("samples"));
    }

    #[test]
    fn test_stop_on_scan_failure_requires_scan() {
        let result = TestCli::try_parse_from([
            "setup",
            "-p",
            "pipeline.yaml",
            "--stop-on-scan-failure",
        ]);
        assert!(result.is_err());
    }
}

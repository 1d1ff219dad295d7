//! Drives reconciliation and processing across a whole pipeline config.

use std::collections::HashSet;

use depictio_client::WorkflowMutation;
use depictio_types::WorkflowDescriptor;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::error::{Result, SyncError};
use crate::process::{process, DataCollectionReport, ProcessOptions};
use crate::reconcile::{reconcile, ReconciliationOutcome};

/// Options for a sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Update remote workflows that differ from their declaration.
    pub allow_update: bool,
    /// Delete existing remote workflows before reconciling them.
    pub erase_all: bool,
    pub process: ProcessOptions,
}

/// Final state of one declared workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkflowStatus {
    Created { workflow_id: String },
    Updated { workflow_id: String },
    Unchanged { workflow_id: String },
    Conflict { message: String },
    Failed { error: String },
    /// Same tag already handled earlier in the run.
    Duplicate,
    /// Not reached before the run was cancelled.
    Cancelled,
}

impl WorkflowStatus {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            WorkflowStatus::Created { .. }
                | WorkflowStatus::Updated { .. }
                | WorkflowStatus::Unchanged { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkflowStatus::Created { .. } => "created",
            WorkflowStatus::Updated { .. } => "updated",
            WorkflowStatus::Unchanged { .. } => "unchanged",
            WorkflowStatus::Conflict { .. } => "conflict",
            WorkflowStatus::Failed { .. } => "failed",
            WorkflowStatus::Duplicate => "duplicate",
            WorkflowStatus::Cancelled => "cancelled",
        }
    }
}

impl From<&ReconciliationOutcome> for WorkflowStatus {
    fn from(outcome: &ReconciliationOutcome) -> Self {
        let workflow_id = outcome.record().id.clone();
        match outcome {
            ReconciliationOutcome::Created(_) => WorkflowStatus::Created { workflow_id },
            ReconciliationOutcome::Updated(_) => WorkflowStatus::Updated { workflow_id },
            ReconciliationOutcome::SkippedIdentical(_) => WorkflowStatus::Unchanged { workflow_id },
        }
    }
}

/// Report for one declared workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowReport {
    pub workflow_tag: String,
    #[serde(flatten)]
    pub status: WorkflowStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data_collections: Vec<DataCollectionReport>,
}

impl WorkflowReport {
    fn new(workflow_tag: String, status: WorkflowStatus) -> Self {
        Self {
            workflow_tag,
            status,
            data_collections: Vec::new(),
        }
    }

    /// Workflow reconciled and every data collection step succeeded.
    pub fn succeeded(&self) -> bool {
        self.status.is_success()
            && self
                .data_collections
                .iter()
                .all(DataCollectionReport::succeeded)
    }
}

/// Outcome of a whole run, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncSummary {
    pub workflows: Vec<WorkflowReport>,
}

impl SyncSummary {
    /// No workflow conflicted, failed or was cancelled, and no data
    /// collection step failed.
    pub fn is_success(&self) -> bool {
        self.workflows
            .iter()
            .all(|w| w.succeeded() || w.status == WorkflowStatus::Duplicate)
    }

    /// Number of workflows with the given status label.
    pub fn count(&self, label: &str) -> usize {
        self.workflows
            .iter()
            .filter(|w| w.status.label() == label)
            .count()
    }

    /// Number of data collections with at least one failed step.
    pub fn failed_data_collections(&self) -> usize {
        self.workflows
            .iter()
            .flat_map(|w| w.data_collections.iter())
            .filter(|dc| !dc.succeeded())
            .count()
    }
}

/// Sync every declared workflow against the catalog, one after another.
///
/// All descriptors are validated before the first remote call. Conflicts and
/// remote failures are recorded on the workflow's report and the run moves
/// on; an authentication failure ends the run with [`SyncError::Auth`].
/// `cancel` is checked between workflows.
pub async fn run<C: Catalog + ?Sized>(
    catalog: &C,
    workflows: &[WorkflowDescriptor],
    options: &SyncOptions,
    cancel: &CancellationToken,
) -> Result<SyncSummary> {
    for workflow in workflows {
        workflow.validate()?;
    }

    let mut summary = SyncSummary::default();
    let mut seen = HashSet::new();

    for workflow in workflows {
        let workflow_tag = workflow.workflow_tag();

        if cancel.is_cancelled() {
            summary
                .workflows
                .push(WorkflowReport::new(workflow_tag, WorkflowStatus::Cancelled));
            continue;
        }

        if !seen.insert(workflow_tag.clone()) {
            warn!("Skipping duplicate workflow {}", workflow_tag);
            summary
                .workflows
                .push(WorkflowReport::new(workflow_tag, WorkflowStatus::Duplicate));
            continue;
        }

        let report = match sync_workflow(catalog, workflow, options).await {
            Ok(report) => report,
            Err(SyncError::Conflict { message, .. }) => {
                warn!("Workflow {} conflicts with the catalog: {}", workflow_tag, message);
                WorkflowReport::new(workflow_tag, WorkflowStatus::Conflict { message })
            }
            Err(SyncError::Remote(e)) => {
                warn!("Workflow {} failed: {}", workflow_tag, e);
                WorkflowReport::new(
                    workflow_tag,
                    WorkflowStatus::Failed {
                        error: e.to_string(),
                    },
                )
            }
            Err(e) => return Err(e),
        };
        summary.workflows.push(report);
    }

    info!(
        "Sync finished: {} created, {} updated, {} unchanged, {} conflicts, {} failed",
        summary.count("created"),
        summary.count("updated"),
        summary.count("unchanged"),
        summary.count("conflict"),
        summary.count("failed"),
    );
    Ok(summary)
}

async fn sync_workflow<C: Catalog + ?Sized>(
    catalog: &C,
    workflow: &WorkflowDescriptor,
    options: &SyncOptions,
) -> Result<WorkflowReport> {
    if options.erase_all {
        erase(catalog, workflow).await?;
    }

    let outcome = reconcile(catalog, workflow, options.allow_update).await?;
    let data_collections = process(catalog, &outcome, &options.process).await?;

    Ok(WorkflowReport {
        workflow_tag: workflow.workflow_tag(),
        status: WorkflowStatus::from(&outcome),
        data_collections,
    })
}

/// Delete the remote copy of a workflow, if there is one.
async fn erase<C: Catalog + ?Sized>(catalog: &C, workflow: &WorkflowDescriptor) -> Result<()> {
    let Some(existing) = catalog
        .fetch_workflow(&workflow.name, &workflow.engine)
        .await?
    else {
        return Ok(());
    };

    info!("Erasing workflow {} ({})", existing.workflow_tag(), existing.id);
    catalog
        .mutate_workflow(WorkflowMutation::Delete {
            workflow_id: &existing.id,
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use depictio_types::{DataCollectionAction, DataCollectionDescriptor};

    use super::*;
    use crate::fake::{Call, FakeCatalog};

    fn workflow(name: &str) -> WorkflowDescriptor {
        WorkflowDescriptor::new(name, "snakemake").with_data_collection(
            DataCollectionDescriptor::new("samples", "Table"),
        )
    }

    fn changed(name: &str) -> WorkflowDescriptor {
        workflow(name).with_data_collection(DataCollectionDescriptor::new(
            "tracks",
            "JBrowse2",
        ))
    }

    fn scanning() -> SyncOptions {
        SyncOptions {
            process: ProcessOptions {
                scan_files: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_demo_scenario() {
        let catalog = FakeCatalog::new();

        let summary = run(&catalog, &[workflow("demo")], &scanning(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(summary.is_success());
        assert_eq!(summary.count("created"), 1);
        assert_eq!(
            catalog.calls(),
            vec![
                Call::Fetch("snakemake/demo".to_string()),
                Call::Create("snakemake/demo".to_string()),
                Call::Action(DataCollectionAction::Scan, "samples".to_string()),
                Call::Action(DataCollectionAction::Materialize, "samples".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_resubmission_makes_no_mutation() {
        let catalog = FakeCatalog::new().with_existing(&workflow("demo"));

        let summary = run(
            &catalog,
            &[workflow("demo")],
            &SyncOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.count("unchanged"), 1);
        assert_eq!(
            catalog.calls(),
            vec![
                Call::Fetch("snakemake/demo".to_string()),
                Call::Compare("snakemake/demo".to_string()),
                Call::Action(DataCollectionAction::Materialize, "samples".to_string()),
            ]
        );
        assert_eq!(catalog.mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_conflict_does_not_stop_next_workflow() {
        let catalog = FakeCatalog::new().with_existing(&workflow("first"));

        let summary = run(
            &catalog,
            &[changed("first"), workflow("second")],
            &SyncOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert!(!summary.is_success());
        let first = &summary.workflows[0];
        assert!(matches!(first.status, WorkflowStatus::Conflict { .. }));
        assert!(first.data_collections.is_empty());
        assert_eq!(summary.workflows[1].status.label(), "created");
        assert!(!catalog.calls().contains(&Call::Update("snakemake/first".to_string())));
    }

    #[tokio::test]
    async fn test_update_allowed() {
        let catalog = FakeCatalog::new().with_existing(&workflow("demo"));
        let options = SyncOptions {
            allow_update: true,
            ..Default::default()
        };

        let summary = run(&catalog, &[changed("demo")], &options, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.count("updated"), 1);
        assert_eq!(summary.workflows[0].data_collections.len(), 2);
    }

    #[tokio::test]
    async fn test_remote_failure_is_isolated() {
        let catalog = FakeCatalog::new().failing_fetch("snakemake/first");

        let summary = run(
            &catalog,
            &[workflow("first"), workflow("second")],
            &SyncOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.count("failed"), 1);
        assert_eq!(summary.count("created"), 1);
    }

    #[tokio::test]
    async fn test_failed_data_collection_fails_summary() {
        let catalog =
            FakeCatalog::new().failing_action(DataCollectionAction::Materialize, "samples");

        let summary = run(
            &catalog,
            &[workflow("demo")],
            &SyncOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.count("created"), 1);
        assert_eq!(summary.failed_data_collections(), 1);
        assert!(!summary.is_success());
    }

    #[tokio::test]
    async fn test_auth_failure_aborts_run() {
        let catalog = FakeCatalog::new().rejecting_credentials();

        let err = run(
            &catalog,
            &[workflow("first"), workflow("second")],
            &SyncOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SyncError::Auth(_)));
        assert_eq!(catalog.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_descriptor_fails_before_any_call() {
        let catalog = FakeCatalog::new();
        let invalid = WorkflowDescriptor::new("", "snakemake");

        let err = run(
            &catalog,
            &[workflow("demo"), invalid],
            &SyncOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SyncError::Config(_)));
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_are_skipped() {
        let catalog = FakeCatalog::new();

        let summary = run(
            &catalog,
            &[workflow("demo"), workflow("demo")],
            &SyncOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.workflows[1].status, WorkflowStatus::Duplicate);
        assert_eq!(catalog.mutation_count(), 1);
        assert!(summary.is_success());
    }

    #[tokio::test]
    async fn test_cancelled_run_reports_remaining() {
        let catalog = FakeCatalog::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let summary = run(&catalog, &[workflow("demo")], &SyncOptions::default(), &cancel)
            .await
            .unwrap();

        assert_eq!(summary.workflows[0].status, WorkflowStatus::Cancelled);
        assert!(catalog.calls().is_empty());
        assert!(!summary.is_success());
    }

    #[tokio::test]
    async fn test_erase_all_recreates() {
        let catalog = FakeCatalog::new().with_existing(&workflow("demo"));
        let options = SyncOptions {
            erase_all: true,
            ..Default::default()
        };

        let summary = run(&catalog, &[changed("demo")], &options, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.count("created"), 1);
        assert!(catalog.calls().contains(&Call::Delete("wf-1".to_string())));
    }

    #[test]
    fn test_status_serializes_with_tag() {
        let report = WorkflowReport::new(
            "snakemake/demo".to_string(),
            WorkflowStatus::Created {
                workflow_id: "wf-1".to_string(),
            },
        );
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["status"], "created");
        assert_eq!(value["workflow_id"], "wf-1");
        assert!(value.get("data_collections").is_none());
    }
}

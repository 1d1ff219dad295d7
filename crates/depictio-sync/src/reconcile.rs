//! Workflow reconciliation: create, update or leave alone.

use depictio_client::WorkflowMutation;
use depictio_types::{RemoteWorkflowRecord, WorkflowDescriptor};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::{Result, SyncError};

/// What reconciliation did to a workflow.
///
/// Every variant carries the catalog record, so data collection processing
/// always has remote ids to target.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconciliationOutcome {
    Created(RemoteWorkflowRecord),
    Updated(RemoteWorkflowRecord),
    SkippedIdentical(RemoteWorkflowRecord),
}

impl ReconciliationOutcome {
    pub fn record(&self) -> &RemoteWorkflowRecord {
        match self {
            ReconciliationOutcome::Created(record)
            | ReconciliationOutcome::Updated(record)
            | ReconciliationOutcome::SkippedIdentical(record) => record,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ReconciliationOutcome::Created(_) => "created",
            ReconciliationOutcome::Updated(_) => "updated",
            ReconciliationOutcome::SkippedIdentical(_) => "unchanged",
        }
    }
}

/// Bring the catalog in line with one declared workflow.
///
/// The existence check always runs first. A missing workflow is created; an
/// existing one is compared server-side and either left alone (match),
/// updated (`allow_update`), or reported as [`SyncError::Conflict`]. In the
/// conflict case no mutation is issued.
pub async fn reconcile<C: Catalog + ?Sized>(
    catalog: &C,
    declared: &WorkflowDescriptor,
    allow_update: bool,
) -> Result<ReconciliationOutcome> {
    let workflow_tag = declared.workflow_tag();
    debug!("Reconciling workflow {}", workflow_tag);

    let existing = catalog
        .fetch_workflow(&declared.name, &declared.engine)
        .await?;

    let Some(existing) = existing else {
        let record = apply(catalog, WorkflowMutation::Create(declared)).await?;
        info!("Workflow {} created ({})", workflow_tag, record.id);
        return Ok(ReconciliationOutcome::Created(record));
    };

    let comparison = catalog
        .compare_workflows(Some(declared), Some(&existing))
        .await?;

    if comparison.matches {
        info!("Workflow {} unchanged ({})", workflow_tag, existing.id);
        return Ok(ReconciliationOutcome::SkippedIdentical(existing));
    }

    if !allow_update {
        return Err(SyncError::Conflict {
            workflow: workflow_tag,
            message: comparison.message,
        });
    }

    debug!(
        "Workflow {} differs from the catalog: {}",
        workflow_tag, comparison.message
    );
    let record = apply(catalog, WorkflowMutation::Update(declared)).await?;
    info!("Workflow {} updated ({})", workflow_tag, record.id);
    Ok(ReconciliationOutcome::Updated(record))
}

/// Run a create/update and insist on getting a record back.
async fn apply<C: Catalog + ?Sized>(
    catalog: &C,
    mutation: WorkflowMutation<'_>,
) -> Result<RemoteWorkflowRecord> {
    let action = mutation.name();
    catalog.mutate_workflow(mutation).await?.ok_or_else(|| {
        SyncError::Remote(depictio_client::Error::InvalidResponse(format!(
            "{} returned no workflow",
            action
        )))
    })
}

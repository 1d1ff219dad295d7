//! The catalog seam the sync engine runs against.

use async_trait::async_trait;
use depictio_client::{CatalogClient, WorkflowMutation};
use depictio_types::{
    ComparisonResult, DataCollectionAction, RemoteWorkflowRecord, WorkflowDescriptor,
};

/// Remote catalog operations needed to reconcile and process workflows.
///
/// Implementations must not retry: a failed call is reported to the caller
/// as-is.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch a workflow by identity; `None` when the catalog has none.
    async fn fetch_workflow(
        &self,
        name: &str,
        engine: &str,
    ) -> depictio_client::Result<Option<RemoteWorkflowRecord>>;

    /// Compare a declared workflow with its remote counterpart.
    ///
    /// A missing side short-circuits without a remote call.
    async fn compare_workflows(
        &self,
        declared: Option<&WorkflowDescriptor>,
        existing: Option<&RemoteWorkflowRecord>,
    ) -> depictio_client::Result<ComparisonResult>;

    /// Create, update or delete a workflow.
    async fn mutate_workflow(
        &self,
        mutation: WorkflowMutation<'_>,
    ) -> depictio_client::Result<Option<RemoteWorkflowRecord>>;

    /// Run a server-side action for one data collection.
    async fn trigger_data_collection_action(
        &self,
        action: DataCollectionAction,
        workflow_id: &str,
        data_collection_id: &str,
    ) -> depictio_client::Result<()>;
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn fetch_workflow(
        &self,
        name: &str,
        engine: &str,
    ) -> depictio_client::Result<Option<RemoteWorkflowRecord>> {
        self.workflows().get(name, engine).await
    }

    async fn compare_workflows(
        &self,
        declared: Option<&WorkflowDescriptor>,
        existing: Option<&RemoteWorkflowRecord>,
    ) -> depictio_client::Result<ComparisonResult> {
        self.workflows().compare(declared, existing).await
    }

    async fn mutate_workflow(
        &self,
        mutation: WorkflowMutation<'_>,
    ) -> depictio_client::Result<Option<RemoteWorkflowRecord>> {
        self.workflows().mutate(mutation).await
    }

    async fn trigger_data_collection_action(
        &self,
        action: DataCollectionAction,
        workflow_id: &str,
        data_collection_id: &str,
    ) -> depictio_client::Result<()> {
        self.data_collections()
            .trigger(action, workflow_id, data_collection_id)
            .await
    }
}

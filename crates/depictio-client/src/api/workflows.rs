//! Workflows API.

use depictio_types::{ComparisonResult, RemoteWorkflowRecord, WorkflowDescriptor};

use crate::client::CatalogClient;
use crate::error::{Error, Result};
use crate::types::{CompareWorkflowsRequest, WorkflowTagQuery};

/// A mutation requested from the catalog.
#[derive(Debug, Clone, Copy)]
pub enum WorkflowMutation<'a> {
    /// `POST /workflows/create` with the full descriptor.
    Create(&'a WorkflowDescriptor),
    /// `PUT /workflows/update` with the full descriptor.
    Update(&'a WorkflowDescriptor),
    /// `DELETE /workflows/delete/{id}`, no body.
    Delete { workflow_id: &'a str },
}

impl WorkflowMutation<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowMutation::Create(_) => "create",
            WorkflowMutation::Update(_) => "update",
            WorkflowMutation::Delete { .. } => "delete",
        }
    }
}

/// Workflows API client.
pub struct WorkflowsApi {
    client: CatalogClient,
}

impl WorkflowsApi {
    pub(crate) fn new(client: CatalogClient) -> Self {
        Self { client }
    }

    /// Fetch a workflow by `{engine}/{name}`; `None` if the catalog has none.
    pub async fn get(&self, name: &str, engine: &str) -> Result<Option<RemoteWorkflowRecord>> {
        let workflow_tag = format!("{}/{}", engine, name);
        let record: Option<RemoteWorkflowRecord> = self
            .client
            .get_optional(
                "workflows/get",
                &WorkflowTagQuery {
                    workflow_tag: &workflow_tag,
                },
            )
            .await?;

        record.map(checked).transpose()
    }

    /// Compare a declared workflow with its remote counterpart.
    ///
    /// When either side is absent the answer is computed locally and no
    /// request is sent. Otherwise the server decides what "match" means.
    pub async fn compare(
        &self,
        declared: Option<&WorkflowDescriptor>,
        existing: Option<&RemoteWorkflowRecord>,
    ) -> Result<ComparisonResult> {
        let (new_workflow, existing_workflow) = match (declared, existing) {
            (Some(declared), Some(existing)) => (declared, existing),
            _ => {
                return Ok(ComparisonResult::short_circuit(declared, existing)
                    .unwrap_or_else(ComparisonResult::missing_remote));
            }
        };

        let mut result: ComparisonResult = self
            .client
            .post(
                "workflows/compare_workflow_models",
                &CompareWorkflowsRequest {
                    new_workflow,
                    existing_workflow,
                },
            )
            .await?;
        result.exists = true;
        Ok(result)
    }

    /// Apply a mutation. Only a delete may come back without a record.
    pub async fn mutate(
        &self,
        mutation: WorkflowMutation<'_>,
    ) -> Result<Option<RemoteWorkflowRecord>> {
        let record: Option<RemoteWorkflowRecord> = match mutation {
            WorkflowMutation::Create(workflow) => {
                Some(self.client.post("workflows/create", workflow).await?)
            }
            WorkflowMutation::Update(workflow) => {
                Some(self.client.put("workflows/update", workflow).await?)
            }
            WorkflowMutation::Delete { workflow_id } => {
                self.client
                    .delete(&format!("workflows/delete/{}", workflow_id))
                    .await?;
                None
            }
        };

        record.map(checked).transpose()
    }
}

/// Reject records without remote ids at the boundary.
fn checked(record: RemoteWorkflowRecord) -> Result<RemoteWorkflowRecord> {
    record
        .ensure_identified()
        .map_err(|e| Error::InvalidResponse(e.to_string()))?;
    Ok(record)
}

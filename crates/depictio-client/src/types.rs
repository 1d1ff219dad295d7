//! Request and response bodies for the catalog API.
//!
//! Domain records (workflows, data collections) live in `depictio-types`;
//! this module only holds the envelopes around them.

use depictio_types::{RemoteWorkflowRecord, WorkflowDescriptor};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Workflows
// ─────────────────────────────────────────────────────────────────────────────

/// Query for fetching a workflow by identity.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowTagQuery<'a> {
    /// `{engine}/{name}`.
    pub workflow_tag: &'a str,
}

/// Body of a compare request.
#[derive(Debug, Clone, Serialize)]
pub struct CompareWorkflowsRequest<'a> {
    pub new_workflow: &'a WorkflowDescriptor,
    pub existing_workflow: &'a RemoteWorkflowRecord,
}

// ─────────────────────────────────────────────────────────────────────────────
// Config validation
// ─────────────────────────────────────────────────────────────────────────────

/// Answer of the agent config check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentValidation {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Body of a pipeline config check.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatePipelineRequest<'a, C> {
    pub config: &'a C,
}

/// Answer of the pipeline config check, carrying the server-normalized config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineValidation<C> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub config: Option<C>,
}

fn default_success() -> bool {
    true
}

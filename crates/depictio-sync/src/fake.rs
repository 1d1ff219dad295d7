//! In-memory catalog that records every call, for unit tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use depictio_client::{Error, WorkflowMutation};
use depictio_types::{
    ComparisonResult, DataCollectionAction, RemoteDataCollectionRecord, RemoteWorkflowRecord,
    WorkflowDescriptor,
};
use parking_lot::Mutex;

use crate::catalog::Catalog;

/// One call observed by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Fetch(String),
    Compare(String),
    Create(String),
    Update(String),
    Delete(String),
    Action(DataCollectionAction, String),
}

impl Call {
    pub(crate) fn is_mutation(&self) -> bool {
        matches!(self, Call::Create(_) | Call::Update(_) | Call::Delete(_))
    }
}

#[derive(Default)]
struct State {
    /// Last descriptor applied per workflow tag, with the record it produced.
    workflows: HashMap<String, (WorkflowDescriptor, RemoteWorkflowRecord)>,
    calls: Vec<Call>,
    next_id: usize,
}

/// Fake catalog. Two workflows "match" when the declared descriptor equals the
/// last one applied.
#[derive(Default)]
pub(crate) struct FakeCatalog {
    state: Mutex<State>,
    failing_actions: HashSet<(DataCollectionAction, String)>,
    failing_fetches: HashSet<String>,
    reject_credentials: bool,
}

impl FakeCatalog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Seed the catalog as if `workflow` had been created earlier.
    pub(crate) fn with_existing(self, workflow: &WorkflowDescriptor) -> Self {
        self.state.lock().store(workflow, None);
        self
    }

    /// Make `action` fail with a 500 for the data collection `tag`.
    pub(crate) fn failing_action(mut self, action: DataCollectionAction, tag: &str) -> Self {
        self.failing_actions.insert((action, tag.to_string()));
        self
    }

    /// Make fetching `workflow_tag` fail with a 500.
    pub(crate) fn failing_fetch(mut self, workflow_tag: &str) -> Self {
        self.failing_fetches.insert(workflow_tag.to_string());
        self
    }

    /// Answer every call with 401.
    pub(crate) fn rejecting_credentials(mut self) -> Self {
        self.reject_credentials = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub(crate) fn mutation_count(&self) -> usize {
        self.calls().iter().filter(|c| c.is_mutation()).count()
    }

    pub(crate) fn actions(&self) -> Vec<(DataCollectionAction, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Action(action, tag) => Some((action, tag)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> depictio_client::Result<()> {
        self.state.lock().calls.push(call);
        if self.reject_credentials {
            return Err(Error::Auth("invalid token".to_string()));
        }
        Ok(())
    }

    fn tag_of(&self, data_collection_id: &str) -> Option<String> {
        let state = self.state.lock();
        state
            .workflows
            .values()
            .flat_map(|(_, record)| record.data_collections.iter())
            .find(|dc| dc.id == data_collection_id)
            .map(|dc| dc.data_collection_tag.clone())
    }
}

impl State {
    fn store(
        &mut self,
        workflow: &WorkflowDescriptor,
        keep_id: Option<String>,
    ) -> RemoteWorkflowRecord {
        self.next_id += 1;
        let id = keep_id.unwrap_or_else(|| format!("wf-{}", self.next_id));
        let record = RemoteWorkflowRecord {
            id: id.clone(),
            name: workflow.name.clone(),
            engine: workflow.engine.clone(),
            data_collections: workflow
                .data_collections
                .iter()
                .enumerate()
                .map(|(i, dc)| RemoteDataCollectionRecord {
                    id: format!("{}-dc-{}", id, i),
                    data_collection_tag: dc.data_collection_tag.clone(),
                    config: dc.config.clone(),
                })
                .collect(),
            extra: serde_json::Map::new(),
        };
        self.workflows
            .insert(workflow.workflow_tag(), (workflow.clone(), record.clone()));
        record
    }
}

fn server_error(message: &str) -> Error {
    Error::Api {
        status: 500,
        message: message.to_string(),
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn fetch_workflow(
        &self,
        name: &str,
        engine: &str,
    ) -> depictio_client::Result<Option<RemoteWorkflowRecord>> {
        let tag = format!("{}/{}", engine, name);
        self.record(Call::Fetch(tag.clone()))?;
        if self.failing_fetches.contains(&tag) {
            return Err(server_error("fetch failed"));
        }
        let state = self.state.lock();
        Ok(state.workflows.get(&tag).map(|(_, record)| record.clone()))
    }

    async fn compare_workflows(
        &self,
        declared: Option<&WorkflowDescriptor>,
        existing: Option<&RemoteWorkflowRecord>,
    ) -> depictio_client::Result<ComparisonResult> {
        let declared = match (declared, existing) {
            (Some(declared), Some(_)) => declared,
            _ => {
                return Ok(ComparisonResult::short_circuit(declared, existing)
                    .unwrap_or_else(ComparisonResult::missing_remote));
            }
        };

        let tag = declared.workflow_tag();
        self.record(Call::Compare(tag.clone()))?;
        let state = self.state.lock();
        let matches = state
            .workflows
            .get(&tag)
            .is_some_and(|(applied, _)| applied == declared);
        Ok(ComparisonResult {
            exists: true,
            matches,
            message: if matches {
                String::new()
            } else {
                format!("workflow '{}' differs from the catalog", tag)
            },
        })
    }

    async fn mutate_workflow(
        &self,
        mutation: WorkflowMutation<'_>,
    ) -> depictio_client::Result<Option<RemoteWorkflowRecord>> {
        match mutation {
            WorkflowMutation::Create(workflow) => {
                self.record(Call::Create(workflow.workflow_tag()))?;
                let mut state = self.state.lock();
                Ok(Some(state.store(workflow, None)))
            }
            WorkflowMutation::Update(workflow) => {
                let tag = workflow.workflow_tag();
                self.record(Call::Update(tag.clone()))?;
                let mut state = self.state.lock();
                let id = state
                    .workflows
                    .get(&tag)
                    .map(|(_, record)| record.id.clone())
                    .ok_or_else(|| Error::NotFound(tag.clone()))?;
                Ok(Some(state.store(workflow, Some(id))))
            }
            WorkflowMutation::Delete { workflow_id } => {
                self.record(Call::Delete(workflow_id.to_string()))?;
                let mut state = self.state.lock();
                state
                    .workflows
                    .retain(|_, (_, record)| record.id != workflow_id);
                Ok(None)
            }
        }
    }

    async fn trigger_data_collection_action(
        &self,
        action: DataCollectionAction,
        _workflow_id: &str,
        data_collection_id: &str,
    ) -> depictio_client::Result<()> {
        let tag = self
            .tag_of(data_collection_id)
            .unwrap_or_else(|| data_collection_id.to_string());
        self.record(Call::Action(action, tag.clone()))?;
        if self.failing_actions.contains(&(action, tag)) {
            return Err(server_error(&format!("{} failed", action)));
        }
        Ok(())
    }
}

//! Remote records returned by the catalog service.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::workflow::{DataCollectionConfig, WorkflowDescriptor};

/// A data collection as stored by the catalog.
///
/// Ids are written back under the catalog's own `_id` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteDataCollectionRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub data_collection_tag: String,
    pub config: DataCollectionConfig,
}

/// A workflow as stored by the catalog.
///
/// Only the catalog mutates these; the agent reads them and requests changes.
/// Serializing a record gives back what the catalog sent: `_id` keys, type
/// spellings and unknown fields are all kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteWorkflowRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub engine: String,

    #[serde(default)]
    pub data_collections: Vec<RemoteDataCollectionRecord>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RemoteWorkflowRecord {
    pub fn workflow_tag(&self) -> String {
        format!("{}/{}", self.engine, self.name)
    }

    /// Find a data collection by tag.
    pub fn data_collection(&self, tag: &str) -> Option<&RemoteDataCollectionRecord> {
        self.data_collections
            .iter()
            .find(|dc| dc.data_collection_tag == tag)
    }

    /// Reject records that downstream steps could not target.
    pub fn ensure_identified(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::MissingField {
                field: "id".to_string(),
                context: format!("remote workflow '{}'", self.workflow_tag()),
            });
        }
        if let Some(dc) = self.data_collections.iter().find(|dc| dc.id.trim().is_empty()) {
            return Err(Error::MissingField {
                field: "id".to_string(),
                context: format!(
                    "data collection '{}' of remote workflow '{}'",
                    dc.data_collection_tag,
                    self.workflow_tag()
                ),
            });
        }
        Ok(())
    }
}

/// Result of comparing a declared workflow against its remote counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    #[serde(default = "default_exists")]
    pub exists: bool,
    #[serde(rename = "match")]
    pub matches: bool,
    #[serde(default)]
    pub message: String,
}

fn default_exists() -> bool {
    true
}

impl ComparisonResult {
    /// Answer a comparison locally when one side is absent.
    ///
    /// Returns `None` when both sides are present and the server has to decide.
    /// A missing remote workflow is never a match.
    pub fn short_circuit(
        declared: Option<&WorkflowDescriptor>,
        existing: Option<&RemoteWorkflowRecord>,
    ) -> Option<Self> {
        match (declared, existing) {
            (_, None) => Some(Self::missing_remote()),
            (None, Some(_)) => Some(Self::missing_declared()),
            (Some(_), Some(_)) => None,
        }
    }

    /// Result when the catalog has no such workflow.
    pub fn missing_remote() -> Self {
        Self {
            exists: false,
            matches: false,
            message: "workflow does not exist remotely".to_string(),
        }
    }

    /// Result when there is nothing declared to compare against.
    pub fn missing_declared() -> Self {
        Self {
            exists: true,
            matches: false,
            message: "no declared workflow to compare".to_string(),
        }
    }
}

//! Declared workflows and data collections, as written in a pipeline config.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Data collection type
// ─────────────────────────────────────────────────────────────────────────────

/// What the agent does with a data collection, derived from its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataCollectionKind {
    Tabular,
    MetadataTabular,
    BrowserTrack,
    Other,
}

/// Declared type of a data collection, kept exactly as written.
///
/// The catalog owns the spelling (`Table`, `JBrowse2`, ...), so the raw
/// string is what goes back on the wire. [`DataCollectionType::kind`]
/// classifies it case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataCollectionType(String);

impl DataCollectionType {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The type as declared.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> DataCollectionKind {
        match self.0.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "tabular" | "table" => DataCollectionKind::Tabular,
            "metadata-tabular" | "metadata-table" => DataCollectionKind::MetadataTabular,
            "browser-track" | "jbrowse2" | "jbrowse" => DataCollectionKind::BrowserTrack,
            _ => DataCollectionKind::Other,
        }
    }
}

impl From<&str> for DataCollectionType {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for DataCollectionType {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for DataCollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Data collection
// ─────────────────────────────────────────────────────────────────────────────

/// Type-specific configuration of a data collection.
///
/// Only the fields the agent acts on are typed; everything else (scan
/// patterns, delta table options, track settings) is carried through to the
/// server untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCollectionConfig {
    #[serde(rename = "type")]
    pub data_collection_type: DataCollectionType,

    /// Set to `metadata` for collections that are scanned as metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metatype: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DataCollectionConfig {
    pub fn new(data_collection_type: impl Into<DataCollectionType>) -> Self {
        Self {
            data_collection_type: data_collection_type.into(),
            metatype: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_metatype(mut self, metatype: impl Into<String>) -> Self {
        self.metatype = Some(metatype.into());
        self
    }

    /// Whether files of this collection are scanned with the metadata scanner.
    pub fn is_metadata(&self) -> bool {
        self.metatype
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case("metadata"))
    }
}

/// A data collection declared inside a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCollectionDescriptor {
    /// Unique within the owning workflow.
    pub data_collection_tag: String,
    pub config: DataCollectionConfig,
}

impl DataCollectionDescriptor {
    pub fn new(
        tag: impl Into<String>,
        data_collection_type: impl Into<DataCollectionType>,
    ) -> Self {
        Self {
            data_collection_tag: tag.into(),
            config: DataCollectionConfig::new(data_collection_type),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Workflow
// ─────────────────────────────────────────────────────────────────────────────

/// A workflow declared in the pipeline config.
///
/// Serialized as-is for the create/update request body, nested data
/// collections included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDescriptor {
    pub name: String,
    pub engine: String,

    #[serde(default)]
    pub data_collections: Vec<DataCollectionDescriptor>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WorkflowDescriptor {
    pub fn new(name: impl Into<String>, engine: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            engine: engine.into(),
            data_collections: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_data_collection(mut self, dc: DataCollectionDescriptor) -> Self {
        self.data_collections.push(dc);
        self
    }

    /// Remote identity of the workflow: `{engine}/{name}`.
    pub fn workflow_tag(&self) -> String {
        format!("{}/{}", self.engine, self.name)
    }

    /// Check required fields and tag uniqueness.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::MissingField {
                field: "name".to_string(),
                context: "workflow".to_string(),
            });
        }
        if self.engine.trim().is_empty() {
            return Err(Error::MissingField {
                field: "engine".to_string(),
                context: format!("workflow '{}'", self.name),
            });
        }

        let mut seen = HashSet::new();
        for dc in &self.data_collections {
            if dc.data_collection_tag.trim().is_empty() {
                return Err(Error::MissingField {
                    field: "data_collection_tag".to_string(),
                    context: format!("workflow '{}'", self.workflow_tag()),
                });
            }
            if !seen.insert(dc.data_collection_tag.as_str()) {
                return Err(Error::DuplicateTag {
                    workflow: self.workflow_tag(),
                    tag: dc.data_collection_tag.clone(),
                });
            }
        }
        Ok(())
    }
}

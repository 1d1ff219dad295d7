//! Pipeline configuration: the workflows to register with the catalog.
//!
//! ```yaml
//! workflows:
//!   - name: demo
//!     engine: snakemake
//!     data_location:
//!       structure: sequencing-runs
//!       locations: ["/data/demo"]
//!     data_collections:
//!       - data_collection_tag: samples
//!         config:
//!           type: table
//!           scan:
//!             mode: single
//!             filename: samples.tsv
//! ```

use std::collections::HashSet;
use std::path::Path;

use depictio_types::WorkflowDescriptor;
use serde::{Deserialize, Serialize};

use crate::{expand_path, ConfigError, Result};

/// Root pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub workflows: Vec<WorkflowDescriptor>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PipelineConfig {
    /// Parse from a YAML string.
    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        serde_yaml::from_str(yaml_str).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// Structural checks done before the config is sent anywhere.
    pub fn validate(&self) -> Result<()> {
        if self.workflows.is_empty() {
            return Err(ConfigError::MissingField {
                field: "workflows".to_string(),
                context: "pipeline config".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for workflow in &self.workflows {
            workflow.validate()?;
            let tag = workflow.workflow_tag();
            if !seen.insert(tag.clone()) {
                return Err(ConfigError::DuplicateWorkflow(tag));
            }
        }
        Ok(())
    }
}

/// Load and validate the pipeline config at `path` (`~` is expanded).
pub fn load_pipeline_config(path: &Path) -> Result<PipelineConfig> {
    let path = expand_path(path);
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.display().to_string(),
            hint: "pass the pipeline config with --pipeline-config".to_string(),
        });
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;

    let config = PipelineConfig::from_yaml(&contents)?;
    config.validate()?;
    Ok(config)
}

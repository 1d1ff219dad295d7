//! Configuration for the Depictio CLI agent.
//!
//! Two YAML files drive a run:
//! - the agent config (`~/.depictio/agent.yaml`): API base URL and the user's
//!   access token
//! - the pipeline config: the workflows and data collections to register
//!
//! Both are validated locally before any network call is made.

pub mod agent;
pub mod error;
pub mod paths;
pub mod pipeline;

pub use agent::{load_agent_config, AgentConfig, TokenData, UserAgent, TOKEN_DATETIME_FORMAT};
pub use error::{ConfigError, Result};
pub use paths::{default_agent_config_path, depictio_dir, expand_path};
pub use pipeline::{load_pipeline_config, PipelineConfig};

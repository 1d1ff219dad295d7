//! Shared types for the Depictio CLI agent.
//!
//! Declared workflows come from the pipeline config, remote records come from
//! the catalog service. Both sides are typed here so the client, the config
//! loader and the sync engine agree on one shape.

pub mod action;
pub mod error;
pub mod record;
pub mod session;
pub mod workflow;

pub use action::DataCollectionAction;
pub use error::{Error, Result};
pub use record::{ComparisonResult, RemoteDataCollectionRecord, RemoteWorkflowRecord};
pub use session::AgentSession;
pub use workflow::{
    DataCollectionConfig, DataCollectionDescriptor, DataCollectionKind, DataCollectionType,
    WorkflowDescriptor,
};

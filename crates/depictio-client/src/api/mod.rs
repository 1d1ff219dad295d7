//! API endpoint implementations.

mod cli;
mod data_collections;
mod workflows;

pub use cli::CliApi;
pub use data_collections::DataCollectionsApi;
pub use workflows::{WorkflowMutation, WorkflowsApi};

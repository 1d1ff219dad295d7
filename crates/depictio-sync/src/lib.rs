//! Workflow reconciliation engine for the Depictio CLI agent.
//!
//! For every workflow declared in a pipeline config:
//!
//! 1. [`reconcile`] decides whether the catalog needs a create, an update, or
//!    nothing at all, based on a fetch and a server-side comparison.
//! 2. [`process`] runs the data collection actions for the resulting record:
//!    scan, then materialize (tables) or build a track-set (browser tracks).
//!
//! [`orchestrator::run`] drives both across the whole pipeline, isolating
//! per-workflow failures. Everything talks to the catalog through the
//! [`Catalog`] trait, implemented for [`depictio_client::CatalogClient`].

pub mod catalog;
pub mod error;
pub mod orchestrator;
pub mod process;
pub mod reconcile;

#[cfg(test)]
pub(crate) mod fake;

pub use catalog::Catalog;
pub use error::{Result, SyncError};
pub use orchestrator::{run, SyncOptions, SyncSummary, WorkflowReport, WorkflowStatus};
pub use process::{
    process, DataCollectionReport, ProcessOptions, ScanFailurePolicy, StepReport,
};
pub use reconcile::{reconcile, ReconciliationOutcome};

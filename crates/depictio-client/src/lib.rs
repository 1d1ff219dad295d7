//! HTTP client for the Depictio catalog API.
//!
//! # Example
//!
//! ```no_run
//! use depictio_client::{CatalogClient, Result};
//! use depictio_types::{AgentSession, DataCollectionAction};
//!
//! # async fn example() -> Result<()> {
//! let session = AgentSession::new("http://localhost:8058", "token");
//! let client = CatalogClient::new(&session)?;
//!
//! if let Some(record) = client.workflows().get("demo", "snakemake").await? {
//!     for dc in &record.data_collections {
//!         client
//!             .data_collections()
//!             .trigger(DataCollectionAction::Scan, &record.id, &dc.id)
//!             .await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Cli**: validate the agent config and the pipeline config
//! - **Workflows**: fetch, compare, create, update, delete
//! - **Data collections**: scan, materialize into a delta table, build a track-set

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use api::WorkflowMutation;
pub use client::{CatalogClient, ClientBuilder};
pub use error::{Error, Result};
pub use types::*;

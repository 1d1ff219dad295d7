//! Data collection processing after a workflow has been reconciled.
//!
//! Each data collection of the catalog record is handled on its own:
//!
//! ```text
//! scan / scan_metadata   (only with scan_files)
//!         │
//!         ▼
//! tabular, metadata-tabular ──► materialize
//! browser-track             ──► build_tracks
//! anything else             ──► nothing
//! ```
//!
//! A failing step is recorded on that collection's report and the next
//! collection is processed anyway.

use depictio_types::{
    DataCollectionAction, DataCollectionConfig, DataCollectionKind, DataCollectionType,
    RemoteDataCollectionRecord,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::{Result, SyncError};
use crate::reconcile::ReconciliationOutcome;

/// What to do with a collection whose scan failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanFailurePolicy {
    /// Record the failure and still materialize / build tracks.
    #[default]
    Continue,
    /// Record the failure and skip the type-specific step for that collection.
    SkipPostProcessing,
}

/// Options for data collection processing.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Scan files before the type-specific step.
    pub scan_files: bool,
    /// Only process the collection with this tag.
    pub data_collection_tag: Option<String>,
    pub on_scan_failure: ScanFailurePolicy,
}

/// Result of one action on one data collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub action: DataCollectionAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything that happened to one data collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataCollectionReport {
    pub tag: String,
    pub data_collection_type: String,
    pub steps: Vec<StepReport>,
    /// Set when a failed scan stopped the type-specific step.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skipped_post_processing: bool,
}

impl DataCollectionReport {
    pub fn succeeded(&self) -> bool {
        self.steps.iter().all(StepReport::succeeded)
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|step| !step.succeeded())
    }
}

/// Scan flavour for a collection.
pub fn scan_action(config: &DataCollectionConfig) -> DataCollectionAction {
    if config.is_metadata() {
        DataCollectionAction::ScanMetadata
    } else {
        DataCollectionAction::Scan
    }
}

/// Type-specific step for a collection, if its type has one.
pub fn post_processing_action(
    data_collection_type: &DataCollectionType,
) -> Option<DataCollectionAction> {
    match data_collection_type.kind() {
        DataCollectionKind::Tabular | DataCollectionKind::MetadataTabular => {
            Some(DataCollectionAction::Materialize)
        }
        DataCollectionKind::BrowserTrack => Some(DataCollectionAction::BuildTracks),
        DataCollectionKind::Other => None,
    }
}

/// Run the data collection actions for a reconciled workflow.
///
/// Returns one report per processed collection. Only a rejected credential
/// is returned as an error; every other failure stays on its report.
pub async fn process<C: Catalog + ?Sized>(
    catalog: &C,
    outcome: &ReconciliationOutcome,
    options: &ProcessOptions,
) -> Result<Vec<DataCollectionReport>> {
    let record = outcome.record();
    let selected: Vec<&RemoteDataCollectionRecord> = record
        .data_collections
        .iter()
        .filter(|dc| {
            options
                .data_collection_tag
                .as_deref()
                .is_none_or(|tag| dc.data_collection_tag == tag)
        })
        .collect();

    if let Some(tag) = &options.data_collection_tag
        && selected.is_empty()
    {
        warn!(
            "Workflow {} has no data collection tagged {}",
            record.workflow_tag(),
            tag
        );
    }

    let mut reports = Vec::with_capacity(selected.len());
    for dc in selected {
        reports.push(process_one(catalog, &record.id, dc, options).await?);
    }
    Ok(reports)
}

async fn process_one<C: Catalog + ?Sized>(
    catalog: &C,
    workflow_id: &str,
    dc: &RemoteDataCollectionRecord,
    options: &ProcessOptions,
) -> Result<DataCollectionReport> {
    let mut report = DataCollectionReport {
        tag: dc.data_collection_tag.clone(),
        data_collection_type: dc.config.data_collection_type.to_string(),
        steps: Vec::new(),
        skipped_post_processing: false,
    };

    if options.scan_files {
        let step = run_step(catalog, scan_action(&dc.config), workflow_id, dc).await?;
        let scan_failed = !step.succeeded();
        report.steps.push(step);

        if scan_failed && options.on_scan_failure == ScanFailurePolicy::SkipPostProcessing {
            report.skipped_post_processing = true;
            return Ok(report);
        }
    }

    match post_processing_action(&dc.config.data_collection_type) {
        Some(action) => {
            let step = run_step(catalog, action, workflow_id, dc).await?;
            report.steps.push(step);
        }
        None => debug!(
            "No post-processing for data collection {} of type {}",
            dc.data_collection_tag, dc.config.data_collection_type
        ),
    }

    Ok(report)
}

async fn run_step<C: Catalog + ?Sized>(
    catalog: &C,
    action: DataCollectionAction,
    workflow_id: &str,
    dc: &RemoteDataCollectionRecord,
) -> Result<StepReport> {
    info!("Running {} for data collection {}", action, dc.data_collection_tag);
    match catalog
        .trigger_data_collection_action(action, workflow_id, &dc.id)
        .await
    {
        Ok(()) => Ok(StepReport {
            action,
            error: None,
        }),
        Err(e) if e.is_auth_error() => Err(SyncError::Auth(e.to_string())),
        Err(e) => {
            warn!(
                "{} failed for data collection {}: {}",
                action, dc.data_collection_tag, e
            );
            Ok(StepReport {
                action,
                error: Some(e.to_string()),
            })
        }
    }
}

//! Server-side actions that can be triggered for a data collection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A post-processing action run by the catalog for one data collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataCollectionAction {
    Scan,
    ScanMetadata,
    Materialize,
    BuildTracks,
}

impl DataCollectionAction {
    /// Endpoint prefix; the workflow and data collection ids are appended.
    pub fn path_prefix(self) -> &'static str {
        match self {
            DataCollectionAction::Scan => "files/scan",
            DataCollectionAction::ScanMetadata => "files/scan_metadata",
            DataCollectionAction::Materialize => "deltatables/create",
            DataCollectionAction::BuildTracks => "jbrowse/create_trackset",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DataCollectionAction::Scan => "scan",
            DataCollectionAction::ScanMetadata => "scan_metadata",
            DataCollectionAction::Materialize => "materialize",
            DataCollectionAction::BuildTracks => "build_tracks",
        }
    }

    pub fn is_scan(self) -> bool {
        matches!(
            self,
            DataCollectionAction::Scan | DataCollectionAction::ScanMetadata
        )
    }
}

impl fmt::Display for DataCollectionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

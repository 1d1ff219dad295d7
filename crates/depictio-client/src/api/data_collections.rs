//! Data collection actions: scan, materialize, track-set.

use depictio_types::DataCollectionAction;

use crate::client::CatalogClient;
use crate::error::Result;

/// Data collection actions API client.
pub struct DataCollectionsApi {
    client: CatalogClient,
}

impl DataCollectionsApi {
    pub(crate) fn new(client: CatalogClient) -> Self {
        Self { client }
    }

    /// Run an action for one data collection and wait for the server to finish.
    ///
    /// Uses the long action timeout. Any 2xx is success.
    pub async fn trigger(
        &self,
        action: DataCollectionAction,
        workflow_id: &str,
        data_collection_id: &str,
    ) -> Result<()> {
        self.client
            .post_action(&format!(
                "{}/{}/{}",
                action.path_prefix(),
                workflow_id,
                data_collection_id
            ))
            .await
    }
}

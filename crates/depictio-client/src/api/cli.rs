//! Config validation API used during login and before a sync.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::CatalogClient;
use crate::error::{Error, Result};
use crate::types::{AgentValidation, PipelineValidation, ValidatePipelineRequest};

/// Config validation API client.
pub struct CliApi {
    client: CatalogClient,
}

impl CliApi {
    pub(crate) fn new(client: CatalogClient) -> Self {
        Self { client }
    }

    /// Ask the server whether the agent config and its token are accepted.
    ///
    /// A rejected credential, whether by status or by a `success: false`
    /// answer, is an [`Error::Auth`].
    pub async fn validate_agent_config<C>(&self, agent_config: &C) -> Result<AgentValidation>
    where
        C: Serialize + ?Sized,
    {
        let validation: AgentValidation = self
            .client
            .post("cli/validate_agent_config", agent_config)
            .await?;
        if !validation.success {
            return Err(Error::Auth(validation.message));
        }
        Ok(validation)
    }

    /// Have the server validate a pipeline config.
    ///
    /// Returns the server's answer as-is; callers decide what to do with
    /// `success: false`.
    pub async fn validate_pipeline_config<C>(&self, config: &C) -> Result<PipelineValidation<C>>
    where
        C: Serialize + DeserializeOwned,
    {
        self.client
            .post(
                "cli/validate_pipeline_config",
                &ValidatePipelineRequest { config },
            )
            .await
    }
}

//! Agent configuration: where the catalog lives and who is calling it.
//!
//! ```yaml
//! api_base_url: http://localhost:8058
//! user:
//!   email: jane@example.com
//!   is_admin: false
//!   token:
//!     name: laptop
//!     access_token: eyJhbGciOi...
//!     expire_datetime: "2030-01-01 00:00:00"
//! ```

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use depictio_types::AgentSession;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{expand_path, ConfigError, Result};

/// Format of `token.expire_datetime`.
pub const TOKEN_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NOT_FOUND_HINT: &str = "create a user in Depictio and generate a token for the agent";

/// Root agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Base URL of the Depictio API, e.g. `http://localhost:8058`.
    pub api_base_url: String,

    pub user: UserAgent,

    /// Timeout for metadata calls (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Timeout for scan / materialize / track-set calls (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_timeout_secs: Option<u64>,
}

/// The user the agent acts on behalf of.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAgent {
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    pub token: TokenData,
}

/// Access token issued by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenData {
    #[serde(default)]
    pub name: String,
    pub access_token: String,
    /// `YYYY-MM-DD HH:MM:SS`, local time.
    pub expire_datetime: String,
}

impl TokenData {
    /// Parse the expiry timestamp.
    pub fn expires_at(&self) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.expire_datetime, TOKEN_DATETIME_FORMAT).map_err(|e| {
            ConfigError::InvalidField {
                field: "user.token.expire_datetime".to_string(),
                reason: format!("{} (expected YYYY-MM-DD HH:MM:SS)", e),
            }
        })
    }
}

impl AgentConfig {
    /// Parse from a YAML string.
    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        serde_yaml::from_str(yaml_str).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// Serialize to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// Validate against the current local time.
    pub fn validate(&self) -> Result<()> {
        self.validate_at(Local::now().naive_local())
    }

    /// Validate against a given point in time.
    pub fn validate_at(&self, now: NaiveDateTime) -> Result<()> {
        let url = Url::parse(&self.api_base_url).map_err(|e| ConfigError::InvalidField {
            field: "api_base_url".to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ConfigError::InvalidField {
                field: "api_base_url".to_string(),
                reason: "expected an http:// or https:// URL with a host".to_string(),
            });
        }

        if self.user.email.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "user.email".to_string(),
                context: "agent config".to_string(),
            });
        }

        let token = &self.user.token;
        if token.access_token.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "user.token.access_token".to_string(),
                context: "agent config".to_string(),
            });
        }
        if token.expires_at()? < now {
            return Err(ConfigError::TokenExpired {
                name: token.name.clone(),
                expired_at: token.expire_datetime.clone(),
            });
        }
        Ok(())
    }

    /// Build the session used for every catalog call.
    pub fn session(&self) -> AgentSession {
        AgentSession::new(&self.api_base_url, &self.user.token.access_token)
    }

    /// Copy with the access token masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.user.token.access_token = "***".to_string();
        copy
    }
}

/// Load and validate the agent config at `path` (`~` is expanded).
pub fn load_agent_config(path: &Path) -> Result<AgentConfig> {
    let path = expand_path(path);
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.display().to_string(),
            hint: NOT_FOUND_HINT.to_string(),
        });
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;

    let config = AgentConfig::from_yaml(&contents)?;
    config.validate()?;
    Ok(config)
}

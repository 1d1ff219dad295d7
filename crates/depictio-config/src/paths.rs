//! Well-known locations for agent files.
//!
//! # Environment Variables
//!
//! - `DEPICTIO_CONFIG_DIR` - Override the `~/.depictio` directory

use std::path::{Path, PathBuf};

const CONFIG_DIR_ENV: &str = "DEPICTIO_CONFIG_DIR";

const AGENT_CONFIG_FILE: &str = "agent.yaml";

/// Directory holding the agent config and logs.
pub fn depictio_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::home_dir().map(|home| home.join(".depictio"))
}

/// Default agent config path (`~/.depictio/agent.yaml`).
pub fn default_agent_config_path() -> PathBuf {
    depictio_dir()
        .unwrap_or_else(|| PathBuf::from(".depictio"))
        .join(AGENT_CONFIG_FILE)
}

/// Expand ~ to home directory in paths.
pub fn expand_path(path: &Path) -> PathBuf {
    if let Some(s) = path.to_str()
        && let Some(rest) = s.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

//! Authenticated session shared by every catalog call in a run.

use std::fmt;

/// Base URL plus bearer credential.
///
/// Built once after login and never mutated; clone it or share it behind an
/// `Arc` when several tasks need it.
#[derive(Clone, PartialEq, Eq)]
pub struct AgentSession {
    base_url: String,
    access_token: String,
}

impl AgentSession {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for AgentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentSession")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

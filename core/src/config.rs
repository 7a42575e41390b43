//! Long-lived client configuration.
//!
//! # Design
//! A `ClientConfig` is built once, handed to `RequestClient`, and only read
//! afterwards. `from_env` covers the usual deployment path; `from_lookup`
//! lets tests supply variables without mutating the process environment.

use serde::Deserialize;

use crate::constants::{API_URL, GOV_API_URL};
use crate::error::ApiError;

pub const TOKEN_VAR: &str = "SMARTSHEET_ACCESS_TOKEN";
pub const BASE_URL_VAR: &str = "SMARTSHEET_BASE_URL";
pub const APP_USER_AGENT_VAR: &str = "SMARTSHEET_APP_USER_AGENT";
pub const ASSUME_USER_VAR: &str = "SMARTSHEET_ASSUME_USER";

/// Settings folded into every request a client composes.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub token: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub app_user_agent: Option<String>,
    /// Identity sent in `Assume-User` for admin impersonation.
    #[serde(default)]
    pub assume_user: Option<String>,
}

fn default_base_url() -> String {
    API_URL.to_string()
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: default_base_url(),
            app_user_agent: None,
            assume_user: None,
        }
    }

    /// Configuration pointed at the government cloud.
    pub fn gov(token: impl Into<String>) -> Self {
        Self::new(token).with_base_url(GOV_API_URL)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_app_user_agent(mut self, app: impl Into<String>) -> Self {
        self.app_user_agent = Some(app.into());
        self
    }

    pub fn with_assume_user(mut self, identity: impl Into<String>) -> Self {
        self.assume_user = Some(identity.into());
        self
    }

    /// Read `SMARTSHEET_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let token = get(TOKEN_VAR).ok_or_else(|| ApiError::MissingConfig(format!("{TOKEN_VAR} is not set")))?;
        let mut config = Self::new(token);
        if let Some(base_url) = get(BASE_URL_VAR) {
            config.base_url = base_url;
        }
        config.app_user_agent = get(APP_USER_AGENT_VAR);
        config.assume_user = get(ASSUME_USER_VAR);
        Ok(config)
    }
}

// Keeps the token out of debug output.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("app_user_agent", &self.app_user_agent)
            .field("assume_user", &self.assume_user)
            .finish()
    }
}

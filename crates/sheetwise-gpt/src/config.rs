//! Completion endpoint configuration.

use std::fmt;
use std::time::Duration;

use crate::error::{GptError, Result};

/// Default local chat endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/chat";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const ENV_ENDPOINT: &str = "SHEETWISE_GPT_ENDPOINT";
pub const ENV_MODEL: &str = "SHEETWISE_GPT_MODEL";
pub const ENV_API_KEY: &str = "SHEETWISE_GPT_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "SHEETWISE_GPT_TIMEOUT_SECS";

/// Configuration for the HTTP completion client.
#[derive(Clone, PartialEq)]
pub struct GptConfig {
    /// Chat endpoint receiving `POST {"messages": [...]}`. Default: local `/api/chat`.
    pub endpoint: String,
    /// Model name sent with each request, if the endpoint needs one.
    pub model: Option<String>,
    /// Bearer token, if the endpoint needs one.
    pub api_key: Option<String>,
    /// Per-request timeout. Default: 60 seconds.
    pub timeout: Duration,
}

impl Default for GptConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: None,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for GptConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GptConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GptConfig {
    /// Defaults overridden by `SHEETWISE_GPT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.trim().is_empty()) {
            config.endpoint = endpoint;
        }
        config.model = lookup(ENV_MODEL).filter(|v| !v.trim().is_empty());
        config.api_key = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty());

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                GptError::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{secs}'"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

//! Configuration for the Freispace client.

use crate::error::{ClientError, ClientResult};
use url::Url;

const BASE_URL_DEV: &str = "http://api.mcp.ai.app.freispace.io";
const BASE_URL_STAGING: &str = "https://mcp-api.ai.staging.cloud.freispace.com";
const BASE_URL_DEMO: &str = "https://mcp-api.ai.demo.freispace.com";
const BASE_URL_PROD: &str = "https://mcp-api.ai.freispace.com";

/// Deployment stage selecting which backend host to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Development,
    Staging,
    Demo,
    Production,
}

impl Stage {
    /// Parse a stage name. Anything unrecognized falls back to production.
    pub fn parse(value: &str) -> Self {
        match value {
            "development" => Self::Development,
            "staging" => Self::Staging,
            "demo" => Self::Demo,
            _ => Self::Production,
        }
    }

    /// Read the stage from the `STAGE` environment variable.
    pub fn from_env() -> Self {
        match std::env::var("STAGE") {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::Production,
        }
    }

    /// The fixed base URL for this stage.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Development => BASE_URL_DEV,
            Self::Staging => BASE_URL_STAGING,
            Self::Demo => BASE_URL_DEMO,
            Self::Production => BASE_URL_PROD,
        }
    }
}

/// Configuration for the Freispace client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Freispace backend.
    pub base_url: Url,
    /// API key sent as `x-api-key`. Absent means requests go out
    /// unauthenticated and the backend decides whether to reject them.
    pub api_key: Option<String>,
}

impl ClientConfig {
    /// Create a configuration with the given base URL and no API key.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Resolve configuration from the process environment.
    ///
    /// Base URL is selected by `STAGE` (development/staging/demo/production,
    /// default production). The API key is the first non-empty of
    /// `FREISPACE_API_KEY` and `API_KEY`.
    pub fn from_env() -> ClientResult<Self> {
        Self::resolve(None)
    }

    /// Resolve configuration, preferring an explicitly supplied API key over
    /// the environment variables.
    pub fn resolve(api_key: Option<String>) -> ClientResult<Self> {
        let stage = Stage::from_env();
        let base_url = Url::parse(stage.base_url())
            .map_err(|e| ClientError::Config(format!("invalid base URL: {}", e)))?;

        let api_key = api_key
            .filter(|k| !k.is_empty())
            .or_else(|| env_non_empty("FREISPACE_API_KEY"))
            .or_else(|| env_non_empty("API_KEY"));

        Ok(Self { base_url, api_key })
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

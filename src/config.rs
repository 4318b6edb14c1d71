//! Settings file
//!
//! Optional YAML file supplying defaults for the global options. Values given
//! on the command line or through the environment take precedence.
//!
//! ```yaml
//! format: json,flatten
//! output: usage.jsonl
//! quiet: false
//! endpoint: https://management.azure.com
//! http:
//!   timeout_secs: 60
//!   max_retries: 3
//!   initial_backoff_ms: 500
//! ```

use crate::error::{Error, Result};
use crate::http::{ArmClientConfig, DEFAULT_ENDPOINT};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Settings
// ============================================================================

/// Settings loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Output format tokens, e.g. `json,pretty`
    #[serde(default)]
    pub format: Option<String>,

    /// Output file path (`-` for stdout)
    #[serde(default)]
    pub output: Option<String>,

    /// Suppress progress output
    #[serde(default)]
    pub quiet: Option<bool>,

    /// Resource Manager endpoint
    #[serde(default)]
    pub endpoint: Option<String>,

    /// HTTP client tuning
    #[serde(default)]
    pub http: HttpSettings,
}

impl Settings {
    /// Parse settings from YAML text
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load settings from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read settings {}: {e}", path.display()))
        })?;
        Self::from_yaml(&text)
    }

    /// ARM client configuration, with `token` and an endpoint override
    pub fn client_config(&self, endpoint: Option<&str>, token: Option<&str>) -> ArmClientConfig {
        let endpoint = endpoint
            .or(self.endpoint.as_deref())
            .unwrap_or(DEFAULT_ENDPOINT);
        let mut builder = ArmClientConfig::builder().endpoint(endpoint);
        if let Some(token) = token {
            builder = builder.token(token);
        }
        let defaults = ArmClientConfig::default();
        builder
            .timeout(
                self.http
                    .timeout_secs
                    .map_or(defaults.timeout, Duration::from_secs),
            )
            .max_retries(self.http.max_retries.unwrap_or(defaults.max_retries))
            .backoff(
                self.http
                    .initial_backoff_ms
                    .map_or(defaults.initial_backoff, Duration::from_millis),
                defaults.max_backoff,
            )
            .build()
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP client tuning
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Retries for throttled and transient failures
    #[serde(default)]
    pub max_retries: Option<u32>,

    /// First backoff delay in milliseconds
    #[serde(default)]
    pub initial_backoff_ms: Option<u64>,
}

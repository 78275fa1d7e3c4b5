//! Text generation model configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// External language model configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ModelConfig {
    /// Model identifier passed to the generation service
    #[serde(default = "default_name")]
    pub name: String,

    /// Full URL of the generate endpoint
    #[serde(default = "default_url")]
    pub url: String,

    /// Bound on a single generation call, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ModelConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate model configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("MODEL__NAME"));
        }

        match reqwest::Url::parse(&self.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(ValidationError::InvalidModelUrl),
        }

        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }

        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            url: default_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_name() -> String {
    "mistral".to_string()
}

fn default_url() -> String {
    "http://localhost:11434/api/generate".to_string()
}

fn default_timeout() -> u64 {
    60
}

//! Client configuration
//!
//! A [`ClientConfig`] is bound once when a client is built and only read
//! afterwards. It can be assembled in code, loaded from a JSON file, or read
//! from `KUSHKI_*` environment variables.

use crate::types::Environment;
use crate::{KushkiError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default currency when none is configured
pub const DEFAULT_CURRENCY: &str = "USD";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a [`crate::KushkiClient`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Public merchant id, sent with every request
    pub public_merchant_id: String,
    /// Currency code sent with every request
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Environment selecting the API host
    #[serde(default)]
    pub environment: Environment,
    /// Request timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Base URL overriding the environment host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl ClientConfig {
    /// Create a new client config
    pub fn new(
        public_merchant_id: impl Into<String>,
        currency: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            public_merchant_id: public_merchant_id.into(),
            currency: currency.into(),
            environment,
            timeout_ms: None,
            base_url: None,
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = serde_json::from_str(&content)?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let public_merchant_id = std::env::var("KUSHKI_PUBLIC_MERCHANT_ID")
            .map_err(|_| KushkiError::config("KUSHKI_PUBLIC_MERCHANT_ID is required"))?;

        let mut config = Self::new(public_merchant_id, DEFAULT_CURRENCY, Environment::Testing);

        if let Ok(currency) = std::env::var("KUSHKI_CURRENCY") {
            config.currency = currency;
        }

        if let Ok(environment) = std::env::var("KUSHKI_ENVIRONMENT") {
            config.environment = environment.parse()?;
        }

        if let Ok(timeout) = std::env::var("KUSHKI_TIMEOUT_MS") {
            let millis = timeout
                .parse::<u64>()
                .map_err(|e| KushkiError::config(format!("Invalid KUSHKI_TIMEOUT_MS: {}", e)))?;
            config.timeout_ms = Some(millis);
        }

        if let Ok(base_url) = std::env::var("KUSHKI_BASE_URL") {
            config.base_url = Some(base_url);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.public_merchant_id.trim().is_empty() {
            return Err(KushkiError::config("Public merchant id cannot be empty"));
        }

        if self.currency.trim().is_empty() {
            return Err(KushkiError::config("Currency cannot be empty"));
        }

        if self.timeout_ms == Some(0) {
            return Err(KushkiError::config("Timeout must be greater than zero"));
        }

        if let Some(base_url) = &self.base_url {
            let parsed = url::Url::parse(base_url)
                .map_err(|e| KushkiError::config(format!("Invalid base URL: {}", e)))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(KushkiError::config(
                    "Base URL must start with http:// or https://",
                ));
            }
        }

        Ok(())
    }

    /// Set the request timeout, at millisecond precision
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Override the environment host with an explicit base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Request timeout, falling back to [`DEFAULT_TIMEOUT`]
    pub fn timeout(&self) -> Duration {
        self.timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Base URL requests are sent to, without a trailing slash
    pub fn resolved_base_url(&self) -> String {
        match &self.base_url {
            Some(base_url) => base_url.trim_end_matches('/').to_string(),
            None => self.environment.base_url(),
        }
    }
}

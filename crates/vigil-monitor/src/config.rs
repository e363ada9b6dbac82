//! Monitor configuration.
//!
//! Configuration for the vigil monitor, loaded once at startup:
//! - The set of error signatures to watch
//! - Cycle period and lookback window
//! - Target index pattern and result cap
//! - Store connection settings
//! - Alert sink settings

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vigil_alerts::WebhookSinkConfig;
use vigil_store::{IndexPattern, MatchStrategy};

use crate::error::MonitorError;

/// Store connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSection {
    /// Base URL of the search store.
    pub url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_store_timeout_secs")]
    pub timeout_secs: u64,
    /// The document field holding the event timestamp.
    #[serde(default = "default_timestamp_field")]
    pub timestamp_field: String,
    /// How signatures are matched against document fields.
    #[serde(default)]
    pub match_strategy: MatchStrategy,
}

fn default_timestamp_field() -> String {
    "@timestamp".to_string()
}

const fn default_store_timeout_secs() -> u64 {
    10
}

/// Log sink settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSinkSection {
    /// Whether events are also written to the process log.
    pub enabled: bool,
}

impl Default for LogSinkSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Main monitor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Error signatures to watch, one detection flow per signature per
    /// cycle.
    pub signatures: Vec<String>,
    /// Seconds between detection cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Lookback window length in seconds.
    #[serde(default = "default_lookback_secs")]
    pub lookback_secs: u64,
    /// Index name or pattern to query, optionally date-templated.
    pub index_pattern: IndexPattern,
    /// Maximum hits returned per search; the store's total is unaffected.
    #[serde(default = "default_max_hits")]
    pub max_hits: usize,
    /// Store connection settings.
    pub store: StoreSection,
    /// Webhook sinks to register at startup.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub webhooks: Vec<WebhookSinkConfig>,
    /// Log sink settings.
    #[serde(default)]
    pub log_sink: LogSinkSection,
}

const fn default_interval_secs() -> u64 {
    60
}

const fn default_lookback_secs() -> u64 {
    60
}

const fn default_max_hits() -> usize {
    500
}

impl MonitorConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MonitorError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            MonitorError::Config(format!(
                "failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, MonitorError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| MonitorError::Config(format!("invalid TOML: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.signatures.is_empty() {
            return Err(MonitorError::Config(
                "at least one signature is required".to_string(),
            ));
        }

        if self.signatures.iter().any(String::is_empty) {
            return Err(MonitorError::Config(
                "signatures cannot be empty strings".to_string(),
            ));
        }

        if self.interval_secs == 0 {
            return Err(MonitorError::Config(
                "interval_secs must be greater than zero".to_string(),
            ));
        }

        if self.lookback_secs == 0 {
            return Err(MonitorError::Config(
                "lookback_secs must be greater than zero".to_string(),
            ));
        }

        if self.index_pattern.as_str().is_empty() {
            return Err(MonitorError::Config(
                "index_pattern cannot be empty".to_string(),
            ));
        }

        self.index_pattern
            .validate()
            .map_err(|e| MonitorError::Config(e.to_string()))?;

        if self.max_hits == 0 {
            return Err(MonitorError::Config(
                "max_hits must be greater than zero".to_string(),
            ));
        }

        if self.store.url.is_empty() {
            return Err(MonitorError::Config(
                "store url cannot be empty".to_string(),
            ));
        }

        if self.store.timeout_secs == 0 {
            return Err(MonitorError::Config(
                "store timeout_secs must be greater than zero".to_string(),
            ));
        }

        for webhook in &self.webhooks {
            if webhook.timeout_secs == 0 {
                return Err(MonitorError::Config(format!(
                    "webhook '{}' timeout_secs must be greater than zero",
                    webhook.name
                )));
            }
        }

        Ok(())
    }

    /// The cycle period.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// The lookback window length.
    #[must_use]
    pub fn lookback(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.lookback_secs as i64)
    }

    /// A sample configuration, used by `vigild init-config`.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            signatures: vec!["transactionError".to_string()],
            interval_secs: default_interval_secs(),
            lookback_secs: default_lookback_secs(),
            index_pattern: IndexPattern::new("app-logs-%Y.%m.%d"),
            max_hits: default_max_hits(),
            store: StoreSection {
                url: "http://127.0.0.1:9200".to_string(),
                timeout_secs: default_store_timeout_secs(),
                timestamp_field: default_timestamp_field(),
                match_strategy: MatchStrategy::default(),
            },
            webhooks: Vec::new(),
            log_sink: LogSinkSection::default(),
        }
    }

    /// Serialize this configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, MonitorError> {
        toml::to_string_pretty(self).map_err(|e| MonitorError::Config(e.to_string()))
    }
}

//! Error types for the vigil-alerts crate.

use thiserror::Error;

/// Errors that can occur while building or delivering alerts.
#[derive(Debug, Error)]
pub enum AlertError {
    /// Invalid sink configuration.
    #[error("invalid sink configuration: {reason}")]
    InvalidSink {
        /// Why the configuration is invalid.
        reason: String,
    },

    /// Delivery to a sink failed.
    ///
    /// Always non-fatal: the dispatcher logs the failure and carries on
    /// with the remaining sinks.
    #[error("delivery failed: {reason}")]
    Delivery {
        /// Why delivery failed.
        reason: String,
    },

    /// Serialization of an alert payload failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AlertError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for AlertError {
    fn from(err: reqwest::Error) -> Self {
        Self::Delivery {
            reason: err.to_string(),
        }
    }
}

/// Result type for alert operations.
pub type Result<T> = std::result::Result<T, AlertError>;

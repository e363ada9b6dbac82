//! Error types for the vigil-store crate.

use thiserror::Error;

/// Errors that can occur while talking to the log store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or the request failed in transit.
    #[error("store request failed: {0}")]
    Connection(#[from] reqwest::Error),

    /// The store answered with a non-success HTTP status.
    #[error("store returned status {status}")]
    Status {
        /// The HTTP status code returned by the store.
        status: u16,
    },

    /// The store's response body could not be decoded.
    #[error("failed to decode store response: {reason}")]
    Decode {
        /// Why decoding failed.
        reason: String,
    },

    /// The startup connectivity probe failed.
    #[error("store probe failed: {reason}")]
    Probe {
        /// Why the probe failed.
        reason: String,
    },

    /// Invalid client configuration.
    #[error("invalid store configuration: {reason}")]
    Config {
        /// Why the configuration is invalid.
        reason: String,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_status() {
        let err = StoreError::Status { status: 503 };
        assert_eq!(err.to_string(), "store returned status 503");
    }

    #[test]
    fn error_display_decode() {
        let err = StoreError::Decode {
            reason: "missing hits".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to decode store response: missing hits"
        );
    }

    #[test]
    fn error_display_probe() {
        let err = StoreError::Probe {
            reason: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "store probe failed: connection refused");
    }

    #[test]
    fn error_display_config() {
        let err = StoreError::Config {
            reason: "empty url".to_string(),
        };
        assert_eq!(err.to_string(), "invalid store configuration: empty url");
    }
}

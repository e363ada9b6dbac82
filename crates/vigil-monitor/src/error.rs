//! Error types for the vigil-monitor crate.

use thiserror::Error;

/// Errors that can occur while running the monitor.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A store operation failed.
    ///
    /// During a cycle this is cycle-local: the failing signature's flow
    /// logs it and other signatures proceed. At startup (the connectivity
    /// probe) it is fatal.
    #[error("store error: {0}")]
    Store(#[from] vigil_store::StoreError),

    /// A sink failed during construction.
    #[error("sink error: {0}")]
    Sink(#[from] vigil_alerts::AlertError),
}

/// Result type for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

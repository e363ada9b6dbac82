//! # vigil-monitor
//!
//! Detection cycles and scheduling for the vigil error monitor.
//!
//! This crate wires the store boundary and alert sinks into the periodic
//! detection pipeline:
//!
//! - [`MonitorConfig`] — Startup configuration (signatures, cadence, window,
//!   index, store, sinks)
//! - [`Detector`] — One signature's query → reduce → dispatch flow
//! - [`Scheduler`] — Fixed-cadence cycles with decoupled, overlappable flows
//!
//! The `vigild` binary in this crate performs bootstrap: tracing init,
//! config load, the startup store probe, sink registration, and the
//! shutdown wait.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod detector;
pub mod error;
pub mod scheduler;

// Re-export main types
pub use config::{LogSinkSection, MonitorConfig, StoreSection};
pub use detector::Detector;
pub use error::{MonitorError, Result};
pub use scheduler::{CycleSummary, Scheduler};

use std::sync::Arc;

use vigil_alerts::{AlertSink, LogSink, WebhookSink};
use vigil_store::QueryBuilder;

/// Builds the fixed sink list from configuration.
///
/// Sinks are registered once here and never mutated at runtime.
///
/// # Errors
///
/// Returns an error if any webhook sink is misconfigured.
pub fn build_sinks(config: &MonitorConfig) -> Result<Vec<Arc<dyn AlertSink>>> {
    let mut sinks: Vec<Arc<dyn AlertSink>> = Vec::new();

    if config.log_sink.enabled {
        sinks.push(Arc::new(LogSink::default()));
    }

    for webhook in &config.webhooks {
        sinks.push(Arc::new(WebhookSink::new(webhook.clone())?));
    }

    Ok(sinks)
}

/// Builds a detector from configuration and an already-probed store.
#[must_use]
pub fn build_detector(
    config: &MonitorConfig,
    store: Arc<dyn vigil_store::LogSearch>,
    sinks: Vec<Arc<dyn AlertSink>>,
) -> Detector {
    let query = QueryBuilder::new(
        config.store.timestamp_field.clone(),
        config.store.match_strategy.clone(),
    );

    Detector::new(
        store,
        sinks,
        query,
        config.index_pattern.clone(),
        config.lookback(),
        config.max_hits,
    )
}

//! # vigil-alerts
//!
//! Error events, alert sinks, and fan-out dispatch for the vigil error
//! monitor.
//!
//! This crate provides:
//!
//! - [`ErrorEvent`] — The unit passed to alert sinks, reduced from store hits
//! - [`AlertSink`] — The delivery capability implemented by concrete sinks
//! - [`WebhookSink`] / [`LogSink`] — Concrete sink implementations
//! - [`dispatch`] — Concurrent fan-out of one event to every sink
//!
//! ## Example
//!
//! ```rust
//! use vigil_alerts::ErrorEvent;
//! use vigil_store::LogDocument;
//!
//! let hits = vec![LogDocument::new("d1"), LogDocument::new("d2")];
//! let event = ErrorEvent::reduce("10404", 3, hits);
//!
//! assert_eq!(event.total_matches, 3);
//! assert_eq!(event.matched_ids, ["d1", "d2"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod dispatcher;
pub mod error;
pub mod event;
pub mod sinks;

// Re-export main types
pub use dispatcher::{dispatch, DispatchSummary};
pub use error::{AlertError, Result};
pub use event::ErrorEvent;
pub use sinks::{AlertSink, LogSink, SinkOutcome, WebhookSink, WebhookSinkConfig};

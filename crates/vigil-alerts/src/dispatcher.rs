//! Concurrent fan-out of one event to every registered sink.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::event::ErrorEvent;
use crate::sinks::AlertSink;

/// Aggregate result of one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Number of sinks that accepted the event.
    pub delivered: usize,
    /// Number of sinks that failed to accept the event.
    pub failed: usize,
}

impl DispatchSummary {
    /// Returns true if every sink accepted the event.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Delivers one event to every sink concurrently.
///
/// Sinks execute independently: no ordering, no retry, and no cross-sink
/// error propagation. A failed delivery is logged and counted; the next
/// detection cycle re-triggers naturally if the condition still holds.
pub async fn dispatch(event: &ErrorEvent, sinks: &[Arc<dyn AlertSink>]) -> DispatchSummary {
    let sends = sinks.iter().map(|sink| {
        let sink = Arc::clone(sink);
        async move {
            let outcome = sink.send(event).await;
            (sink, outcome)
        }
    });

    let mut summary = DispatchSummary::default();
    for (sink, outcome) in join_all(sends).await {
        match outcome {
            Ok(outcome) if outcome.success => {
                debug!(sink = %outcome.sink, signature = %event.signature, "event delivered");
                summary.delivered += 1;
            }
            Ok(outcome) => {
                warn!(
                    sink = %outcome.sink,
                    signature = %event.signature,
                    message = ?outcome.message,
                    "delivery rejected"
                );
                summary.failed += 1;
            }
            Err(e) => {
                warn!(
                    sink = %sink.name(),
                    signature = %event.signature,
                    error = %e,
                    "delivery error"
                );
                summary.failed += 1;
            }
        }
    }

    summary
}

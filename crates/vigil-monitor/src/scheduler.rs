//! Fixed-cadence scheduling of detection cycles.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::detector::Detector;

/// Aggregate result of one cycle, for observability and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    /// Signatures that produced an event this cycle.
    pub detections: usize,
    /// Sink deliveries that succeeded, across all events.
    pub delivered: usize,
    /// Sink deliveries that failed, across all events.
    pub failed_deliveries: usize,
    /// Signatures whose search failed this cycle.
    pub search_failures: usize,
}

/// Drives detection cycles on a fixed period.
///
/// Each tick starts one cycle; within a cycle every signature runs as an
/// independent concurrent flow. A cycle that outlives its period overlaps
/// the next one: there is no mutual exclusion, no skip-if-busy logic, and
/// no queueing of pending ticks.
#[derive(Debug)]
pub struct Scheduler {
    detector: Arc<Detector>,
    signatures: Vec<String>,
    period: Duration,
}

impl Scheduler {
    /// Creates a scheduler over the given detector and signature set.
    #[must_use]
    pub fn new(detector: Arc<Detector>, signatures: Vec<String>, period: Duration) -> Self {
        Self {
            detector,
            signatures,
            period,
        }
    }

    /// The configured cycle period.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Runs one cycle anchored at `now`, awaiting every signature's flow.
    ///
    /// This is the synchronization point used by tests and by per-cycle
    /// logging; the production loop in [`Scheduler::run`] spawns cycles
    /// without waiting on them.
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> CycleSummary {
        let flows = self.signatures.iter().map(|signature| {
            let detector = Arc::clone(&self.detector);
            async move { (signature.as_str(), detector.detect(signature, now).await) }
        });

        let mut summary = CycleSummary::default();
        for (signature, outcome) in join_all(flows).await {
            match outcome {
                Ok(Some(dispatched)) => {
                    summary.detections += 1;
                    summary.delivered += dispatched.delivered;
                    summary.failed_deliveries += dispatched.failed;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(signature = %signature, error = %e, "detection failed");
                    summary.search_failures += 1;
                }
            }
        }

        summary
    }

    /// Runs forever, starting one cycle per tick.
    ///
    /// Cycles are spawned fire-and-forget so a slow store or sink never
    /// delays the next tick. The loop only ends with the process; shutdown
    /// abandons in-flight flows without draining them.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let scheduler = Arc::clone(&self);
            tokio::spawn(async move {
                let summary = scheduler.run_cycle(Utc::now()).await;
                debug!(
                    detections = summary.detections,
                    delivered = summary.delivered,
                    failed = summary.failed_deliveries,
                    search_failures = summary.search_failures,
                    "cycle complete"
                );
            });
        }
    }
}

//! One signature's detection flow for one cycle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use vigil_alerts::{dispatch, AlertSink, DispatchSummary, ErrorEvent};
use vigil_store::{IndexPattern, LogSearch, QueryBuilder, TimeWindow};

use crate::error::Result;

/// Runs independent detection flows: build a time-scoped query, execute it,
/// and fan matches out to the registered sinks.
///
/// The store client and sink list are shared read-only across all
/// concurrent flows; the detector holds no mutable state.
pub struct Detector {
    store: Arc<dyn LogSearch>,
    sinks: Vec<Arc<dyn AlertSink>>,
    query: QueryBuilder,
    index: IndexPattern,
    lookback: chrono::Duration,
    max_hits: usize,
}

impl Detector {
    /// Creates a detector over the given store and sink list.
    #[must_use]
    pub fn new(
        store: Arc<dyn LogSearch>,
        sinks: Vec<Arc<dyn AlertSink>>,
        query: QueryBuilder,
        index: IndexPattern,
        lookback: chrono::Duration,
        max_hits: usize,
    ) -> Self {
        Self {
            store,
            sinks,
            query,
            index,
            lookback,
            max_hits,
        }
    }

    /// Number of registered sinks.
    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Runs one signature's flow for the cycle anchored at `now`.
    ///
    /// Returns `Ok(None)` when the store reported zero matches (no event is
    /// constructed and no sink is invoked), `Ok(Some(summary))` after a
    /// dispatch, and `Err` when the search itself failed. Search failures
    /// are cycle-local; the caller logs them and other signatures proceed.
    pub async fn detect(
        &self,
        signature: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<DispatchSummary>> {
        let window = TimeWindow::lookback(now, self.lookback);
        let query = self.query.build(signature, &window);
        let index = self.index.resolve(now);

        let result = self.store.search(&index, &query, self.max_hits).await?;

        if !result.has_matches() {
            debug!(signature = %signature, index = %index, "no matches");
            return Ok(None);
        }

        info!(
            signature = %signature,
            index = %index,
            total = result.total,
            hits = result.hits.len(),
            "error signature matched"
        );

        let event = ErrorEvent::reduce(signature, result.total, result.hits);
        let summary = dispatch(&event, &self.sinks).await;
        Ok(Some(summary))
    }
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("sinks", &self.sinks.len())
            .field("index", &self.index)
            .field("lookback", &self.lookback)
            .field("max_hits", &self.max_hits)
            .finish_non_exhaustive()
    }
}

//! Error events reduced from store hits.

use serde::{Deserialize, Serialize};
use vigil_store::LogDocument;

/// The unit passed to alert sinks: one signature's matches for one cycle.
///
/// An event is only constructed when the store reported at least one match;
/// zero-match cycles produce no event and invoke no sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// The signature that matched.
    pub signature: String,
    /// The store's authoritative total match count, independent of how many
    /// hits were returned.
    pub total_matches: u64,
    /// Identifiers of the returned hits, in store return order.
    pub matched_ids: Vec<String>,
    /// The returned hits themselves, possibly a capped subset of all
    /// matches.
    pub documents: Vec<LogDocument>,
}

impl ErrorEvent {
    /// Reduces raw hits into an event.
    ///
    /// Deterministic and pure: copies the total, extracts ordered ids, and
    /// carries the documents across without loss. Callers only invoke this
    /// for positive totals.
    #[must_use]
    pub fn reduce(signature: impl Into<String>, total_matches: u64, hits: Vec<LogDocument>) -> Self {
        let matched_ids = hits.iter().map(|hit| hit.id.clone()).collect();
        Self {
            signature: signature.into(),
            total_matches,
            matched_ids,
            documents: hits,
        }
    }

    /// Number of hits carried by this event (≤ the configured result cap).
    #[must_use]
    pub fn hit_count(&self) -> usize {
        self.documents.len()
    }
}

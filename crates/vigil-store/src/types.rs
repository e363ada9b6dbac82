//! Core types for the log store boundary.
//!
//! This module provides:
//! - [`TimeWindow`] — Half-open lookback intervals, recomputed every cycle
//! - [`LogDocument`] — Open-schema matched entries
//! - [`SearchResult`] — A capped hit list plus the store's authoritative total

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A half-open time interval `[start, end)` searched during one cycle.
///
/// Windows are computed fresh from "now" at cycle time and never cached
/// across cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a window ending at `now` covering the given lookback duration.
    #[must_use]
    pub fn lookback(now: DateTime<Utc>, lookback: Duration) -> Self {
        Self {
            start: now - lookback,
            end: now,
        }
    }

    /// Start of the window (inclusive).
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the window (exclusive).
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the window.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks if a timestamp falls within this window.
    #[must_use]
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp < self.end
    }
}

/// One matched entry returned by the store.
///
/// The field set is index-schema-dependent and varies by deployment, so
/// fields are kept as a loose map. Absent fields stay absent; nothing is
/// defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDocument {
    /// Store-assigned document identifier.
    pub id: String,
    /// Structured fields as returned by the store.
    #[serde(default)]
    pub fields: HashMap<String, serde_json::Value>,
}

impl LogDocument {
    /// Creates a document with the given identifier and no fields.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: HashMap::new(),
        }
    }

    /// Adds a structured field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.get(name)
    }
}

/// The outcome of one search against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// The store's authoritative total match count, independent of the
    /// result-size cap.
    pub total: u64,
    /// Matched documents in store return order, capped at the configured
    /// result limit.
    pub hits: Vec<LogDocument>,
}

impl SearchResult {
    /// Returns true if the store reported at least one match.
    #[must_use]
    pub const fn has_matches(&self) -> bool {
        self.total > 0
    }
}

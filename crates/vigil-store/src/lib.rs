//! # vigil-store
//!
//! Log store boundary for the vigil error monitor.
//!
//! This crate provides:
//!
//! - [`LogDocument`] — Open-schema matched log entries
//! - [`TimeWindow`] — Half-open lookback intervals
//! - [`QueryBuilder`] / [`MatchStrategy`] — Query construction
//! - [`IndexPattern`] — Date-templated index names
//! - [`StoreClient`] — HTTP client for the search store
//! - [`LogSearch`] — Abstract trait for search backends
//!
//! ## Example
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use vigil_store::{IndexPattern, MatchStrategy, QueryBuilder, TimeWindow};
//!
//! let window = TimeWindow::lookback(Utc::now(), Duration::minutes(1));
//! let builder = QueryBuilder::new("@timestamp", MatchStrategy::phrase("message"));
//! let query = builder.build("10404", &window);
//!
//! let index = IndexPattern::new("app-logs-%Y.%m.%d").resolve(window.end());
//! assert!(query["bool"]["should"].is_array());
//! # let _ = index;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod index;
pub mod query;
pub mod types;

// Re-export main types
pub use client::{LogSearch, StoreClient, StoreClientConfig};
pub use error::{Result, StoreError};
pub use index::IndexPattern;
pub use query::{MatchStrategy, QueryBuilder};
pub use types::{LogDocument, SearchResult, TimeWindow};

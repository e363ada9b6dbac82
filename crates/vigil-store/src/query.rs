//! Query construction for the search store.
//!
//! Translates an error signature and a [`TimeWindow`] into the store's JSON
//! query DSL: a `bool` query with an inclusive timestamp range filter and a
//! "should match at least one" set of text clauses.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::types::TimeWindow;

/// How a signature is matched against document fields.
///
/// The strategy is a per-deployment configuration choice, not a fixed
/// algorithm. Signatures are always passed through as literal text;
/// malformed input is never rejected here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Exact phrase match on a single field.
    Phrase {
        /// The field to match the phrase against.
        field: String,
    },
    /// Best-fields full-text match across several fields.
    BestFields {
        /// The fields to search.
        fields: Vec<String>,
    },
    /// Targeted full-text match on a single field.
    Term {
        /// The field to match against.
        field: String,
    },
}

impl MatchStrategy {
    /// Phrase match on the given field.
    #[must_use]
    pub fn phrase(field: impl Into<String>) -> Self {
        Self::Phrase {
            field: field.into(),
        }
    }

    /// Best-fields match across the given fields.
    #[must_use]
    pub fn best_fields(fields: Vec<String>) -> Self {
        Self::BestFields { fields }
    }

    /// Targeted match on the given field.
    #[must_use]
    pub fn term(field: impl Into<String>) -> Self {
        Self::Term {
            field: field.into(),
        }
    }

    fn clause(&self, signature: &str) -> Value {
        match self {
            Self::Phrase { field } => json!({ "match_phrase": { field: signature } }),
            Self::BestFields { fields } => json!({
                "multi_match": {
                    "query": signature,
                    "fields": fields,
                    "type": "best_fields",
                }
            }),
            Self::Term { field } => json!({ "match": { field: signature } }),
        }
    }
}

impl Default for MatchStrategy {
    fn default() -> Self {
        Self::best_fields(vec!["message".to_string()])
    }
}

/// Builds store queries from signatures and time windows.
///
/// Pure construction with no side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBuilder {
    timestamp_field: String,
    strategy: MatchStrategy,
}

impl QueryBuilder {
    /// Creates a builder for the given timestamp field and match strategy.
    #[must_use]
    pub fn new(timestamp_field: impl Into<String>, strategy: MatchStrategy) -> Self {
        Self {
            timestamp_field: timestamp_field_or_default(timestamp_field.into()),
            strategy,
        }
    }

    /// The configured timestamp field.
    #[must_use]
    pub fn timestamp_field(&self) -> &str {
        &self.timestamp_field
    }

    /// Builds the query body for one signature over one window.
    ///
    /// The range filter uses inclusive bounds formatted as RFC 3339; the
    /// signature clauses are OR-combined with `minimum_should_match: 1`.
    #[must_use]
    pub fn build(&self, signature: &str, window: &TimeWindow) -> Value {
        json!({
            "bool": {
                "filter": [
                    {
                        "range": {
                            &self.timestamp_field: {
                                "gte": window.start().to_rfc3339(),
                                "lte": window.end().to_rfc3339(),
                            }
                        }
                    }
                ],
                "should": [self.strategy.clause(signature)],
                "minimum_should_match": 1,
            }
        })
    }
}

fn timestamp_field_or_default(field: String) -> String {
    if field.is_empty() {
        "@timestamp".to_string()
    } else {
        field
    }
}

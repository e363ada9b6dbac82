//! Date-templated index names.
//!
//! Stores commonly shard log indices by date (`app-logs-2026.08.29`). The
//! monitor addresses "today's" index by resolving a pattern against the
//! cycle's date; wildcard patterns pass through untouched.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// An index name pattern, optionally containing strftime specifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexPattern(String);

impl IndexPattern {
    /// Creates a pattern. `%Y`, `%m`, `%d` and friends are substituted at
    /// resolve time; a pattern without specifiers (including wildcards like
    /// `app-logs-*`) resolves to itself.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// The raw pattern string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks that every `%` specifier in the pattern is one chrono
    /// recognizes.
    ///
    /// # Errors
    ///
    /// Returns an error for patterns like `logs-%` or `logs-%q` whose
    /// specifiers cannot be formatted.
    pub fn validate(&self) -> Result<(), StoreError> {
        if StrftimeItems::new(&self.0).any(|item| matches!(item, Item::Error)) {
            return Err(StoreError::Config {
                reason: format!("invalid date specifier in index pattern '{}'", self.0),
            });
        }
        Ok(())
    }

    /// Resolves the pattern against the given instant.
    ///
    /// A pattern with an unrecognized specifier resolves to the raw pattern
    /// string; [`IndexPattern::validate`] rejects such patterns up front.
    #[must_use]
    pub fn resolve(&self, at: DateTime<Utc>) -> String {
        if !self.0.contains('%') {
            return self.0.clone();
        }

        let mut resolved = String::with_capacity(self.0.len());
        if write!(resolved, "{}", at.format(&self.0)).is_err() {
            return self.0.clone();
        }
        resolved
    }
}

impl std::fmt::Display for IndexPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn resolve_substitutes_date() {
        let at = Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).single();
        let at = at.expect("valid timestamp");
        let pattern = IndexPattern::new("app-logs-%Y.%m.%d");

        assert_eq!(pattern.resolve(at), "app-logs-2026.08.29");
    }

    #[test]
    fn resolve_passes_plain_names_through() {
        let pattern = IndexPattern::new("app-logs");
        assert_eq!(pattern.resolve(Utc::now()), "app-logs");
    }

    #[test]
    fn resolve_passes_wildcards_through() {
        let pattern = IndexPattern::new("app-logs-*");
        assert_eq!(pattern.resolve(Utc::now()), "app-logs-*");
    }

    #[test]
    fn resolve_differs_across_days() {
        let pattern = IndexPattern::new("logs-%Y.%m.%d");
        let day_one = Utc.with_ymd_and_hms(2026, 8, 29, 23, 59, 0).single();
        let day_two = Utc.with_ymd_and_hms(2026, 8, 30, 0, 1, 0).single();

        let (Some(day_one), Some(day_two)) = (day_one, day_two) else {
            panic!("valid timestamps");
        };
        assert_ne!(pattern.resolve(day_one), pattern.resolve(day_two));
    }

    #[test]
    fn resolve_keeps_raw_pattern_on_bad_specifier() {
        let trailing = IndexPattern::new("logs-%");
        assert_eq!(trailing.resolve(Utc::now()), "logs-%");

        let unknown = IndexPattern::new("logs-%q");
        assert_eq!(unknown.resolve(Utc::now()), "logs-%q");
    }

    #[test]
    fn validate_accepts_dates_and_plain_names() {
        assert!(IndexPattern::new("app-logs-%Y.%m.%d").validate().is_ok());
        assert!(IndexPattern::new("app-logs-*").validate().is_ok());
        assert!(IndexPattern::new("100%%cpu").validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_specifiers() {
        let err = IndexPattern::new("logs-%").validate().expect_err("rejected");
        assert!(err.to_string().contains("logs-%"));
        assert!(IndexPattern::new("logs-%q").validate().is_err());
    }

    #[test]
    fn display_shows_raw_pattern() {
        let pattern = IndexPattern::new("logs-%Y");
        assert_eq!(pattern.to_string(), "logs-%Y");
    }
}

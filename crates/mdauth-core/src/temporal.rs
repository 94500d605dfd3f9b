//! # Timestamps
//!
//! `Timestamp` is a UTC instant truncated to whole seconds. Delegation
//! grants carry an optional expiration expressed as a `Timestamp`, and the
//! delegation registry compares it against the current block time.
//!
//! Only the `Z` suffix is accepted when parsing. Inputs with explicit
//! offsets, even `+00:00`, are rejected.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A UTC timestamp with seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parse an RFC 3339 string with a `Z` suffix.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTimestamp`] for malformed input or any
    /// non-`Z` offset.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let invalid = |reason: String| CoreError::InvalidTimestamp {
            input: s.to_string(),
            reason,
        };
        if !s.ends_with('Z') {
            return Err(invalid("must use Z suffix (UTC only)".to_string()));
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| invalid(e.to_string()))?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Render as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl TryFrom<String> for Timestamp {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Timestamp> for String {
    fn from(value: Timestamp) -> Self {
        value.to_iso8601()
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_z_suffix() {
        let ts = Timestamp::parse("2026-03-01T08:15:30.250Z").unwrap();
        assert_eq!(ts.to_string(), "2026-03-01T08:15:30Z");
    }

    #[test]
    fn test_parse_rejects_offsets_and_garbage() {
        assert!(Timestamp::parse("2026-03-01T08:15:30+00:00").is_err());
        assert!(Timestamp::parse("2026-03-01T08:15:30-04:00").is_err());
        assert!(Timestamp::parse("yesterday").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn test_subseconds_do_not_affect_ordering() {
        let a = Timestamp::parse("2027-01-15T08:00:00.900Z").unwrap();
        let b = Timestamp::parse("2027-01-15T08:00:00Z").unwrap();
        let c = Timestamp::parse("2027-01-15T08:00:01Z").unwrap();
        assert_eq!(a, b);
        assert!(a < c);
    }

    #[test]
    fn test_serde_string_form() {
        let ts = Timestamp::parse("2026-03-01T08:15:30Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2026-03-01T08:15:30Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }
}

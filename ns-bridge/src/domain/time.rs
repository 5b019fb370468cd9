//! Timestamp handling for the NS API.
//!
//! NS sends timestamps as ISO 8601 with a numeric offset and, unlike RFC 3339,
//! usually without a colon in the offset (`2025-11-18T14:30:00+0100`).
//! Callers, on the other hand, hand us whatever ISO form they have, often
//! without any offset at all.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
use serde::{Deserialize, Deserializer};

/// A timestamp as reported by the NS API.
pub type Timestamp = DateTime<FixedOffset>;

/// Error returned when parsing an invalid timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp '{input}': expected ISO 8601 (e.g. 2025-11-18T14:30:00)")]
pub struct TimeError {
    input: String,
}

impl TimeError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%z"];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an offset-carrying timestamp, accepting offsets with or without a colon.
pub fn parse_timestamp(s: &str) -> Result<Timestamp, TimeError> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts);
    }
    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| TimeError::new(s))
}

/// Serde adapter for required upstream timestamps.
pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// Serde adapter for optional upstream timestamps. Use with `#[serde(default)]`.
pub(crate) fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_timestamp(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

/// A caller-supplied point in time for trip and departure queries.
///
/// Offsets are preserved when given; otherwise the time is passed to NS as
/// local wall-clock time and NS interprets it in Dutch local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTime {
    /// Timestamp with an explicit UTC offset.
    Zoned(DateTime<FixedOffset>),
    /// Wall-clock timestamp without an offset.
    Local(NaiveDateTime),
}

impl QueryTime {
    /// Parse an ISO 8601 date, date-time, or date-time with offset.
    ///
    /// A bare date means midnight.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let s = s.trim();

        if let Ok(ts) = parse_timestamp(s) {
            return Ok(QueryTime::Zoned(ts));
        }

        if let Some(naive) = NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        {
            return Ok(QueryTime::Local(naive));
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(QueryTime::Local)
            .ok_or_else(|| TimeError::new(s))
    }

    /// Render the value sent as the upstream `dateTime` query parameter.
    pub fn to_query_value(&self) -> String {
        match self {
            QueryTime::Zoned(ts) => ts.to_rfc3339_opts(SecondsFormat::Secs, false),
            QueryTime::Local(naive) => naive.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}

impl FromStr for QueryTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryTime::parse(s)
    }
}

impl fmt::Display for QueryTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_value())
    }
}

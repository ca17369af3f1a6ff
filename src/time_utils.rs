// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Shared helpers for wire timestamps.
//!
//! The coordinator emits several timestamp shapes depending on which layer
//! produced the value, so decoding tries each accepted format in priority
//! order and keeps the first that parses:
//!
//! 1. RFC 3339 with fractional seconds (`2025-10-14T16:47:19.503265Z`)
//! 2. RFC 3339 without fractional seconds (`2025-10-14T16:47:19Z`)
//! 3. A bare `yyyy-MM-ddTHH:mm:ss` with no offset, read as UTC
//!
//! Encoding always produces form (1).

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Format accepted by the third (timezone-less) parser.
const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A timestamp string that matched none of the accepted formats.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "expected an ISO 8601 timestamp (with or without fractional seconds) \
     or 'yyyy-MM-ddTHH:mm:ss', got {input:?}"
)]
pub struct DateParseError {
    pub input: String,
}

/// Format a UTC timestamp for the wire: RFC 3339, `Z` suffix, microseconds.
pub fn format_wire_timestamp(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a wire timestamp, trying each accepted format in order.
pub fn parse_wire_timestamp(input: &str) -> Result<DateTime<Utc>, DateParseError> {
    let parsers: [fn(&str) -> Option<DateTime<Utc>>; 3] =
        [parse_fractional, parse_rfc3339, parse_naive_utc];

    parsers
        .iter()
        .find_map(|parse| parse(input))
        .ok_or_else(|| DateParseError {
            input: input.to_string(),
        })
}

fn parse_fractional(input: &str) -> Option<DateTime<Utc>> {
    // Only inputs carrying a fraction after the seconds field belong here.
    let time_part = input.split_once('T')?.1;
    if !time_part.contains('.') {
        return None;
    }
    parse_rfc3339(input)
}

fn parse_rfc3339(input: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_naive_utc(input: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(input, NAIVE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Truncate a timestamp to the precision carried on the wire.
pub fn to_wire_precision(date: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = date.timestamp_subsec_nanos();
    date - chrono::Duration::nanoseconds(i64::from(nanos % 1_000))
}

/// `#[serde(with = "wire_date")]` for required timestamp fields.
pub mod wire_date {
    use super::{format_wire_timestamp, parse_wire_timestamp};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_wire_timestamp(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_wire_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with = "wire_date_opt")]` for optional timestamp fields.
pub mod wire_date_opt {
    use super::{format_wire_timestamp, parse_wire_timestamp};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_some(&format_wire_timestamp(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| parse_wire_timestamp(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

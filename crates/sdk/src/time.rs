//! Millisecond-precision timestamps and durations.
//!
//! The wire forms are plain little-endian `u64` millisecond counts; the JSON
//! forms are the node's human-readable strings (RFC3339 for timestamps, the
//! compact `30m0s` unit form for durations).

use core::fmt;
use core::str::FromStr;
use core::time::Duration;

use casper_sdk_codec::{Error as CodecError, FromBytes, ToBytes};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// Milliseconds since the Unix epoch, UTC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(u64);

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid timestamp: {0}")]
pub struct TimestampParseError(String);

impl Timestamp {
    /// The current wall-clock time, truncated to millisecond precision.
    pub fn now() -> Timestamp {
        Timestamp(Utc::now().timestamp_millis() as u64)
    }

    pub const fn from_millis(millis: u64) -> Timestamp {
        Timestamp(millis)
    }

    pub const fn millis(self) -> u64 {
        self.0
    }

    /// RFC3339 with fixed millisecond precision and `Z` suffix.
    pub fn to_rfc3339(self) -> String {
        match DateTime::<Utc>::from_timestamp_millis(self.0 as i64) {
            Some(datetime) => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            // unrepresentable only beyond year 262143; render the raw count
            None => format!("{}ms", self.0),
        }
    }

    /// Parses any RFC3339/RFC3339Nano timestamp.
    pub fn parse(input: &str) -> Result<Timestamp, TimestampParseError> {
        let datetime = DateTime::parse_from_rfc3339(input)
            .map_err(|err| TimestampParseError(format!("{input}: {err}")))?;
        Ok(Timestamp(datetime.timestamp_millis() as u64))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl FromStr for Timestamp {
    type Err = TimestampParseError;

    fn from_str(input: &str) -> Result<Timestamp, TimestampParseError> {
        Timestamp::parse(input)
    }
}

impl ToBytes for Timestamp {
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        self.0.to_bytes()
    }

    fn serialized_length(&self) -> usize {
        self.0.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CodecError> {
        self.0.write_bytes(writer)
    }
}

impl FromBytes for Timestamp {
    fn from_bytes(bytes: &[u8]) -> Result<(Timestamp, &[u8]), CodecError> {
        let (millis, remainder) = u64::from_bytes(bytes)?;
        Ok((Timestamp(millis), remainder))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Timestamp::parse(&text).map_err(de::Error::custom)
    }
}

/// A span of time in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeDiff(u64);

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid duration: {0}")]
pub struct TimeDiffParseError(String);

impl TimeDiff {
    pub const fn from_millis(millis: u64) -> TimeDiff {
        TimeDiff(millis)
    }

    pub const fn from_seconds(seconds: u64) -> TimeDiff {
        TimeDiff(seconds * 1_000)
    }

    pub const fn from_minutes(minutes: u64) -> TimeDiff {
        TimeDiff(minutes * 60_000)
    }

    pub const fn millis(self) -> u64 {
        self.0
    }

    /// Parses the compact unit form: a sequence of `<number><unit>` tokens
    /// with units `h`, `m`, `s` and `ms`, e.g. `30m0s` or `1.5s`.
    pub fn parse(input: &str) -> Result<TimeDiff, TimeDiffParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TimeDiffParseError("empty duration".into()));
        }

        let mut total_millis = 0f64;
        let mut rest = trimmed;
        while !rest.is_empty() {
            let number_end = rest
                .find(|c: char| !c.is_ascii_digit() && c != '.')
                .ok_or_else(|| TimeDiffParseError(format!("{input}: missing unit")))?;
            if number_end == 0 {
                return Err(TimeDiffParseError(format!("{input}: missing number")));
            }
            let (number, after_number) = rest.split_at(number_end);
            let unit_end = after_number
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(after_number.len());
            let (unit, after_unit) = after_number.split_at(unit_end);

            let value: f64 = number
                .parse()
                .map_err(|_| TimeDiffParseError(format!("{input}: bad number `{number}`")))?;
            let factor = match unit {
                "h" => 3_600_000f64,
                "m" => 60_000f64,
                "s" => 1_000f64,
                "ms" => 1f64,
                other => {
                    return Err(TimeDiffParseError(format!("{input}: unknown unit `{other}`")));
                }
            };
            total_millis += value * factor;
            rest = after_unit;
        }

        Ok(TimeDiff(total_millis.round() as u64))
    }
}

impl From<Duration> for TimeDiff {
    fn from(duration: Duration) -> TimeDiff {
        TimeDiff(duration.as_millis() as u64)
    }
}

impl From<TimeDiff> for Duration {
    fn from(diff: TimeDiff) -> Duration {
        Duration::from_millis(diff.0)
    }
}

impl fmt::Display for TimeDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.0;
        if millis == 0 {
            return f.write_str("0s");
        }
        if millis < 1_000 {
            return write!(f, "{millis}ms");
        }

        let total_seconds = millis / 1_000;
        let fraction = millis % 1_000;
        let hours = total_seconds / 3_600;
        let minutes = (total_seconds % 3_600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            write!(f, "{hours}h{minutes}m")?;
        } else if minutes > 0 {
            write!(f, "{minutes}m")?;
        }

        if fraction > 0 {
            let digits = format!("{fraction:03}");
            write!(f, "{seconds}.{}s", digits.trim_end_matches('0'))
        } else {
            write!(f, "{seconds}s")
        }
    }
}

impl FromStr for TimeDiff {
    type Err = TimeDiffParseError;

    fn from_str(input: &str) -> Result<TimeDiff, TimeDiffParseError> {
        TimeDiff::parse(input)
    }
}

impl ToBytes for TimeDiff {
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        self.0.to_bytes()
    }

    fn serialized_length(&self) -> usize {
        self.0.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CodecError> {
        self.0.write_bytes(writer)
    }
}

impl FromBytes for TimeDiff {
    fn from_bytes(bytes: &[u8]) -> Result<(TimeDiff, &[u8]), CodecError> {
        let (millis, remainder) = u64::from_bytes(bytes)?;
        Ok((TimeDiff(millis), remainder))
    }
}

impl Serialize for TimeDiff {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeDiff {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        TimeDiff::parse(&text).map_err(de::Error::custom)
    }
}

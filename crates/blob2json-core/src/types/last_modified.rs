//! Last-modified timestamps.

use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use jiff::tz::Offset;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// An RFC 3339 timestamp carried through an envelope unchanged.
///
/// The instant and the UTC offset it was written with are both kept, so
/// `2024-03-15T10:30:00+09:00` is rendered back exactly as given. Inputs in
/// Zulu form (`Z`) render with `Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastModified {
    timestamp: Timestamp,
    /// `None` for Zulu (or unknown) offsets.
    offset: Option<Offset>,
}

impl LastModified {
    /// Creates a last-modified value rendered in UTC with `Z`.
    #[must_use]
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            offset: None,
        }
    }

    /// Creates a last-modified value rendered with the given offset.
    #[must_use]
    pub fn with_offset(timestamp: Timestamp, offset: Offset) -> Self {
        Self {
            timestamp,
            offset: Some(offset),
        }
    }

    /// Returns the instant.
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Returns the offset used for rendering.
    #[must_use]
    pub fn offset(&self) -> Offset {
        self.offset.unwrap_or(Offset::UTC)
    }
}

impl From<Timestamp> for LastModified {
    fn from(timestamp: Timestamp) -> Self {
        Self::new(timestamp)
    }
}

impl FromStr for LastModified {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid =
            || Error::invalid_input().with_message(format!("invalid RFC 3339 timestamp {s:?}"));

        let offset = parse_rfc3339_offset(s).ok_or_else(|| {
            Error::invalid_input().with_message(format!(
                "invalid RFC 3339 timestamp {s:?}; expected YYYY-MM-DDTHH:MM:SS[.frac] \
                 followed by Z or a +HH:MM/-HH:MM offset"
            ))
        })?;

        let timestamp: Timestamp = s
            .parse()
            .map_err(|e: jiff::Error| invalid().with_source(e))?;
        let offset = match offset {
            Rfc3339Offset::Zulu => None,
            Rfc3339Offset::Numeric(seconds) => Some(
                Offset::from_seconds(seconds).map_err(|e| invalid().with_source(e))?,
            ),
        };

        Ok(Self { timestamp, offset })
    }
}

/// Offset suffix of an RFC 3339 `date-time`.
enum Rfc3339Offset {
    Zulu,
    Numeric(i32),
}

/// Checks the strict RFC 3339 `date-time` shape and returns its offset.
///
/// Accepts only `YYYY-MM-DDTHH:MM:SS`, an optional `.fraction`, and `Z` or
/// `+HH:MM`/`-HH:MM`. Calendar ranges are left to the timestamp parser.
fn parse_rfc3339_offset(s: &str) -> Option<Rfc3339Offset> {
    const SHAPE: &[u8] = b"dddd-dd-ddTdd:dd:dd";

    let bytes = s.as_bytes();
    if bytes.len() < SHAPE.len() {
        return None;
    }

    let (head, rest) = bytes.split_at(SHAPE.len());
    let head_ok = head.iter().zip(SHAPE).all(|(&c, &p)| match p {
        b'd' => c.is_ascii_digit(),
        _ => c == p,
    });
    if !head_ok {
        return None;
    }

    let rest = match rest {
        [b'.', fraction @ ..] => {
            let digits = fraction.iter().take_while(|c| c.is_ascii_digit()).count();
            if digits == 0 {
                return None;
            }
            &fraction[digits..]
        }
        _ => rest,
    };

    match rest {
        [b'Z'] => Some(Rfc3339Offset::Zulu),
        [sign @ (b'+' | b'-'), h1, h2, b':', m1, m2] => {
            if ![h1, h2, m1, m2].iter().all(|d| d.is_ascii_digit()) {
                return None;
            }
            let hours = i32::from((h1 - b'0') * 10 + (h2 - b'0'));
            let minutes = i32::from((m1 - b'0') * 10 + (m2 - b'0'));
            if hours > 23 || minutes > 59 {
                return None;
            }

            let seconds = hours * 3600 + minutes * 60;
            Some(Rfc3339Offset::Numeric(if *sign == b'-' { -seconds } else { seconds }))
        }
        _ => None,
    }
}

impl fmt::Display for LastModified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{}", self.timestamp.display_with_offset(offset)),
            None => write!(f, "{}", self.timestamp),
        }
    }
}

impl Serialize for LastModified {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LastModified {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

//! Station identifier type.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Error returned when parsing an invalid station name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station name: {reason}")]
pub struct InvalidStationName {
    reason: &'static str,
}

/// A validated station name.
///
/// Stations are identified by their display name ("San Antonio",
/// "Acevedo", ...). A station that appears on several lines is still a
/// single identity. Names are non-empty and carry no surrounding
/// whitespace; this type guarantees both by construction.
///
/// The backing storage is a shared `Arc<str>`, so cloning a name (which
/// happens on every graph lookup and route result) never reallocates.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationName(Arc<str>);

impl StationName {
    /// Parse a station name from a string.
    ///
    /// Leading and trailing whitespace is trimmed; the remainder must
    /// be non-empty.
    pub fn parse(s: &str) -> Result<Self, InvalidStationName> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidStationName {
                reason: "must not be empty",
            });
        }
        Ok(StationName(Arc::from(trimmed)))
    }

    /// Returns the station name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationName({})", self.as_str())
    }
}

impl fmt::Display for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StationName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

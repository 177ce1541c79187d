//! Line code and transport classification types.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Error returned when parsing an invalid line code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid line code: {reason}")]
pub struct InvalidLineCode {
    reason: &'static str,
}

/// A validated line code ("A", "K", "TA", "1", ...).
///
/// Codes are short uppercase alphanumeric identifiers. The code only
/// names a line; its station sequence and transport kind live in the
/// topology definition.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineCode(Arc<str>);

impl LineCode {
    /// Parse a line code from a string.
    ///
    /// The input must be 1-4 uppercase ASCII letters or digits.
    pub fn parse(s: &str) -> Result<Self, InvalidLineCode> {
        if s.is_empty() || s.len() > 4 {
            return Err(InvalidLineCode {
                reason: "must be 1-4 characters",
            });
        }
        if !s
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(InvalidLineCode {
                reason: "must be uppercase ASCII letters or digits",
            });
        }
        Ok(LineCode(Arc::from(s)))
    }

    /// Returns the line code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineCode({})", self.as_str())
    }
}

impl fmt::Display for LineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LineCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The transport mode operating a line.
///
/// The kind determines the base cruising speed of an edge and how
/// harshly each weather state degrades it (see the weight model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportKind {
    /// Heavy rail (the core metro lines).
    Metro,
    /// Aerial cable car lines.
    Cable,
    /// Street-running tram.
    Tram,
    /// Bus rapid transit.
    Bus,
}

impl TransportKind {
    /// All transport kinds, in severity-table order.
    pub const ALL: [TransportKind; 4] = [
        TransportKind::Metro,
        TransportKind::Cable,
        TransportKind::Tram,
        TransportKind::Bus,
    ];
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportKind::Metro => "metro",
            TransportKind::Cable => "cable",
            TransportKind::Tram => "tram",
            TransportKind::Bus => "bus",
        };
        f.write_str(s)
    }
}

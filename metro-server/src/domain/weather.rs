//! Weather state classification.

use std::fmt;

use serde::Serialize;

/// A simulated weather state at a station.
///
/// The variants are ordered by severity: `Clear < Cloudy < Rainy <
/// Stormy`. Severity drives the per-transport slowdown factor in the
/// weight model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherKind {
    Clear,
    Cloudy,
    Rainy,
    Stormy,
}

impl WeatherKind {
    /// All weather states, from least to most severe.
    pub const ALL: [WeatherKind; 4] = [
        WeatherKind::Clear,
        WeatherKind::Cloudy,
        WeatherKind::Rainy,
        WeatherKind::Stormy,
    ];

    /// Human-facing label, as displayed to riders.
    pub fn label(self) -> &'static str {
        match self {
            WeatherKind::Clear => "Soleado",
            WeatherKind::Cloudy => "Nublado",
            WeatherKind::Rainy => "Lluvioso",
            WeatherKind::Stormy => "Tormenta",
        }
    }

    /// Display icon for the state.
    pub fn icon(self) -> &'static str {
        match self {
            WeatherKind::Clear => "☀️",
            WeatherKind::Cloudy => "☁️",
            WeatherKind::Rainy => "🌧️",
            WeatherKind::Stormy => "⛈️",
        }
    }
}

impl fmt::Display for WeatherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WeatherKind::Clear => "clear",
            WeatherKind::Cloudy => "cloudy",
            WeatherKind::Rainy => "rainy",
            WeatherKind::Stormy => "stormy",
        };
        f.write_str(s)
    }
}

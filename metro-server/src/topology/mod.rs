//! Static network topology.
//!
//! A topology is the fixed shape of the network: lines with their
//! ordered station sequences, per-station coordinates, and the curated
//! list of transfer pairs connecting distinct nearby stations on
//! different lines. It carries no runtime state; the station graph is
//! built from it at startup.
//!
//! A malformed definition (a station without coordinates, a one-station
//! line) is rejected here, at load time. Guessing a default coordinate
//! would mask a corrupt definition and misprice every incident edge.

mod medellin;

use std::collections::{BTreeMap, HashSet};

use crate::domain::{LineCode, StationName, TransportKind};
use crate::geo::Coordinate;

pub use medellin::medellin;

/// Errors detected while validating a topology definition.
///
/// These are startup-time conditions: the process should refuse to
/// start rather than route over a broken network.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TopologyError {
    #[error("line {line} has {count} station(s); at least 2 are required")]
    ShortLine { line: LineCode, count: usize },

    #[error("station {station} appears more than once on line {line}")]
    DuplicateStation {
        station: StationName,
        line: LineCode,
    },

    #[error("station {station} on line {line} has no coordinates")]
    MissingCoordinate {
        station: StationName,
        line: LineCode,
    },

    #[error("transfer pair references unknown station {station}")]
    UnknownTransferStation { station: StationName },

    #[error("transfer pair connects {station} to itself")]
    SelfTransfer { station: StationName },
}

/// One line of the network: an ordered station sequence plus its
/// transport kind and display color.
#[derive(Debug, Clone)]
pub struct Line {
    pub code: LineCode,
    pub transport: TransportKind,
    /// Display color (hex), output-only.
    pub color: String,
    pub stations: Vec<StationName>,
}

/// A validated network definition.
#[derive(Debug, Clone)]
pub struct Topology {
    lines: Vec<Line>,
    coordinates: BTreeMap<StationName, Coordinate>,
    transfers: Vec<(StationName, StationName)>,
}

impl Topology {
    /// Validate and construct a topology.
    ///
    /// Every station on every line must have a coordinate, every line
    /// must have at least two distinct stations, and transfer pairs
    /// must connect two distinct known stations.
    pub fn new(
        lines: Vec<Line>,
        coordinates: BTreeMap<StationName, Coordinate>,
        transfers: Vec<(StationName, StationName)>,
    ) -> Result<Self, TopologyError> {
        for line in &lines {
            if line.stations.len() < 2 {
                return Err(TopologyError::ShortLine {
                    line: line.code.clone(),
                    count: line.stations.len(),
                });
            }
            let mut seen = HashSet::new();
            for station in &line.stations {
                if !seen.insert(station) {
                    return Err(TopologyError::DuplicateStation {
                        station: station.clone(),
                        line: line.code.clone(),
                    });
                }
                if !coordinates.contains_key(station) {
                    return Err(TopologyError::MissingCoordinate {
                        station: station.clone(),
                        line: line.code.clone(),
                    });
                }
            }
        }

        let known: HashSet<&StationName> = lines.iter().flat_map(|l| &l.stations).collect();
        for (a, b) in &transfers {
            if a == b {
                return Err(TopologyError::SelfTransfer { station: a.clone() });
            }
            for station in [a, b] {
                if !known.contains(station) {
                    return Err(TopologyError::UnknownTransferStation {
                        station: station.clone(),
                    });
                }
            }
        }

        Ok(Self {
            lines,
            coordinates,
            transfers,
        })
    }

    /// All lines, in definition order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Explicit transfer pairs between distinct stations.
    pub fn transfers(&self) -> &[(StationName, StationName)] {
        &self.transfers
    }

    /// Coordinate of a station, if it is part of the network.
    pub fn coordinate(&self, station: &StationName) -> Option<Coordinate> {
        self.coordinates.get(station).copied()
    }

    /// Unique stations in first-seen order across lines.
    ///
    /// This order is deterministic and is the node order of the built
    /// graph.
    pub fn stations(&self) -> Vec<StationName> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for line in &self.lines {
            for station in &line.stations {
                if seen.insert(station.clone()) {
                    out.push(station.clone());
                }
            }
        }
        out
    }

    /// The lines serving a station, in definition order.
    pub fn station_lines(&self, station: &StationName) -> Vec<LineCode> {
        self.lines
            .iter()
            .filter(|l| l.stations.contains(station))
            .map(|l| l.code.clone())
            .collect()
    }
}

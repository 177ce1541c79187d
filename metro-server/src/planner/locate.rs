//! Nearest-station lookup.

use serde::Serialize;

use crate::domain::StationName;
use crate::geo::{self, Coordinate};
use crate::graph::StationGraph;

/// The station closest to a query coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestStation {
    pub station: StationName,
    pub distance_km: f64,
    /// Estimated walk from the query point at the configured walking
    /// speed.
    pub walking_minutes: f64,
    pub coordinate: Coordinate,
}

/// Linear scan over every station's coordinates.
///
/// Ties resolve to the first station in node order, so the result is
/// deterministic. Returns `None` only for an empty graph.
pub fn nearest_station(
    graph: &StationGraph,
    latitude: f64,
    longitude: f64,
) -> Option<NearestStation> {
    let target = Coordinate::new(latitude, longitude);
    let mut best: Option<(usize, f64)> = None;

    for (index, node) in graph.nodes().iter().enumerate() {
        let distance = node.coordinate().distance_km(&target);
        if best.is_none_or(|(_, min)| distance < min) {
            best = Some((index, distance));
        }
    }

    best.map(|(index, distance_km)| {
        let node = graph.node(index);
        NearestStation {
            station: node.name().clone(),
            distance_km,
            walking_minutes: geo::walking_minutes(distance_km, graph.config().walking_speed_kmh),
            coordinate: node.coordinate(),
        }
    })
}

//! Route computation and assembly.

use serde::Serialize;
use tracing::debug;

use crate::domain::{LineCode, StationName, WeatherKind};
use crate::geo::Coordinate;
use crate::graph::{EdgeLine, StationGraph};
use crate::weather::{WeatherReading, WeatherSnapshot};
use crate::weight;

use super::search::shortest_path;

/// Errors from route computation.
///
/// A station that does not exist and a pair of stations with no
/// connecting path are distinct outcomes; both are ordinary results,
/// not failures of the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("station not found: {0}")]
    NotFound(StationName),

    #[error("no path between {origin} and {destination} under current conditions")]
    NoPath {
        origin: StationName,
        destination: StationName,
    },
}

/// Read access to per-station weather during assembly.
///
/// The live snapshot implements this; [`ClearSky`] is the synthetic
/// all-clear view used by the impact diagnostic.
pub trait ConditionView {
    fn kind(&self, station: &StationName) -> WeatherKind;
    fn reading(&self, station: &StationName) -> Option<&WeatherReading>;
}

impl ConditionView for WeatherSnapshot {
    fn kind(&self, station: &StationName) -> WeatherKind {
        self.get(station)
            .map(|r| r.kind)
            .unwrap_or(WeatherKind::Clear)
    }

    fn reading(&self, station: &StationName) -> Option<&WeatherReading> {
        self.get(station)
    }
}

/// A view that reports clear weather everywhere.
pub struct ClearSky;

impl ConditionView for ClearSky {
    fn kind(&self, _station: &StationName) -> WeatherKind {
        WeatherKind::Clear
    }

    fn reading(&self, _station: &StationName) -> Option<&WeatherReading> {
        None
    }
}

/// Weather impact on one endpoint of a segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointImpact {
    pub station: StationName,
    pub weather: String,
    /// Percentage slowdown vs clear weather for the segment's
    /// transport kind.
    pub impact_percent: f64,
}

/// A route segment touched by non-clear weather.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentImpact {
    pub from: StationName,
    pub to: StationName,
    pub line: LineCode,
    pub origin: EndpointImpact,
    pub destination: EndpointImpact,
}

/// A computed route, before it is stamped into the history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    /// Stations traversed, origin first.
    pub path: Vec<StationName>,
    pub coordinates: Vec<Coordinate>,
    /// Number of edges traversed (`path.len() - 1`).
    pub segments: usize,
    /// Lines used, deduplicated consecutively. Walking transfers do
    /// not appear here.
    pub lines: Vec<LineCode>,
    /// Stations where the traversed line changes.
    pub transfers: Vec<StationName>,
    /// Total time in minutes, including transfer penalties. Kept as a
    /// float; display rounding happens at the boundary.
    pub estimated_minutes: f64,
    pub total_distance_km: f64,
    pub weather_impacts: Vec<SegmentImpact>,
    /// Stations on the path whose congestion exceeds the alert
    /// threshold.
    pub alerts: Vec<String>,
    /// Conditions at the stations on the path.
    pub conditions: WeatherSnapshot,
}

/// Compute the fastest route between two stations under the given
/// weather view and the graph's current weights.
pub fn plan_route<V: ConditionView>(
    graph: &StationGraph,
    weather: &V,
    origin: &StationName,
    destination: &StationName,
) -> Result<RouteSummary, RouteError> {
    let from = graph
        .node_index(origin)
        .ok_or_else(|| RouteError::NotFound(origin.clone()))?;
    let to = graph
        .node_index(destination)
        .ok_or_else(|| RouteError::NotFound(destination.clone()))?;

    let no_path = || RouteError::NoPath {
        origin: origin.clone(),
        destination: destination.clone(),
    };

    let (path, cost) = shortest_path(graph, from, to).ok_or_else(no_path)?;

    // A "path" whose cost reaches the sentinel only exists because
    // closed-station edges stay in the graph; it is not traversable.
    if cost >= graph.config().unreachable_minutes {
        return Err(no_path());
    }

    let config = graph.config();
    let mut total_minutes = 0.0;
    let mut total_distance_km = 0.0;
    let mut lines: Vec<LineCode> = Vec::new();
    let mut transfers: Vec<StationName> = Vec::new();
    let mut weather_impacts: Vec<SegmentImpact> = Vec::new();
    let mut current_line: Option<LineCode> = None;

    for pair in path.windows(2) {
        let edge = graph
            .edge_between(pair[0], pair[1])
            .expect("consecutive path nodes are adjacent");
        let from_name = graph.node(pair[0]).name().clone();
        let to_name = graph.node(pair[1]).name().clone();

        total_minutes += edge.weight_minutes();
        total_distance_km += edge.distance_km();

        match edge.line() {
            EdgeLine::Line { code, transport } => {
                let changed = current_line.as_ref().is_some_and(|c| c != code);
                if changed {
                    // Same-station line change: penalty applied here,
                    // never modeled as a graph edge.
                    transfers.push(from_name.clone());
                    total_minutes += config.transfer_penalty_minutes;
                }
                if lines.last() != Some(code) {
                    lines.push(code.clone());
                }
                current_line = Some(code.clone());

                let weather_from = weather.kind(&from_name);
                let weather_to = weather.kind(&to_name);
                if weather_from != WeatherKind::Clear || weather_to != WeatherKind::Clear {
                    weather_impacts.push(SegmentImpact {
                        from: from_name.clone(),
                        to: to_name.clone(),
                        line: code.clone(),
                        origin: EndpointImpact {
                            station: from_name,
                            weather: weather_from.label().to_string(),
                            impact_percent: weight::slowdown_percent(*transport, weather_from),
                        },
                        destination: EndpointImpact {
                            station: to_name,
                            weather: weather_to.label().to_string(),
                            impact_percent: weight::slowdown_percent(*transport, weather_to),
                        },
                    });
                }
            }
            EdgeLine::Transfer => {
                // The walk itself is the transfer; its weight already
                // covers the cost, so no extra penalty.
                transfers.push(from_name);
                current_line = None;
            }
        }
    }

    let alerts = path
        .iter()
        .map(|&node| graph.node(node))
        .filter(|station| station.congestion() > config.congestion_alert_threshold)
        .map(|station| format!("High congestion at {}", station.name()))
        .collect();

    let conditions = path
        .iter()
        .filter_map(|&node| {
            let name = graph.node(node).name();
            weather.reading(name).map(|r| (name.clone(), r.clone()))
        })
        .collect();

    let summary = RouteSummary {
        segments: path.len() - 1,
        coordinates: path.iter().map(|&n| graph.node(n).coordinate()).collect(),
        path: path
            .into_iter()
            .map(|n| graph.node(n).name().clone())
            .collect(),
        lines,
        transfers,
        estimated_minutes: total_minutes,
        total_distance_km,
        weather_impacts,
        alerts,
        conditions,
    };
    debug!(
        origin = %origin,
        destination = %destination,
        stations = summary.path.len(),
        minutes = summary.estimated_minutes,
        "route planned"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransportKind;
    use crate::topology::{Line, Topology};
    use crate::weight::WeightConfig;
    use std::collections::BTreeMap;

    fn name(s: &str) -> StationName {
        StationName::parse(s).unwrap()
    }

    fn line(code: &str, transport: TransportKind, stations: &[&str]) -> Line {
        Line {
            code: LineCode::parse(code).unwrap(),
            transport,
            color: "#000000".to_string(),
            stations: stations.iter().map(|s| name(s)).collect(),
        }
    }

    /// Stations evenly spaced along a meridian, ~1.1 km apart.
    fn spaced_coordinates(stations: &[&str]) -> BTreeMap<StationName, Coordinate> {
        stations
            .iter()
            .enumerate()
            .map(|(i, s)| (name(s), Coordinate::new(6.2 + 0.01 * i as f64, -75.57)))
            .collect()
    }

    /// A single straight line of five stations.
    fn straight_line() -> StationGraph {
        let stations = ["Terminal Norte", "Centro 1", "Centro 2", "Centro 3", "Terminal Sur"];
        let topology = Topology::new(
            vec![line("A", TransportKind::Metro, &stations)],
            spaced_coordinates(&stations),
            vec![],
        )
        .unwrap();
        StationGraph::build(&topology, &WeatherSnapshot::new(), WeightConfig::default())
    }

    /// Two lines joined only at the shared station "Cruce".
    fn cross() -> StationGraph {
        let all = ["Oeste", "Cruce", "Este", "Norte", "Sur"];
        let topology = Topology::new(
            vec![
                line("A", TransportKind::Metro, &["Oeste", "Cruce", "Este"]),
                line("B", TransportKind::Tram, &["Norte", "Cruce", "Sur"]),
            ],
            spaced_coordinates(&all),
            vec![],
        )
        .unwrap();
        StationGraph::build(&topology, &WeatherSnapshot::new(), WeightConfig::default())
    }

    #[test]
    fn straight_line_covers_all_stations_without_transfers() {
        let graph = straight_line();
        let route = plan_route(
            &graph,
            &ClearSky,
            &name("Terminal Norte"),
            &name("Terminal Sur"),
        )
        .unwrap();

        assert_eq!(route.path.len(), 5);
        assert_eq!(route.segments, 4);
        assert!(route.transfers.is_empty());
        assert_eq!(route.lines, vec![LineCode::parse("A").unwrap()]);

        // No transfer penalty: the total is exactly the edge weights.
        let edge_sum: f64 = route
            .path
            .windows(2)
            .map(|pair| {
                let a = graph.node_index(&pair[0]).unwrap();
                let b = graph.node_index(&pair[1]).unwrap();
                graph.edge_between(a, b).unwrap().weight_minutes()
            })
            .sum();
        assert!((route.estimated_minutes - edge_sum).abs() < 1e-9);
        assert!(route.total_distance_km > 0.0);
    }

    #[test]
    fn same_origin_and_destination() {
        let graph = straight_line();
        let route =
            plan_route(&graph, &ClearSky, &name("Centro 2"), &name("Centro 2")).unwrap();
        assert_eq!(route.path, vec![name("Centro 2")]);
        assert_eq!(route.segments, 0);
        assert!(route.transfers.is_empty());
        assert_eq!(route.estimated_minutes, 0.0);
        assert_eq!(route.total_distance_km, 0.0);
    }

    #[test]
    fn line_change_records_transfer_and_penalty() {
        let graph = cross();
        let route = plan_route(&graph, &ClearSky, &name("Oeste"), &name("Sur")).unwrap();

        assert_eq!(route.transfers, vec![name("Cruce")]);
        assert_eq!(
            route.lines,
            vec![LineCode::parse("A").unwrap(), LineCode::parse("B").unwrap()]
        );

        let edge_sum: f64 = route
            .path
            .windows(2)
            .map(|pair| {
                let a = graph.node_index(&pair[0]).unwrap();
                let b = graph.node_index(&pair[1]).unwrap();
                graph.edge_between(a, b).unwrap().weight_minutes()
            })
            .sum();
        let penalty = graph.config().transfer_penalty_minutes;
        assert!((route.estimated_minutes - (edge_sum + penalty)).abs() < 1e-9);
    }

    #[test]
    fn unknown_station_is_not_found() {
        let graph = straight_line();
        let err = plan_route(&graph, &ClearSky, &name("Nowhere"), &name("Terminal Sur"))
            .unwrap_err();
        assert_eq!(err, RouteError::NotFound(name("Nowhere")));
    }

    #[test]
    fn closed_connector_yields_no_path_and_reopening_restores_it() {
        let mut graph = cross();

        // "Cruce" is the only connection between the two lines.
        graph.close_station(&name("Cruce"), "flooding").unwrap();
        let err = plan_route(&graph, &ClearSky, &name("Oeste"), &name("Sur")).unwrap_err();
        assert!(matches!(err, RouteError::NoPath { .. }));

        graph
            .open_station(&name("Cruce"), &WeatherSnapshot::new())
            .unwrap();
        assert!(plan_route(&graph, &ClearSky, &name("Oeste"), &name("Sur")).is_ok());
    }

    #[test]
    fn weather_impacts_cover_affected_segments() {
        struct Stormy(StationName);
        impl ConditionView for Stormy {
            fn kind(&self, station: &StationName) -> WeatherKind {
                if *station == self.0 {
                    WeatherKind::Stormy
                } else {
                    WeatherKind::Clear
                }
            }
            fn reading(&self, _station: &StationName) -> Option<&WeatherReading> {
                None
            }
        }

        let graph = straight_line();
        let view = Stormy(name("Centro 2"));
        let route = plan_route(
            &graph,
            &view,
            &name("Terminal Norte"),
            &name("Terminal Sur"),
        )
        .unwrap();

        // Both segments touching "Centro 2" are annotated.
        assert_eq!(route.weather_impacts.len(), 2);
        let impact = &route.weather_impacts[0];
        assert_eq!(impact.to, name("Centro 2"));
        assert_eq!(impact.destination.weather, "Tormenta");
        assert_eq!(
            impact.destination.impact_percent,
            weight::slowdown_percent(TransportKind::Metro, WeatherKind::Stormy)
        );
        assert_eq!(impact.origin.impact_percent, 0.0);
    }

    #[test]
    fn congested_path_station_raises_alert() {
        let mut graph = straight_line();
        graph
            .set_congestion(&name("Centro 1"), 1.8, &WeatherSnapshot::new())
            .unwrap();
        let route = plan_route(
            &graph,
            &ClearSky,
            &name("Terminal Norte"),
            &name("Terminal Sur"),
        )
        .unwrap();
        assert_eq!(route.alerts, vec!["High congestion at Centro 1".to_string()]);
    }
}

//! The weighted station graph.
//!
//! Nodes are stations (one per name, however many lines serve it);
//! edges connect consecutive stations within a line plus the explicit
//! transfer pairs. Each edge stores its static distance and its current
//! weight in minutes. Weights are mutable state, refreshed on every
//! weather tick and admin action, so repeated shortest-path queries pay
//! only an O(1) lookup per edge.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{LineCode, StationName, TransportKind, WeatherKind};
use crate::geo::Coordinate;
use crate::topology::Topology;
use crate::weather::WeatherSnapshot;
use crate::weight::{self, EndpointConditions, WeightConfig};

/// Error for admin or query operations naming a station that is not in
/// the graph. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("station not found: {0}")]
pub struct UnknownStation(pub StationName);

/// Operational status of a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationStatus {
    Open,
    Closed { reason: String },
}

impl StationStatus {
    pub fn is_closed(&self) -> bool {
        matches!(self, StationStatus::Closed { .. })
    }
}

/// A station node with its runtime state.
#[derive(Debug, Clone)]
pub struct StationNode {
    name: StationName,
    coordinate: Coordinate,
    lines: Vec<LineCode>,
    status: StationStatus,
    congestion: f64,
}

impl StationNode {
    pub fn name(&self) -> &StationName {
        &self.name
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn lines(&self) -> &[LineCode] {
        &self.lines
    }

    pub fn status(&self) -> &StationStatus {
        &self.status
    }

    /// Admin congestion multiplier, already clamped to the configured
    /// range.
    pub fn congestion(&self) -> f64 {
        self.congestion
    }
}

/// The line an edge belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeLine {
    /// A segment of a regular line.
    Line {
        code: LineCode,
        transport: TransportKind,
    },
    /// A walking link from the curated transfer list.
    Transfer,
}

/// An undirected edge between two station nodes.
#[derive(Debug, Clone)]
pub struct Edge {
    a: usize,
    b: usize,
    line: EdgeLine,
    distance_km: f64,
    weight_minutes: f64,
}

impl Edge {
    pub fn endpoints(&self) -> (usize, usize) {
        (self.a, self.b)
    }

    pub fn line(&self) -> &EdgeLine {
        &self.line
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Current traversal cost in minutes.
    pub fn weight_minutes(&self) -> f64 {
        self.weight_minutes
    }
}

/// The station graph with its mutable weight state.
pub struct StationGraph {
    config: WeightConfig,
    nodes: Vec<StationNode>,
    index: HashMap<StationName, usize>,
    edges: Vec<Edge>,
    /// Per node: (neighbor node index, edge index).
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl StationGraph {
    /// Build the graph from a validated topology.
    ///
    /// Nodes are created first (deduplicated by name across lines),
    /// then one edge per consecutive station pair within each line,
    /// then one edge per explicit transfer pair. Initial weights come
    /// from the given weather snapshot and all-open runtime state.
    pub fn build(topology: &Topology, weather: &WeatherSnapshot, config: WeightConfig) -> Self {
        let mut graph = Self {
            config,
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            adjacency: Vec::new(),
        };

        for name in topology.stations() {
            let coordinate = topology
                .coordinate(&name)
                .expect("validated topology has coordinates for every station");
            let lines = topology.station_lines(&name);
            graph.index.insert(name.clone(), graph.nodes.len());
            graph.nodes.push(StationNode {
                name,
                coordinate,
                lines,
                status: StationStatus::Open,
                congestion: 1.0,
            });
            graph.adjacency.push(Vec::new());
        }

        for line in topology.lines() {
            for pair in line.stations.windows(2) {
                let a = graph.index[&pair[0]];
                let b = graph.index[&pair[1]];
                graph.push_edge(
                    a,
                    b,
                    EdgeLine::Line {
                        code: line.code.clone(),
                        transport: line.transport,
                    },
                );
            }
        }

        for (from, to) in topology.transfers() {
            let a = graph.index[from];
            let b = graph.index[to];
            graph.push_edge(a, b, EdgeLine::Transfer);
        }

        graph.refresh_weights(weather);
        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "station graph built"
        );
        graph
    }

    fn push_edge(&mut self, a: usize, b: usize, line: EdgeLine) {
        let distance_km = self.nodes[a]
            .coordinate
            .distance_km(&self.nodes[b].coordinate);
        let edge_index = self.edges.len();
        self.edges.push(Edge {
            a,
            b,
            line,
            distance_km,
            // Placeholder until the refresh pass at the end of build.
            weight_minutes: self.config.neutral_edge_minutes,
        });
        self.adjacency[a].push((b, edge_index));
        self.adjacency[b].push((a, edge_index));
    }

    pub fn config(&self) -> &WeightConfig {
        &self.config
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[StationNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> &StationNode {
        &self.nodes[index]
    }

    pub fn node_index(&self, name: &StationName) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn station(&self, name: &StationName) -> Option<&StationNode> {
        self.node_index(name).map(|i| &self.nodes[i])
    }

    /// Neighbors of a node as (neighbor index, edge index) pairs, in
    /// construction order.
    pub fn neighbors(&self, node: usize) -> &[(usize, usize)] {
        &self.adjacency[node]
    }

    pub fn edge(&self, index: usize) -> &Edge {
        &self.edges[index]
    }

    /// The edge connecting two adjacent nodes, if any.
    pub fn edge_between(&self, a: usize, b: usize) -> Option<&Edge> {
        self.adjacency[a]
            .iter()
            .find(|(neighbor, _)| *neighbor == b)
            .map(|(_, edge)| &self.edges[*edge])
    }

    /// Mark a station closed and push all its incident edges to the
    /// unreachable sentinel.
    pub fn close_station(
        &mut self,
        name: &StationName,
        reason: &str,
    ) -> Result<(), UnknownStation> {
        let node = self
            .node_index(name)
            .ok_or_else(|| UnknownStation(name.clone()))?;
        self.nodes[node].status = StationStatus::Closed {
            reason: reason.to_string(),
        };
        // A closed endpoint forces the sentinel; weather is irrelevant.
        self.refresh_incident(node, |_| WeatherKind::Clear);
        debug!(station = %name, reason, "station closed");
        Ok(())
    }

    /// Reopen a station and recompute its incident edges from current
    /// conditions.
    pub fn open_station(
        &mut self,
        name: &StationName,
        weather: &WeatherSnapshot,
    ) -> Result<(), UnknownStation> {
        let node = self
            .node_index(name)
            .ok_or_else(|| UnknownStation(name.clone()))?;
        self.nodes[node].status = StationStatus::Open;
        self.refresh_incident(node, |station| snapshot_kind(weather, station));
        debug!(station = %name, "station reopened");
        Ok(())
    }

    /// Set a station's congestion multiplier (clamped to the configured
    /// range) and recompute its incident edges.
    pub fn set_congestion(
        &mut self,
        name: &StationName,
        level: f64,
        weather: &WeatherSnapshot,
    ) -> Result<(), UnknownStation> {
        let node = self
            .node_index(name)
            .ok_or_else(|| UnknownStation(name.clone()))?;
        let clamped = level.clamp(1.0, self.config.max_congestion);
        self.nodes[node].congestion = clamped;
        self.refresh_incident(node, |station| snapshot_kind(weather, station));
        debug!(station = %name, level = clamped, "congestion updated");
        Ok(())
    }

    /// Recompute every edge weight from the given weather snapshot.
    pub fn refresh_weights(&mut self, weather: &WeatherSnapshot) {
        self.refresh_weights_with(|station| snapshot_kind(weather, station));
    }

    /// Recompute every edge weight with an arbitrary per-station
    /// weather view (used by the clear-sky diagnostic).
    pub fn refresh_weights_with<F>(&mut self, kind_of: F)
    where
        F: Fn(&StationName) -> WeatherKind,
    {
        for index in 0..self.edges.len() {
            self.edges[index].weight_minutes = self.compute_weight(index, &kind_of);
        }
    }

    fn refresh_incident<F>(&mut self, node: usize, kind_of: F)
    where
        F: Fn(&StationName) -> WeatherKind,
    {
        let incident: Vec<usize> = self.adjacency[node].iter().map(|(_, e)| *e).collect();
        for index in incident {
            self.edges[index].weight_minutes = self.compute_weight(index, &kind_of);
        }
    }

    fn compute_weight<F>(&self, edge_index: usize, kind_of: &F) -> f64
    where
        F: Fn(&StationName) -> WeatherKind,
    {
        let edge = &self.edges[edge_index];
        let a = self.endpoint_conditions(edge.a, kind_of);
        let b = self.endpoint_conditions(edge.b, kind_of);
        match &edge.line {
            EdgeLine::Line { transport, .. } => {
                weight::travel_minutes(&self.config, Some(edge.distance_km), *transport, a, b)
            }
            EdgeLine::Transfer => weight::transfer_minutes(&self.config, a, b),
        }
    }

    fn endpoint_conditions<F>(&self, node: usize, kind_of: &F) -> EndpointConditions
    where
        F: Fn(&StationName) -> WeatherKind,
    {
        let station = &self.nodes[node];
        EndpointConditions {
            weather: kind_of(&station.name),
            closed: station.status.is_closed(),
            congestion: station.congestion,
        }
    }

    /// Copy of all current edge weights, in edge order.
    pub fn edge_weights(&self) -> Vec<f64> {
        self.edges.iter().map(|e| e.weight_minutes).collect()
    }

    /// Restore weights previously captured with [`edge_weights`].
    ///
    /// [`edge_weights`]: StationGraph::edge_weights
    pub fn restore_weights(&mut self, weights: &[f64]) {
        debug_assert_eq!(weights.len(), self.edges.len());
        for (edge, weight) in self.edges.iter_mut().zip(weights) {
            edge.weight_minutes = *weight;
        }
    }
}

fn snapshot_kind(weather: &WeatherSnapshot, station: &StationName) -> WeatherKind {
    weather
        .get(station)
        .map(|reading| reading.kind)
        .unwrap_or(WeatherKind::Clear)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology;

    fn name(s: &str) -> StationName {
        StationName::parse(s).unwrap()
    }

    /// Medellín graph under all-clear weather.
    fn clear_graph() -> StationGraph {
        StationGraph::build(
            &topology::medellin(),
            &WeatherSnapshot::new(),
            WeightConfig::default(),
        )
    }

    #[test]
    fn build_dedups_stations_and_counts_edges() {
        let topology = topology::medellin();
        let graph = clear_graph();
        assert_eq!(graph.node_count(), topology.stations().len());

        let line_edges: usize = topology.lines().iter().map(|l| l.stations.len() - 1).sum();
        assert_eq!(graph.edge_count(), line_edges + topology.transfers().len());

        // A transfer station is a single node with several lines.
        let san_antonio = graph.station(&name("San Antonio")).unwrap();
        assert!(san_antonio.lines().len() >= 3);
    }

    #[test]
    fn every_weight_at_least_the_floor() {
        let graph = clear_graph();
        let floor = graph.config().minimum_edge_minutes;
        for index in 0..graph.edge_count() {
            assert!(graph.edge(index).weight_minutes() >= floor);
        }
    }

    #[test]
    fn coincident_tram_stops_get_the_floor() {
        // Pabellón del Agua EPM and Bicentenario share coordinates.
        let graph = clear_graph();
        let a = graph.node_index(&name("Pabellón del Agua EPM")).unwrap();
        let b = graph.node_index(&name("Bicentenario")).unwrap();
        let edge = graph.edge_between(a, b).unwrap();
        assert_eq!(edge.distance_km(), 0.0);
        assert_eq!(
            edge.weight_minutes(),
            graph.config().minimum_edge_minutes
        );
    }

    #[test]
    fn close_pushes_incident_edges_to_sentinel() {
        let mut graph = clear_graph();
        let station = name("San Antonio");
        graph.close_station(&station, "maintenance").unwrap();

        let node = graph.node_index(&station).unwrap();
        assert!(graph.node(node).status().is_closed());
        let sentinel = graph.config().unreachable_minutes;
        for (_, edge) in graph.neighbors(node).to_vec() {
            assert_eq!(graph.edge(edge).weight_minutes(), sentinel);
        }

        // Reopening restores finite weights.
        graph
            .open_station(&station, &WeatherSnapshot::new())
            .unwrap();
        for (_, edge) in graph.neighbors(node).to_vec() {
            assert!(graph.edge(edge).weight_minutes() < sentinel);
        }
    }

    #[test]
    fn unknown_station_is_an_error_not_a_panic() {
        let mut graph = clear_graph();
        let ghost = name("Estación Fantasma");
        assert!(graph.close_station(&ghost, "x").is_err());
        assert!(graph.open_station(&ghost, &WeatherSnapshot::new()).is_err());
        assert!(
            graph
                .set_congestion(&ghost, 1.5, &WeatherSnapshot::new())
                .is_err()
        );
        assert!(graph.station(&ghost).is_none());
    }

    #[test]
    fn congestion_scales_and_clamps() {
        let mut graph = clear_graph();
        let station = name("Poblado");
        let node = graph.node_index(&station).unwrap();
        let (_, edge) = graph.neighbors(node)[0];
        let before = graph.edge(edge).weight_minutes();

        graph
            .set_congestion(&station, 5.0, &WeatherSnapshot::new())
            .unwrap();
        assert_eq!(graph.node(node).congestion(), 2.0);
        let after = graph.edge(edge).weight_minutes();
        assert!((after - before * 2.0).abs() < 1e-9);
    }

    #[test]
    fn storm_slows_every_line_edge() {
        let mut graph = clear_graph();
        let floor = graph.config().minimum_edge_minutes;
        let clear = graph.edge_weights();
        graph.refresh_weights_with(|_| WeatherKind::Stormy);
        for (index, before) in clear.iter().enumerate() {
            let after = graph.edge(index).weight_minutes();
            match graph.edge(index).line() {
                // Edges already pinned at the floor (coincident
                // coordinates) stay there; everything else slows down.
                EdgeLine::Line { .. } if *before > floor => assert!(after > *before),
                EdgeLine::Line { .. } => assert_eq!(after, *before),
                // Walking transfers are not weather-scaled.
                EdgeLine::Transfer => assert_eq!(after, *before),
            }
        }
    }

    #[test]
    fn restore_weights_roundtrips() {
        let mut graph = clear_graph();
        let saved = graph.edge_weights();
        graph.refresh_weights_with(|_| WeatherKind::Stormy);
        assert_ne!(graph.edge_weights(), saved);
        graph.restore_weights(&saved);
        assert_eq!(graph.edge_weights(), saved);
    }

    #[test]
    fn edge_between_is_symmetric() {
        let graph = clear_graph();
        let a = graph.node_index(&name("Niquía")).unwrap();
        let b = graph.node_index(&name("Bello")).unwrap();
        assert!(graph.edge_between(a, b).is_some());
        assert!(graph.edge_between(b, a).is_some());
        let c = graph.node_index(&name("Arví")).unwrap();
        assert!(graph.edge_between(a, c).is_none());
    }
}

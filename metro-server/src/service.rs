//! The metro system facade.
//!
//! Composes the topology, the station graph, the weather simulator and
//! the route history behind one shared handle, and owns the update
//! broadcast channel plus the periodic weather task.
//!
//! Concurrency policy: the graph's weight state is the one piece of
//! shared mutable data. Every mutation (weather refresh, closure,
//! congestion change, the impact diagnostic) runs under the graph
//! write lock as a single recompute-and-swap step, so concurrent route
//! queries — which share the read lock — observe either the old or the
//! new weight of an edge, never a half-applied one. Lock order is
//! always weather, then graph, then history.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock, broadcast, watch};
use tracing::{debug, info};

use crate::domain::StationName;
use crate::graph::{StationGraph, StationNode, UnknownStation};
use crate::planner::{
    self, NearestStation, RouteError, RouteHistory, RouteRecord, WeatherImpactReport,
};
use crate::topology::{Line, Topology};
use crate::weather::{WeatherSimulator, WeatherSnapshot};
use crate::weight::WeightConfig;

/// Capacity of the update broadcast channel. Slow subscribers that lag
/// behind this many events see a `Lagged` error, not blocked producers.
const UPDATE_CHANNEL_CAPACITY: usize = 32;

/// Tunables for the whole system.
#[derive(Debug, Clone)]
pub struct SystemConfig {
    pub weights: WeightConfig,
    /// Bounded route history size.
    pub history_capacity: usize,
    /// Minimum interval between effective weather refreshes.
    pub weather_refresh: chrono::Duration,
    /// Seed for the weather simulation; a fixed seed reproduces the
    /// same weather sequence.
    pub weather_seed: u64,
    /// Period of the background weather task.
    pub tick_period: std::time::Duration,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            weights: WeightConfig::default(),
            history_capacity: 10,
            weather_refresh: chrono::Duration::seconds(15),
            weather_seed: 42,
            tick_period: std::time::Duration::from_secs(15),
        }
    }
}

/// A weather refresh as published to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherUpdate {
    pub conditions: WeatherSnapshot,
    pub stations_reporting: usize,
    pub updated_at: DateTime<Utc>,
}

/// Events published on the update channel.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    WeatherUpdated(Arc<WeatherUpdate>),
    RoutePlanned(Arc<RouteRecord>),
}

/// Shared service state. Cheap to clone behind an `Arc`.
pub struct MetroSystem {
    topology: Topology,
    config: SystemConfig,
    graph: RwLock<StationGraph>,
    weather: Mutex<WeatherSimulator>,
    history: Mutex<RouteHistory>,
    updates: broadcast::Sender<SystemEvent>,
}

impl MetroSystem {
    /// Build the system from a validated topology.
    ///
    /// The graph and the simulator are constructed independently; the
    /// graph pulls weather through snapshots passed into each refresh,
    /// so neither component references the other.
    pub fn new(topology: Topology, config: SystemConfig) -> Self {
        let weather =
            WeatherSimulator::new(&topology, config.weather_refresh, config.weather_seed);
        let graph = StationGraph::build(&topology, weather.snapshot(), config.weights.clone());
        let history = RouteHistory::new(config.history_capacity);
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        info!(
            stations = graph.node_count(),
            edges = graph.edge_count(),
            "metro system initialized"
        );
        Self {
            topology,
            config,
            graph: RwLock::new(graph),
            weather: Mutex::new(weather),
            history: Mutex::new(history),
            updates,
        }
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Lines with their station sequences and colors.
    pub fn lines(&self) -> &[Line] {
        self.topology.lines()
    }

    /// Subscribe to weather and route updates.
    pub fn subscribe(&self) -> broadcast::Receiver<SystemEvent> {
        self.updates.subscribe()
    }

    /// Plan the fastest route under current conditions and record it
    /// in the history.
    pub async fn find_route(
        &self,
        origin: &StationName,
        destination: &StationName,
    ) -> Result<RouteRecord, RouteError> {
        let snapshot = self.weather.lock().await.snapshot().clone();
        let summary = {
            let graph = self.graph.read().await;
            planner::plan_route(&graph, &snapshot, origin, destination)?
        };
        let record = self.history.lock().await.record(summary);
        let _ = self
            .updates
            .send(SystemEvent::RoutePlanned(Arc::new(record.clone())));
        Ok(record)
    }

    /// The station closest to a coordinate.
    pub async fn nearest_station(&self, latitude: f64, longitude: f64) -> Option<NearestStation> {
        let graph = self.graph.read().await;
        planner::nearest_station(&graph, latitude, longitude)
    }

    /// Compare a route against forced clear skies. Leaves the graph's
    /// weights untouched; runs under the write lock so no query
    /// observes the temporary clear-sky weights.
    pub async fn weather_impact(
        &self,
        origin: &StationName,
        destination: &StationName,
    ) -> Result<WeatherImpactReport, RouteError> {
        let snapshot = self.weather.lock().await.snapshot().clone();
        let mut graph = self.graph.write().await;
        planner::weather_impact(&mut graph, &snapshot, origin, destination)
    }

    pub async fn close_station(
        &self,
        station: &StationName,
        reason: &str,
    ) -> Result<(), UnknownStation> {
        self.graph.write().await.close_station(station, reason)
    }

    pub async fn open_station(&self, station: &StationName) -> Result<(), UnknownStation> {
        let snapshot = self.weather.lock().await.snapshot().clone();
        self.graph.write().await.open_station(station, &snapshot)
    }

    pub async fn set_congestion(
        &self,
        station: &StationName,
        level: f64,
    ) -> Result<(), UnknownStation> {
        let snapshot = self.weather.lock().await.snapshot().clone();
        self.graph
            .write()
            .await
            .set_congestion(station, level, &snapshot)
    }

    /// Advance the weather simulation and refresh edge weights.
    ///
    /// Safe to call on demand: inside the refresh window the cached
    /// conditions are returned and neither the graph nor subscribers
    /// are touched.
    pub async fn tick_weather(&self) -> Arc<WeatherUpdate> {
        let (refreshed, snapshot, updated_at) = {
            let mut weather = self.weather.lock().await;
            let refreshed = weather.tick();
            (
                refreshed,
                weather.snapshot().clone(),
                weather.last_refresh().unwrap_or_else(Utc::now),
            )
        };

        if refreshed {
            self.graph.write().await.refresh_weights(&snapshot);
        }

        let update = Arc::new(WeatherUpdate {
            stations_reporting: snapshot.len(),
            conditions: snapshot,
            updated_at,
        });
        if refreshed {
            let _ = self
                .updates
                .send(SystemEvent::WeatherUpdated(update.clone()));
        }
        update
    }

    /// Current conditions without advancing the simulation.
    pub async fn current_weather(&self) -> Arc<WeatherUpdate> {
        let weather = self.weather.lock().await;
        Arc::new(WeatherUpdate {
            conditions: weather.snapshot().clone(),
            stations_reporting: weather.snapshot().len(),
            updated_at: weather.last_refresh().unwrap_or_else(Utc::now),
        })
    }

    /// All stations with their runtime state.
    pub async fn stations(&self) -> Vec<StationNode> {
        self.graph.read().await.nodes().to_vec()
    }

    /// Recorded routes, most recent first.
    pub async fn history(&self) -> Vec<RouteRecord> {
        self.history.lock().await.records().cloned().collect()
    }
}

/// Spawn the periodic weather task.
///
/// Ticks every `config.tick_period` until the shutdown channel flips;
/// the task holds no lock while sleeping, so shutdown never waits on a
/// tick in progress for longer than one refresh.
pub fn spawn_weather_task(
    system: Arc<MetroSystem>,
    mut shutdown: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(system.config().tick_period);
        // The first interval tick completes immediately; consume it so
        // the loop waits a full period before the first refresh.
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let update = system.tick_weather().await;
                    debug!(
                        stations = update.stations_reporting,
                        "periodic weather tick"
                    );
                }
                _ = shutdown.changed() => {
                    info!("weather task stopping");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology;

    fn name(s: &str) -> StationName {
        StationName::parse(s).unwrap()
    }

    fn system() -> MetroSystem {
        MetroSystem::new(topology::medellin(), SystemConfig::default())
    }

    #[tokio::test]
    async fn find_route_records_history_newest_first() {
        let system = system();
        let first = system
            .find_route(&name("Niquía"), &name("Poblado"))
            .await
            .unwrap();
        let second = system
            .find_route(&name("San Javier"), &name("Arví"))
            .await
            .unwrap();

        let history = system.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].id, first.id);
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn history_stays_bounded() {
        let system = system();
        for _ in 0..15 {
            system
                .find_route(&name("Niquía"), &name("Bello"))
                .await
                .unwrap();
        }
        let history = system.history().await;
        assert_eq!(history.len(), system.config().history_capacity);
        assert_eq!(history[0].id, 14);
    }

    #[tokio::test]
    async fn closing_the_only_connector_disconnects() {
        let system = system();

        system.close_station(&name("Acevedo"), "landslide").await.unwrap();
        let err = system
            .find_route(&name("Niquía"), &name("Arví"))
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::NoPath { .. }));

        system.open_station(&name("Acevedo")).await.unwrap();
        assert!(
            system
                .find_route(&name("Niquía"), &name("Arví"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn admin_ops_reject_unknown_stations() {
        let system = system();
        let ghost = name("Fantasma");
        assert!(system.close_station(&ghost, "x").await.is_err());
        assert!(system.open_station(&ghost).await.is_err());
        assert!(system.set_congestion(&ghost, 1.5).await.is_err());
    }

    #[tokio::test]
    async fn tick_covers_all_stations_and_broadcasts() {
        let system = system();
        let mut updates = system.subscribe();

        let update = system.tick_weather().await;
        assert_eq!(
            update.stations_reporting,
            system.topology().stations().len()
        );

        match updates.try_recv() {
            Ok(SystemEvent::WeatherUpdated(event)) => {
                assert_eq!(event.conditions.len(), update.conditions.len());
            }
            other => panic!("expected a weather update, got {other:?}"),
        }

        // Inside the refresh window: cached conditions, no broadcast.
        let cached = system.tick_weather().await;
        assert_eq!(cached.conditions, update.conditions);
        assert!(updates.try_recv().is_err());
    }

    #[tokio::test]
    async fn route_events_are_broadcast() {
        let system = system();
        let mut updates = system.subscribe();
        let record = system
            .find_route(&name("Niquía"), &name("Bello"))
            .await
            .unwrap();
        match updates.try_recv() {
            Ok(SystemEvent::RoutePlanned(event)) => assert_eq!(event.id, record.id),
            other => panic!("expected a route event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn weather_task_stops_on_shutdown() {
        let config = SystemConfig {
            tick_period: std::time::Duration::from_millis(10),
            ..SystemConfig::default()
        };
        let system = Arc::new(MetroSystem::new(topology::medellin(), config));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = spawn_weather_task(system, shutdown_rx);

        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        shutdown_tx.send(true).unwrap();

        tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .expect("task should stop promptly")
            .expect("task should not panic");
    }
}

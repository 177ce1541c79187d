//! Simulated weather monitoring.
//!
//! Every station carries a virtual weather sensor. On each refresh the
//! sensor's state advances through a Markov chain over the four weather
//! states and emits a fresh set of readings. Refreshes are rate-limited:
//! a tick inside the minimum refresh window returns the cached
//! conditions unchanged, which bounds recomputation and gives clients a
//! stable read between ticks.
//!
//! The RNG is seeded (`ChaCha8Rng`), and sensors advance in `BTreeMap`
//! order, so a fixed seed produces a reproducible weather sequence.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::domain::{StationName, WeatherKind};
use crate::topology::Topology;

/// Health of a station's weather sensor.
///
/// `Degraded` is reserved for sensor-outage simulation; all sensors
/// currently report `Operational`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    Operational,
    Degraded,
}

/// Instrument readings attached to a weather state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorReadings {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Kilometers.
    pub visibility: f64,
    /// Hectopascals.
    pub pressure: f64,
}

/// The latest simulated conditions at one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReading {
    pub kind: WeatherKind,
    /// Uniform in [0.8, 1.0], independent of the state.
    pub intensity: f64,
    pub readings: SensorReadings,
    pub sensor_id: String,
    pub status: SensorStatus,
    pub updated_at: DateTime<Utc>,
}

/// Conditions for every station, keyed by name.
pub type WeatherSnapshot = BTreeMap<StationName, WeatherReading>;

/// Markov transition row for a state. Rows sum to 1.
fn transitions(kind: WeatherKind) -> [(WeatherKind, f64); 4] {
    use WeatherKind::*;
    match kind {
        Clear => [(Clear, 0.7), (Cloudy, 0.2), (Rainy, 0.1), (Stormy, 0.0)],
        Cloudy => [(Clear, 0.2), (Cloudy, 0.5), (Rainy, 0.2), (Stormy, 0.1)],
        Rainy => [(Clear, 0.1), (Cloudy, 0.2), (Rainy, 0.5), (Stormy, 0.2)],
        Stormy => [(Clear, 0.0), (Cloudy, 0.2), (Rainy, 0.3), (Stormy, 0.5)],
    }
}

fn temperature_range(kind: WeatherKind) -> (f64, f64) {
    match kind {
        WeatherKind::Clear => (22.0, 30.0),
        WeatherKind::Cloudy => (18.0, 25.0),
        WeatherKind::Rainy => (15.0, 22.0),
        WeatherKind::Stormy => (12.0, 20.0),
    }
}

fn humidity_range(kind: WeatherKind) -> (f64, f64) {
    match kind {
        WeatherKind::Clear => (30.0, 60.0),
        WeatherKind::Cloudy => (50.0, 80.0),
        WeatherKind::Rainy => (70.0, 95.0),
        WeatherKind::Stormy => (80.0, 100.0),
    }
}

fn visibility_range(kind: WeatherKind) -> (f64, f64) {
    match kind {
        WeatherKind::Clear => (8.0, 10.0),
        WeatherKind::Cloudy => (5.0, 8.0),
        WeatherKind::Rainy => (3.0, 6.0),
        WeatherKind::Stormy => (1.0, 4.0),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

struct Sensor {
    id: String,
    kind: WeatherKind,
    status: SensorStatus,
}

/// Per-station Markov weather simulation with a rate-limited refresh.
pub struct WeatherSimulator {
    sensors: BTreeMap<StationName, Sensor>,
    cache: WeatherSnapshot,
    last_refresh: Option<DateTime<Utc>>,
    refresh_interval: Duration,
    rng: ChaCha8Rng,
}

impl WeatherSimulator {
    /// Create a simulator for every station in the topology.
    ///
    /// All stations start clear; the first tick advances the chains.
    /// The same seed over the same topology produces the same weather
    /// sequence.
    pub fn new(topology: &Topology, refresh_interval: Duration, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let now = Utc::now();

        let mut sensors = BTreeMap::new();
        let mut cache = BTreeMap::new();
        let mut stations = topology.stations();
        stations.sort();
        for (index, name) in stations.into_iter().enumerate() {
            let sensor = Sensor {
                id: format!("MDE-{:03}", index + 1),
                kind: WeatherKind::Clear,
                status: SensorStatus::Operational,
            };
            cache.insert(name.clone(), read_sensor(&mut rng, &sensor, now));
            sensors.insert(name, sensor);
        }

        Self {
            sensors,
            cache,
            last_refresh: None,
            refresh_interval,
            rng,
        }
    }

    /// The minimum interval between two effective refreshes.
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Time of the last effective refresh.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    /// The latest cached conditions for every station.
    pub fn snapshot(&self) -> &WeatherSnapshot {
        &self.cache
    }

    /// Advance the simulation using the wall clock.
    ///
    /// Returns `true` if the conditions were recomputed, `false` if the
    /// call landed inside the refresh window and the cache was served.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Utc::now())
    }

    /// Advance the simulation at an explicit instant.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> bool {
        if let Some(last) = self.last_refresh {
            if now - last < self.refresh_interval {
                return false;
            }
        }

        // Stations are not spatially correlated: each chain advances
        // independently, in key order so the sequence is seed-stable.
        for (name, sensor) in &mut self.sensors {
            sensor.kind = next_state(&mut self.rng, sensor.kind);
            self.cache
                .insert(name.clone(), read_sensor(&mut self.rng, sensor, now));
        }
        self.last_refresh = Some(now);
        true
    }
}

/// Weighted choice of the next state from the current state's row.
fn next_state(rng: &mut ChaCha8Rng, current: WeatherKind) -> WeatherKind {
    let row = transitions(current);
    let roll: f64 = rng.gen_range(0.0..1.0);
    let mut acc = 0.0;
    for (kind, probability) in row {
        acc += probability;
        if roll < acc {
            return kind;
        }
    }
    // Rounding left a sliver at the top of the row.
    row[row.len() - 1].0
}

fn read_sensor(rng: &mut ChaCha8Rng, sensor: &Sensor, now: DateTime<Utc>) -> WeatherReading {
    let (t_lo, t_hi) = temperature_range(sensor.kind);
    let (h_lo, h_hi) = humidity_range(sensor.kind);
    let (v_lo, v_hi) = visibility_range(sensor.kind);
    WeatherReading {
        kind: sensor.kind,
        intensity: rng.gen_range(0.8..=1.0),
        readings: SensorReadings {
            temperature: round1(rng.gen_range(t_lo..=t_hi)),
            humidity: round1(rng.gen_range(h_lo..=h_hi)),
            visibility: round1(rng.gen_range(v_lo..=v_hi)),
            pressure: round1(rng.gen_range(1008.0..=1020.0)),
        },
        sensor_id: sensor.id.clone(),
        status: sensor.status,
        updated_at: now,
    }
}

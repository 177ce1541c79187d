//! Edge weight model.
//!
//! An edge's weight is the current traversal cost in minutes, distinct
//! from its static geographic distance. It is computed from distance,
//! the line's transport speed, the worse of the two endpoints' weather,
//! and the admin overrides (congestion, closure) on those endpoints.

use crate::domain::{TransportKind, WeatherKind};

/// Tunable constants of the weight model.
#[derive(Debug, Clone)]
pub struct WeightConfig {
    /// Weight floor in minutes. Keeps coincident-coordinate edges from
    /// producing zero-weight (or negative) edges.
    pub minimum_edge_minutes: f64,

    /// Weight assigned to edges incident to a closed station. Large
    /// enough to lose to any real alternative, finite so the search
    /// stays well-defined.
    pub unreachable_minutes: f64,

    /// Fallback weight when an endpoint has no usable coordinates.
    pub neutral_edge_minutes: f64,

    /// Upper clamp for a station's congestion multiplier.
    pub max_congestion: f64,

    /// Base walk time of an explicit transfer edge, minutes.
    pub transfer_walk_minutes: f64,

    /// Penalty added during route assembly each time the traversed
    /// line changes at a station.
    pub transfer_penalty_minutes: f64,

    /// Speed used to convert nearest-station distance to walking time.
    pub walking_speed_kmh: f64,

    /// Congestion level above which a route reports an alert for a
    /// station on its path.
    pub congestion_alert_threshold: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            minimum_edge_minutes: 0.5,
            unreachable_minutes: 1.0e6,
            neutral_edge_minutes: 1.0,
            max_congestion: 2.0,
            transfer_walk_minutes: 3.0,
            transfer_penalty_minutes: 3.0,
            walking_speed_kmh: 5.0,
            congestion_alert_threshold: 1.3,
        }
    }
}

/// Base cruising speed per transport kind, km/h.
pub fn base_speed_kmh(kind: TransportKind) -> f64 {
    match kind {
        TransportKind::Metro => 35.0,
        TransportKind::Cable => 15.0,
        TransportKind::Tram => 20.0,
        TransportKind::Bus => 25.0,
    }
}

/// Speed multiplier for a transport kind under a weather state.
///
/// Aerial cable cars degrade hardest under storms (operational
/// suspension risk); heavy rail is the most weather-tolerant.
pub fn weather_factor(kind: TransportKind, weather: WeatherKind) -> f64 {
    use TransportKind::*;
    use WeatherKind::*;
    match (kind, weather) {
        (Metro, Clear) => 1.0,
        (Metro, Cloudy) => 0.95,
        (Metro, Rainy) => 0.85,
        (Metro, Stormy) => 0.70,
        (Cable, Clear) => 1.0,
        (Cable, Cloudy) => 0.90,
        (Cable, Rainy) => 0.70,
        (Cable, Stormy) => 0.40,
        (Tram, Clear) => 1.0,
        (Tram, Cloudy) => 0.95,
        (Tram, Rainy) => 0.80,
        (Tram, Stormy) => 0.60,
        (Bus, Clear) => 1.0,
        (Bus, Cloudy) => 0.90,
        (Bus, Rainy) => 0.75,
        (Bus, Stormy) => 0.55,
    }
}

/// Percentage slowdown vs clear weather for a transport kind.
pub fn slowdown_percent(kind: TransportKind, weather: WeatherKind) -> f64 {
    ((1.0 - weather_factor(kind, weather)) * 100.0).round()
}

/// Runtime conditions at one edge endpoint.
#[derive(Debug, Clone, Copy)]
pub struct EndpointConditions {
    pub weather: WeatherKind,
    pub closed: bool,
    pub congestion: f64,
}

impl EndpointConditions {
    /// An open, uncongested endpoint under the given weather.
    pub fn open(weather: WeatherKind) -> Self {
        Self {
            weather,
            closed: false,
            congestion: 1.0,
        }
    }
}

fn clamped_congestion(config: &WeightConfig, level: f64) -> f64 {
    level.clamp(1.0, config.max_congestion)
}

/// Travel time in minutes for a line edge.
///
/// Closure of either endpoint overrides everything to the unreachable
/// sentinel. A missing distance (unknown coordinates) yields the
/// neutral default rather than failing the edge. The result is always
/// at least the configured floor.
pub fn travel_minutes(
    config: &WeightConfig,
    distance_km: Option<f64>,
    transport: TransportKind,
    a: EndpointConditions,
    b: EndpointConditions,
) -> f64 {
    if a.closed || b.closed {
        return config.unreachable_minutes;
    }

    let base = match distance_km {
        Some(distance) => {
            // The slower endpoint governs the whole segment.
            let factor =
                weather_factor(transport, a.weather).min(weather_factor(transport, b.weather));
            let speed = base_speed_kmh(transport) * factor;
            (distance / speed) * 60.0
        }
        None => config.neutral_edge_minutes,
    };

    let weighted = base
        * clamped_congestion(config, a.congestion)
        * clamped_congestion(config, b.congestion);
    weighted.max(config.minimum_edge_minutes)
}

/// Travel time in minutes for an explicit transfer edge.
///
/// Transfers are walks between distinct stations: no transport kind to
/// degrade, so weather does not apply, but congestion and closure do.
pub fn transfer_minutes(
    config: &WeightConfig,
    a: EndpointConditions,
    b: EndpointConditions,
) -> f64 {
    if a.closed || b.closed {
        return config.unreachable_minutes;
    }
    let weighted = config.transfer_walk_minutes
        * clamped_congestion(config, a.congestion)
        * clamped_congestion(config, b.congestion);
    weighted.max(config.minimum_edge_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> WeightConfig {
        WeightConfig::default()
    }

    #[test]
    fn clear_weather_uses_base_speed() {
        // 7 km of metro at 35 km/h is 12 minutes.
        let t = travel_minutes(
            &cfg(),
            Some(7.0),
            TransportKind::Metro,
            EndpointConditions::open(WeatherKind::Clear),
            EndpointConditions::open(WeatherKind::Clear),
        );
        assert!((t - 12.0).abs() < 1e-9);
    }

    #[test]
    fn worse_endpoint_weather_governs() {
        let stormy_side = travel_minutes(
            &cfg(),
            Some(3.0),
            TransportKind::Cable,
            EndpointConditions::open(WeatherKind::Stormy),
            EndpointConditions::open(WeatherKind::Clear),
        );
        let both_stormy = travel_minutes(
            &cfg(),
            Some(3.0),
            TransportKind::Cable,
            EndpointConditions::open(WeatherKind::Stormy),
            EndpointConditions::open(WeatherKind::Stormy),
        );
        assert_eq!(stormy_side, both_stormy);

        // Cable under storm runs at 40% of base speed.
        let clear = travel_minutes(
            &cfg(),
            Some(3.0),
            TransportKind::Cable,
            EndpointConditions::open(WeatherKind::Clear),
            EndpointConditions::open(WeatherKind::Clear),
        );
        assert!((stormy_side - clear / 0.40).abs() < 1e-9);
    }

    #[test]
    fn cable_degrades_harder_than_metro_in_storm() {
        assert!(
            weather_factor(TransportKind::Cable, WeatherKind::Stormy)
                < weather_factor(TransportKind::Metro, WeatherKind::Stormy)
        );
    }

    #[test]
    fn factors_decrease_with_severity() {
        for kind in TransportKind::ALL {
            let factors: Vec<f64> = WeatherKind::ALL
                .iter()
                .map(|w| weather_factor(kind, *w))
                .collect();
            for pair in factors.windows(2) {
                assert!(pair[0] > pair[1], "{kind}: {factors:?}");
            }
        }
    }

    #[test]
    fn closure_is_the_sentinel() {
        let mut closed = EndpointConditions::open(WeatherKind::Clear);
        closed.closed = true;
        let t = travel_minutes(
            &cfg(),
            Some(1.0),
            TransportKind::Metro,
            closed,
            EndpointConditions::open(WeatherKind::Clear),
        );
        assert_eq!(t, cfg().unreachable_minutes);

        // Closure wins over congestion too.
        closed.congestion = 1.9;
        let t = transfer_minutes(&cfg(), closed, EndpointConditions::open(WeatherKind::Clear));
        assert_eq!(t, cfg().unreachable_minutes);
    }

    #[test]
    fn congestion_is_clamped() {
        let mut jammed = EndpointConditions::open(WeatherKind::Clear);
        jammed.congestion = 5.0;
        let t = travel_minutes(
            &cfg(),
            Some(7.0),
            TransportKind::Metro,
            jammed,
            EndpointConditions::open(WeatherKind::Clear),
        );
        // 12 minutes doubled at most.
        assert!((t - 24.0).abs() < 1e-9);

        // Sub-1.0 levels never speed an edge up.
        jammed.congestion = 0.1;
        let t = travel_minutes(
            &cfg(),
            Some(7.0),
            TransportKind::Metro,
            jammed,
            EndpointConditions::open(WeatherKind::Clear),
        );
        assert!((t - 12.0).abs() < 1e-9);
    }

    #[test]
    fn coincident_stations_hit_the_floor() {
        let t = travel_minutes(
            &cfg(),
            Some(0.0),
            TransportKind::Tram,
            EndpointConditions::open(WeatherKind::Clear),
            EndpointConditions::open(WeatherKind::Clear),
        );
        assert_eq!(t, cfg().minimum_edge_minutes);
    }

    #[test]
    fn missing_coordinates_use_neutral_default() {
        let t = travel_minutes(
            &cfg(),
            None,
            TransportKind::Bus,
            EndpointConditions::open(WeatherKind::Stormy),
            EndpointConditions::open(WeatherKind::Clear),
        );
        assert_eq!(t, cfg().neutral_edge_minutes);
    }

    #[test]
    fn slowdown_percent_matches_factor() {
        assert_eq!(
            slowdown_percent(TransportKind::Cable, WeatherKind::Stormy),
            60.0
        );
        assert_eq!(slowdown_percent(TransportKind::Metro, WeatherKind::Clear), 0.0);
    }
}

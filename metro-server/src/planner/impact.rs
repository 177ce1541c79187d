//! Clear-sky comparison diagnostic.

use serde::Serialize;

use crate::domain::{StationName, WeatherKind};
use crate::graph::StationGraph;
use crate::weather::WeatherSnapshot;

use super::route::{ClearSky, ConditionView, RouteError, plan_route};

/// Conditions at one station along the compared route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationWeather {
    pub station: StationName,
    pub weather: WeatherKind,
    pub label: String,
}

/// How much the current weather is costing a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherImpactReport {
    /// The route under current conditions.
    pub path: Vec<StationName>,
    pub minutes_with_weather: f64,
    pub minutes_clear: f64,
    pub delay_minutes: f64,
    pub delay_percent: f64,
    pub conditions: Vec<StationWeather>,
}

/// Compare a route under current weather against the same query under
/// forced clear skies.
///
/// This is a read-only diagnostic: edge weights are captured before the
/// clear-sky recomputation and restored unconditionally afterwards, so
/// the graph leaves this function byte-for-byte as it entered — also
/// when the clear-sky search itself fails.
pub fn weather_impact(
    graph: &mut StationGraph,
    weather: &WeatherSnapshot,
    origin: &StationName,
    destination: &StationName,
) -> Result<WeatherImpactReport, RouteError> {
    let with_weather = plan_route(graph, weather, origin, destination)?;

    let saved = graph.edge_weights();
    graph.refresh_weights_with(|_| WeatherKind::Clear);
    let clear_result = plan_route(graph, &ClearSky, origin, destination);
    graph.restore_weights(&saved);
    let clear = clear_result?;

    let delay_minutes = with_weather.estimated_minutes - clear.estimated_minutes;
    let delay_percent = if clear.estimated_minutes > 0.0 {
        (delay_minutes / clear.estimated_minutes) * 100.0
    } else {
        0.0
    };

    let conditions = with_weather
        .path
        .iter()
        .map(|station| {
            let kind = weather.kind(station);
            StationWeather {
                station: station.clone(),
                weather: kind,
                label: kind.label().to_string(),
            }
        })
        .collect();

    Ok(WeatherImpactReport {
        path: with_weather.path,
        minutes_with_weather: with_weather.estimated_minutes,
        minutes_clear: clear.estimated_minutes,
        delay_minutes,
        delay_percent,
        conditions,
    })
}

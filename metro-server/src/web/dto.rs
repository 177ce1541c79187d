//! Data transfer objects for web requests and responses.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{LineCode, StationName, TransportKind, WeatherKind};
use crate::geo::Coordinate;
use crate::graph::{StationNode, StationStatus};
use crate::planner::{
    NearestStation, RouteRecord, SegmentImpact, StationWeather, WeatherImpactReport,
};
use crate::service::WeatherUpdate;
use crate::topology::Line;
use crate::weather::{SensorReadings, SensorStatus, WeatherReading};

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Query for route planning and the weather-impact diagnostic.
#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub origin: String,
    pub destination: String,
}

/// Body for nearest-station lookup.
#[derive(Debug, Deserialize)]
pub struct NearestStationRequest {
    pub latitude: f64,
    pub longitude: f64,
}

/// Query for the close-station admin action.
#[derive(Debug, Deserialize)]
pub struct CloseStationQuery {
    pub reason: Option<String>,
}

/// Query for the congestion admin action.
#[derive(Debug, Deserialize)]
pub struct CongestionQuery {
    pub level: f64,
}

/// A station with its runtime state.
#[derive(Debug, Serialize)]
pub struct StationDto {
    pub name: StationName,
    pub latitude: f64,
    pub longitude: f64,
    pub lines: Vec<LineCode>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub congestion: f64,
}

impl From<&StationNode> for StationDto {
    fn from(node: &StationNode) -> Self {
        let (status, reason) = match node.status() {
            StationStatus::Open => ("open", None),
            StationStatus::Closed { reason } => ("closed", Some(reason.clone())),
        };
        Self {
            name: node.name().clone(),
            latitude: node.coordinate().latitude,
            longitude: node.coordinate().longitude,
            lines: node.lines().to_vec(),
            status,
            reason,
            congestion: node.congestion(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<StationDto>,
}

/// A line with its station sequence.
#[derive(Debug, Serialize)]
pub struct LineDto {
    pub code: LineCode,
    pub transport: TransportKind,
    pub color: String,
    pub stations: Vec<StationName>,
}

impl From<&Line> for LineDto {
    fn from(line: &Line) -> Self {
        Self {
            code: line.code.clone(),
            transport: line.transport,
            color: line.color.clone(),
            stations: line.stations.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinesResponse {
    pub lines: Vec<LineDto>,
}

/// A station's weather reading plus its display label and icon.
#[derive(Debug, Serialize)]
pub struct WeatherDto {
    pub kind: WeatherKind,
    pub label: &'static str,
    pub icon: &'static str,
    pub intensity: f64,
    pub readings: SensorReadings,
    pub sensor_id: String,
    pub status: SensorStatus,
    pub last_updated: DateTime<Utc>,
}

impl From<&WeatherReading> for WeatherDto {
    fn from(reading: &WeatherReading) -> Self {
        Self {
            kind: reading.kind,
            label: reading.kind.label(),
            icon: reading.kind.icon(),
            intensity: reading.intensity,
            readings: reading.readings,
            sensor_id: reading.sensor_id.clone(),
            status: reading.status,
            last_updated: reading.updated_at,
        }
    }
}

fn weather_map(
    conditions: &BTreeMap<StationName, WeatherReading>,
) -> BTreeMap<StationName, WeatherDto> {
    conditions
        .iter()
        .map(|(name, reading)| (name.clone(), WeatherDto::from(reading)))
        .collect()
}

#[derive(Debug, Serialize)]
pub struct WeatherMetadata {
    pub stations_reporting: usize,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub weather_conditions: BTreeMap<StationName, WeatherDto>,
    pub metadata: WeatherMetadata,
}

impl From<&WeatherUpdate> for WeatherResponse {
    fn from(update: &WeatherUpdate) -> Self {
        Self {
            weather_conditions: weather_map(&update.conditions),
            metadata: WeatherMetadata {
                stations_reporting: update.stations_reporting,
                last_updated: update.updated_at,
            },
        }
    }
}

/// A planned route, rounded for display.
#[derive(Debug, Serialize)]
pub struct RouteDto {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub path: Vec<StationName>,
    pub coordinates: Vec<Coordinate>,
    pub num_stations: usize,
    pub lines: Vec<LineCode>,
    pub transfers: Vec<StationName>,
    pub estimated_minutes: i64,
    pub total_distance_km: f64,
    pub weather_impacts: Vec<SegmentImpact>,
    pub alerts: Vec<String>,
    pub conditions: BTreeMap<StationName, WeatherDto>,
}

impl From<&RouteRecord> for RouteDto {
    fn from(record: &RouteRecord) -> Self {
        let route = &record.route;
        Self {
            id: record.id,
            created_at: record.created_at,
            path: route.path.clone(),
            coordinates: route.coordinates.clone(),
            num_stations: route.segments,
            lines: route.lines.clone(),
            transfers: route.transfers.clone(),
            estimated_minutes: route.estimated_minutes.round() as i64,
            total_distance_km: round2(route.total_distance_km),
            weather_impacts: route.weather_impacts.clone(),
            alerts: route.alerts.clone(),
            conditions: weather_map(&route.conditions),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub route: RouteDto,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub routes: Vec<RouteDto>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct NearestStationResponse {
    pub nearest_station: StationName,
    pub distance_km: f64,
    pub walking_time_minutes: i64,
    pub station_coordinates: Coordinate,
}

impl From<&NearestStation> for NearestStationResponse {
    fn from(nearest: &NearestStation) -> Self {
        Self {
            nearest_station: nearest.station.clone(),
            distance_km: round2(nearest.distance_km),
            walking_time_minutes: nearest.walking_minutes.round() as i64,
            station_coordinates: nearest.coordinate,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImpactResponse {
    pub route: Vec<StationName>,
    pub time_with_weather: i64,
    pub time_clear: i64,
    pub delay_minutes: f64,
    pub delay_percent: f64,
    pub conditions: Vec<StationWeather>,
}

impl From<WeatherImpactReport> for ImpactResponse {
    fn from(report: WeatherImpactReport) -> Self {
        Self {
            route: report.path,
            time_with_weather: report.minutes_with_weather.round() as i64,
            time_clear: report.minutes_clear.round() as i64,
            delay_minutes: round1(report.delay_minutes),
            delay_percent: round1(report.delay_percent),
            conditions: report.conditions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_helpers() {
        assert_eq!(round1(1.26), 1.3);
        assert_eq!(round2(12.3456), 12.35);
    }

    #[test]
    fn weather_dto_serializes_with_label_and_icon() {
        let reading = WeatherReading {
            kind: WeatherKind::Rainy,
            intensity: 0.85,
            readings: SensorReadings {
                temperature: 18.0,
                humidity: 80.0,
                visibility: 4.0,
                pressure: 1012.0,
            },
            sensor_id: "MDE-001".to_string(),
            status: SensorStatus::Operational,
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(WeatherDto::from(&reading)).unwrap();
        assert_eq!(json["kind"], "rainy");
        assert_eq!(json["label"], "Lluvioso");
        assert_eq!(json["icon"], "🌧️");
        assert_eq!(json["status"], "operational");
        assert_eq!(json["readings"]["pressure"], 1012.0);
    }

    #[test]
    fn station_names_serialize_as_plain_strings() {
        let name = StationName::parse("Parque Berrío").unwrap();
        let json = serde_json::to_value(&name).unwrap();
        assert_eq!(json, "Parque Berrío");
    }
}

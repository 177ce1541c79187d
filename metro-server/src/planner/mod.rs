//! Route planning engine.
//!
//! Shortest-path search over the station graph's current weights,
//! route assembly (line sequence, transfers, weather impact
//! annotations, totals), the nearest-station locator, the clear-sky
//! impact diagnostic, and the bounded route history.

mod history;
mod impact;
mod locate;
mod route;
mod search;

pub use history::{RouteHistory, RouteRecord};
pub use impact::{StationWeather, WeatherImpactReport, weather_impact};
pub use locate::{NearestStation, nearest_station};
pub use route::{
    ClearSky, ConditionView, EndpointImpact, RouteError, RouteSummary, SegmentImpact, plan_route,
};

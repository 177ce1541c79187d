//! HTTP surface over the metro system.
//!
//! A thin JSON layer: handlers parse identifiers, call the facade and
//! map its results onto response DTOs. No computation happens here.

pub mod dto;

mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;

//! Metro route planning server.
//!
//! A service that answers: "what is the fastest route between two
//! stations right now?" — over a multi-modal network whose travel
//! times shift with simulated weather, closures and congestion.

pub mod domain;
pub mod geo;
pub mod graph;
pub mod planner;
pub mod service;
pub mod topology;
pub mod weather;
pub mod weight;
pub mod web;

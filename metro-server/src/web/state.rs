//! Application state for the web layer.

use std::sync::Arc;

use crate::service::MetroSystem;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub system: Arc<MetroSystem>,
}

impl AppState {
    pub fn new(system: Arc<MetroSystem>) -> Self {
        Self { system }
    }
}

//! Bounded route history.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::route::RouteSummary;

/// A route stamped with its history id and creation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRecord {
    /// Monotonically increasing; never reused, even after eviction.
    pub id: u64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub route: RouteSummary,
}

/// Fixed-capacity, most-recent-first log of planned routes.
#[derive(Debug, Clone)]
pub struct RouteHistory {
    entries: VecDeque<RouteRecord>,
    capacity: usize,
    next_id: u64,
}

impl RouteHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stamp a route and prepend it, evicting the oldest entry past
    /// capacity.
    pub fn record(&mut self, route: RouteSummary) -> RouteRecord {
        self.record_at(route, Utc::now())
    }

    pub fn record_at(&mut self, route: RouteSummary, now: DateTime<Utc>) -> RouteRecord {
        let record = RouteRecord {
            id: self.next_id,
            created_at: now,
            route,
        };
        self.next_id += 1;
        self.entries.push_front(record.clone());
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
        record
    }

    /// Records, most recent first.
    pub fn records(&self) -> impl Iterator<Item = &RouteRecord> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&RouteRecord> {
        self.entries.front()
    }
}

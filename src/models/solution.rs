//! Solution and solver metadata.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use super::Route;

/// Facts about the search that produced a solution.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SolveMetadata {
    /// Objective value achieved, penalties included.
    pub objective_value: f64,
    /// Wall-clock time spent in the solver.
    pub elapsed: Duration,
    /// `true` if the time budget ran out before a sweep found no improving move.
    pub budget_exhausted: bool,
    /// Improvement sweeps started.
    pub sweeps: usize,
    /// Local-search moves accepted.
    pub accepted_moves: usize,
}

/// A set of routes keyed by vehicle id, plus the orders left unserved.
///
/// Vehicles without orders are omitted. Routes iterate in vehicle-id order.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::Solution;
///
/// let mut sol = Solution::new();
/// sol.add_unserved("O3");
/// assert_eq!(sol.num_routes(), 0);
/// assert_eq!(sol.unserved(), ["O3".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Solution {
    routes: BTreeMap<String, Route>,
    unserved: Vec<String>,
    excluded: Vec<String>,
    metadata: SolveMetadata,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route, replacing any previous route of the same vehicle.
    /// Empty routes are dropped.
    pub fn insert_route(&mut self, route: Route) {
        if route.is_empty() {
            return;
        }
        self.routes.insert(route.vehicle_id().to_string(), route);
    }

    /// Marks an order as unserved.
    pub fn add_unserved(&mut self, order_id: impl Into<String>) {
        self.unserved.push(order_id.into());
    }

    /// Records an excluded order that was left unserved.
    pub fn add_excluded(&mut self, order_id: impl Into<String>) {
        self.excluded.push(order_id.into());
    }

    pub fn set_metadata(&mut self, metadata: SolveMetadata) {
        self.metadata = metadata;
    }

    /// Routes in vehicle-id order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    /// Route assigned to a vehicle, if any.
    pub fn route(&self, vehicle_id: &str) -> Option<&Route> {
        self.routes.get(vehicle_id)
    }

    /// Number of vehicles used.
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// All orders not on any route, excluded ones included.
    pub fn unserved(&self) -> &[String] {
        &self.unserved
    }

    /// Excluded orders actually left unserved.
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    pub fn metadata(&self) -> &SolveMetadata {
        &self.metadata
    }

    pub fn objective_value(&self) -> f64 {
        self.metadata.objective_value
    }

    pub fn total_distance(&self) -> f64 {
        self.routes.values().map(|r| r.distance_km()).sum()
    }

    pub fn total_duration(&self) -> f64 {
        self.routes.values().map(|r| r.duration_minutes()).sum()
    }

    /// Total number of orders served.
    pub fn num_served(&self) -> usize {
        self.routes.values().map(|r| r.len()).sum()
    }
}

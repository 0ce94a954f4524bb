//! Routing problem instance.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Depot, Order, Vehicle};
use crate::distance::TravelMatrices;
use crate::economics::CostConfig;
use crate::error::ModelError;

/// What the solver minimizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    MinimizeDistance,
    MinimizeTime,
    #[default]
    MinimizeCost,
    MinimizeEmissions,
}

/// One validated routing instance.
///
/// Location index 0 in the travel matrices is the depot; order `i` sits at
/// index `i + 1`. A model is immutable once built; derived variants
/// (`with_*`) are new, re-validated models.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::TravelMatrices;
/// use u_dispatch::models::{Depot, DistanceMode, Location, Objective, Order, ProblemModel, Vehicle};
///
/// let depot = Depot::new("D", Location::new("D", 0.0, 0.0));
/// let orders = vec![Order::new("O1", Location::new("O1", 0.1, 0.0), 5.0)];
/// let locations = vec![depot.location().clone(), orders[0].location().clone()];
/// let matrices = TravelMatrices::from_locations(&locations, DistanceMode::Euclidean, 50.0);
///
/// let model = ProblemModel::build(
///     orders,
///     vec![Vehicle::new("V1", 10.0)],
///     depot,
///     matrices,
///     Objective::MinimizeDistance,
///     &[],
/// )
/// .unwrap();
/// assert_eq!(model.num_orders(), 1);
/// assert_eq!(model.fleet(), &[0]);
/// ```
#[derive(Debug, Clone)]
pub struct ProblemModel {
    orders: Vec<Order>,
    vehicles: Vec<Vehicle>,
    depot: Depot,
    matrices: TravelMatrices,
    objective: Objective,
    excluded: Vec<bool>,
    cost_config: CostConfig,
    fleet: Vec<usize>,
}

impl ProblemModel {
    /// Validates the inputs and builds a model with default cost parameters.
    ///
    /// # Errors
    ///
    /// - [`ModelError::DimensionMismatch`] if a matrix is not `(orders + 1)²`
    /// - [`ModelError::UnknownId`] if an exclusion or matrix label names no
    ///   known order
    /// - [`ModelError::InvalidVehicle`] if a capacity or speed is not positive
    /// - [`ModelError::InvalidOrder`] if a demand is not positive or a
    ///   service time is negative
    /// - [`ModelError::DuplicateId`] for repeated order or vehicle ids
    /// - [`ModelError::InvalidMatrix`] for negative or non-finite travel entries
    pub fn build(
        orders: Vec<Order>,
        vehicles: Vec<Vehicle>,
        depot: Depot,
        matrices: TravelMatrices,
        objective: Objective,
        exclusions: &[String],
    ) -> Result<Self, ModelError> {
        let mut excluded = vec![false; orders.len()];
        for id in exclusions {
            let idx = orders
                .iter()
                .position(|o| o.id() == id)
                .ok_or_else(|| ModelError::UnknownId(id.clone()))?;
            excluded[idx] = true;
        }
        Self {
            orders,
            vehicles,
            depot,
            matrices,
            objective,
            excluded,
            cost_config: CostConfig::default(),
            fleet: Vec::new(),
        }
        .validated()
    }

    /// Replaces the cost parameters.
    pub fn with_cost_config(mut self, config: CostConfig) -> Result<Self, ModelError> {
        config.validate()?;
        self.cost_config = config;
        Ok(self)
    }

    /// Derives a model with a different fleet.
    pub fn with_vehicles(&self, vehicles: Vec<Vehicle>) -> Result<Self, ModelError> {
        Self {
            vehicles,
            ..self.clone()
        }
        .validated()
    }

    /// Derives a model with a different objective.
    pub fn with_objective(&self, objective: Objective) -> Self {
        Self {
            objective,
            ..self.clone()
        }
    }

    /// Derives a model whose travel times are multiplied by `factor`.
    pub fn with_travel_time_scale(&self, factor: f64) -> Result<Self, ModelError> {
        Self {
            matrices: self.matrices.with_time_scale(factor),
            ..self.clone()
        }
        .validated()
    }

    fn validated(mut self) -> Result<Self, ModelError> {
        let mut seen = HashSet::new();
        for v in &self.vehicles {
            if !seen.insert(v.id()) {
                return Err(ModelError::DuplicateId(v.id().to_string()));
            }
            if !(v.capacity().is_finite() && v.capacity() > 0.0) {
                return Err(invalid_vehicle(v, "capacity must be positive"));
            }
            if !(v.speed_kmh().is_finite() && v.speed_kmh() > 0.0) {
                return Err(invalid_vehicle(v, "speed must be positive"));
            }
            if !(v.max_duty_minutes().is_finite() && v.max_duty_minutes() >= 0.0) {
                return Err(invalid_vehicle(v, "duty limit must be non-negative"));
            }
            let overrides = [
                ("fixed daily cost", v.fixed_daily_cost()),
                ("cost per km", v.cost_per_km()),
                ("emissions per km", v.emissions_per_km()),
            ];
            for (name, value) in overrides {
                if matches!(value, Some(x) if !(x.is_finite() && x >= 0.0)) {
                    return Err(invalid_vehicle(v, &format!("{name} must be non-negative")));
                }
            }
        }

        let mut seen = HashSet::new();
        for o in &self.orders {
            if !seen.insert(o.id()) {
                return Err(ModelError::DuplicateId(o.id().to_string()));
            }
            if !(o.demand().is_finite() && o.demand() > 0.0) {
                return Err(invalid_order(o, "demand must be positive"));
            }
            if !(o.service_minutes().is_finite() && o.service_minutes() >= 0.0) {
                return Err(invalid_order(o, "service time must be non-negative"));
            }
        }

        let n = self.orders.len() + 1;
        for m in [self.matrices.distance_matrix(), self.matrices.time_matrix()] {
            if m.size() != n || m.len() != n * n {
                return Err(ModelError::DimensionMismatch {
                    expected: n * n,
                    actual: m.len(),
                });
            }
            if let Some((row, col, value)) = m.find_invalid() {
                return Err(ModelError::InvalidMatrix { row, col, value });
            }
        }

        if let Some(labels) = self.matrices.labels() {
            if labels.len() != n {
                return Err(ModelError::DimensionMismatch {
                    expected: n,
                    actual: labels.len(),
                });
            }
            let expected = std::iter::once(self.depot.id()).chain(self.orders.iter().map(|o| o.id()));
            if let Some((label, _)) = labels.iter().zip(expected).find(|(l, e)| l.as_str() != *e) {
                return Err(ModelError::UnknownId(label.clone()));
            }
        }

        let mut fleet: Vec<usize> = (0..self.vehicles.len())
            .filter(|&i| self.vehicles[i].is_available())
            .collect();
        fleet.sort_by(|&a, &b| self.vehicles[a].id().cmp(self.vehicles[b].id()));
        self.fleet = fleet;
        Ok(self)
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order(&self, index: usize) -> &Order {
        &self.orders[index]
    }

    /// Index of the order with the given id.
    pub fn order_index(&self, id: &str) -> Option<usize> {
        self.orders.iter().position(|o| o.id() == id)
    }

    pub fn num_orders(&self) -> usize {
        self.orders.len()
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, index: usize) -> &Vehicle {
        &self.vehicles[index]
    }

    /// Indices of available vehicles, sorted by vehicle id.
    pub fn fleet(&self) -> &[usize] {
        &self.fleet
    }

    pub fn depot(&self) -> &Depot {
        &self.depot
    }

    pub fn matrices(&self) -> &TravelMatrices {
        &self.matrices
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Returns `true` if the order at `index` is soft-excluded.
    pub fn is_excluded(&self, index: usize) -> bool {
        self.excluded[index]
    }

    /// Ids of soft-excluded orders, in input order.
    pub fn excluded_ids(&self) -> Vec<&str> {
        self.orders
            .iter()
            .zip(&self.excluded)
            .filter(|(_, &e)| e)
            .map(|(o, _)| o.id())
            .collect()
    }

    pub fn cost_config(&self) -> &CostConfig {
        &self.cost_config
    }

    /// Cost parameters with the given vehicle's overrides applied.
    pub fn cost_config_for(&self, vehicle_index: usize) -> CostConfig {
        self.cost_config.for_vehicle(&self.vehicles[vehicle_index])
    }

    /// Matrix index of an order.
    pub(crate) fn node(order_index: usize) -> usize {
        order_index + 1
    }
}

fn invalid_vehicle(v: &Vehicle, reason: &str) -> ModelError {
    ModelError::InvalidVehicle {
        vehicle_id: v.id().to_string(),
        reason: reason.to_string(),
    }
}

fn invalid_order(o: &Order, reason: &str) -> ModelError {
    ModelError::InvalidOrder {
        order_id: o.id().to_string(),
        reason: reason.to_string(),
    }
}

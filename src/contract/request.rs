use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::distance::{TravelMatrices, TravelMatrix};
use crate::economics::CostConfig;
use crate::error::ModelError;
use crate::models::{Depot, DistanceMode, Location, Objective, Order, ProblemModel, Vehicle};
use crate::scenario::ParamOverride;
use crate::validation::OperationalLimits;

fn default_speed_kmh() -> f64 {
    40.0
}

/// A routing instance as sent by a caller.
///
/// Matrices are indexed with the depot at 0 and order `i` at `i + 1`.
/// When both are omitted they are approximated from coordinates using
/// `distance_mode` and `speed_kmh`.
///
/// # Examples
///
/// ```
/// use u_dispatch::contract::SolveRequest;
///
/// let json = r#"{
///     "orders": [{"id": "O1", "location": {"id": "O1", "latitude": 0.0, "longitude": 0.1}, "demand": 2}],
///     "vehicles": [{"id": "V1", "capacity": 10}],
///     "depot": {"id": "D", "location": {"id": "D", "latitude": 0.0, "longitude": 0.0}},
///     "distance_matrix": [[0, 5], [5, 0]],
///     "time_matrix": [[0, 10], [10, 0]],
///     "objective": "minimize_distance"
/// }"#;
/// let request: SolveRequest = serde_json::from_str(json).unwrap();
/// let (model, limits) = request.into_model().unwrap();
/// assert_eq!(model.num_orders(), 1);
/// assert_eq!(model.matrices().time(0, 1), 10.0);
/// assert_eq!(limits.max_driver_minutes, 480.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    pub orders: Vec<Order>,
    pub vehicles: Vec<Vehicle>,
    pub depot: Depot,
    #[serde(default)]
    pub distance_matrix: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    pub time_matrix: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    pub distance_mode: DistanceMode,
    #[serde(default = "default_speed_kmh")]
    pub speed_kmh: f64,
    #[serde(default)]
    pub objective: Objective,
    #[serde(default)]
    pub exclusions: Vec<String>,
    /// Falls back to the planner configuration when absent.
    #[serde(default)]
    pub time_budget_seconds: Option<f64>,
    #[serde(default)]
    pub cost: Option<CostConfig>,
    #[serde(default)]
    pub limits: Option<OperationalLimits>,
}

impl SolveRequest {
    /// The requested budget, or `fallback` when none was given or the
    /// value is not a usable number of seconds.
    pub fn time_budget(&self, fallback: Duration) -> Duration {
        self.time_budget_seconds
            .and_then(|s| Duration::try_from_secs_f64(s).ok())
            .unwrap_or(fallback)
    }

    /// Validates the request into a model and the limits to check it
    /// against.
    pub fn into_model(self) -> Result<(ProblemModel, OperationalLimits), ModelError> {
        let n = self.orders.len() + 1;
        let matrices = match (self.distance_matrix, self.time_matrix) {
            (Some(distance), Some(time)) => {
                TravelMatrices::new(TravelMatrix::from_rows(distance)?, TravelMatrix::from_rows(time)?)?
            }
            (None, None) => {
                let locations: Vec<Location> = std::iter::once(self.depot.location().clone())
                    .chain(self.orders.iter().map(|o| o.location().clone()))
                    .collect();
                TravelMatrices::from_locations(&locations, self.distance_mode, self.speed_kmh)
            }
            _ => {
                return Err(ModelError::DimensionMismatch {
                    expected: n * n,
                    actual: 0,
                })
            }
        };

        let model = ProblemModel::build(
            self.orders,
            self.vehicles,
            self.depot,
            matrices,
            self.objective,
            &self.exclusions,
        )?;
        let model = match self.cost {
            Some(cost) => model.with_cost_config(cost)?,
            None => model,
        };
        Ok((model, self.limits.unwrap_or_default()))
    }
}

/// A named variant in a scenario request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub name: String,
    #[serde(default)]
    pub overrides: ParamOverride,
}

/// A baseline instance and the variants to compare against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRequest {
    pub base: SolveRequest,
    #[serde(default)]
    pub scenarios: Vec<ScenarioSpec>,
}

impl ScenarioRequest {
    pub fn variants(&self) -> Vec<(String, ParamOverride)> {
        self.scenarios
            .iter()
            .map(|s| (s.name.clone(), s.overrides.clone()))
            .collect()
    }
}

//! Request and response shapes, and the solve-validate-cost pipeline
//! behind them.
//!
//! - [`plan`]: solve a model, check it against the limits, price it
//! - [`SolveRequest`] / [`SolveResponse`]: a single dispatch run
//! - [`ScenarioRequest`] / [`ScenarioResponse`]: a what-if comparison

mod request;
mod response;

pub use request::{ScenarioRequest, ScenarioSpec, SolveRequest};
pub use response::{RouteResponse, ScenarioEntry, ScenarioResponse, SolveResponse};

use std::time::Duration;

use crate::economics::FleetEconomics;
use crate::models::{ProblemModel, Solution};
use crate::solver::RoutingSolver;
use crate::validation::{validate, OperationalLimits, Violation};

/// A solution with its violations and economics.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchPlan {
    pub solution: Solution,
    pub violations: Vec<Violation>,
    pub economics: FleetEconomics,
}

/// Solves `model`, then validates and prices the result.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_dispatch::contract::{plan, SolveRequest, SolveResponse};
/// use u_dispatch::solver::RoutingSolver;
///
/// let json = r#"{
///     "orders": [{"id": "O1", "location": {"id": "O1", "latitude": 0.0, "longitude": 0.1}, "demand": 2}],
///     "vehicles": [{"id": "V1", "capacity": 10}],
///     "depot": {"id": "D", "location": {"id": "D", "latitude": 0.0, "longitude": 0.0}},
///     "distance_matrix": [[0, 20], [20, 0]],
///     "time_matrix": [[0, 30], [30, 0]]
/// }"#;
/// let request: SolveRequest = serde_json::from_str(json).unwrap();
/// let (model, limits) = request.into_model().unwrap();
/// let dispatch = plan(&model, Duration::from_millis(100), &limits, &RoutingSolver::default());
///
/// let response = SolveResponse::from(&dispatch);
/// assert_eq!(response.routes[0].stops, ["D", "O1", "D"]);
/// assert_eq!(response.routes[0].distance_km, 40.0);
/// assert!(response.violations.is_empty());
/// ```
pub fn plan(
    model: &ProblemModel,
    time_budget: Duration,
    limits: &OperationalLimits,
    solver: &RoutingSolver,
) -> DispatchPlan {
    let solution = solver.solve(model, time_budget);
    DispatchPlan {
        violations: validate(&solution, model, limits),
        economics: FleetEconomics::of(&solution, model),
        solution,
    }
}

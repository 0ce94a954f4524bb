use serde::Serialize;

use super::DispatchPlan;
use crate::economics::Economics;
use crate::models::Route;
use crate::scenario::{ScenarioDelta, ScenarioMetrics, ScenarioReport, ScenarioStatus};
use crate::validation::Violation;

/// One route in a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResponse {
    pub vehicle_id: String,
    /// Depot id, order ids in visit order, depot id.
    pub stops: Vec<String>,
    pub load_sequence: Vec<f64>,
    pub time_sequence: Vec<f64>,
    pub distance_km: f64,
    pub time_minutes: f64,
}

impl From<&Route> for RouteResponse {
    fn from(route: &Route) -> Self {
        Self {
            vehicle_id: route.vehicle_id().to_string(),
            stops: route.stop_ids(),
            load_sequence: route.load_sequence(),
            time_sequence: route.time_sequence(),
            distance_km: route.distance_km(),
            time_minutes: route.duration_minutes(),
        }
    }
}

/// A solved, validated and costed plan as returned to a caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveResponse {
    pub routes: Vec<RouteResponse>,
    pub unserved_order_ids: Vec<String>,
    pub excluded_order_ids: Vec<String>,
    pub economics: Economics,
    pub violations: Vec<Violation>,
    pub objective_value: f64,
    pub elapsed_ms: u64,
    pub budget_exhausted: bool,
}

impl From<&DispatchPlan> for SolveResponse {
    fn from(plan: &DispatchPlan) -> Self {
        let meta = plan.solution.metadata();
        Self {
            routes: plan.solution.routes().map(RouteResponse::from).collect(),
            unserved_order_ids: plan.solution.unserved().to_vec(),
            excluded_order_ids: plan.solution.excluded().to_vec(),
            economics: plan.economics.totals,
            violations: plan.violations.clone(),
            objective_value: meta.objective_value,
            elapsed_ms: u64::try_from(meta.elapsed.as_millis()).unwrap_or(u64::MAX),
            budget_exhausted: meta.budget_exhausted,
        }
    }
}

/// One scenario in a comparison response.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioEntry {
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub status: ScenarioStatus,
    pub metrics: Option<ScenarioMetrics>,
    pub delta: Option<ScenarioDelta>,
    pub response: Option<SolveResponse>,
}

/// Scenario outcomes, baseline first.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResponse {
    pub scenarios: Vec<ScenarioEntry>,
}

impl From<&ScenarioReport> for ScenarioResponse {
    fn from(report: &ScenarioReport) -> Self {
        Self {
            scenarios: report
                .outcomes
                .iter()
                .map(|o| ScenarioEntry {
                    name: o.name.clone(),
                    description: o.description.clone(),
                    status: o.status.clone(),
                    metrics: o.metrics,
                    delta: o.delta,
                    response: o.plan.as_ref().map(SolveResponse::from),
                })
                .collect(),
        }
    }
}

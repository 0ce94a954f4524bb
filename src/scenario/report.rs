//! Scenario comparison results.

use serde::Serialize;

use crate::contract::DispatchPlan;

/// Whether a scenario produced a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScenarioStatus {
    Completed,
    Failed { reason: String },
}

/// Headline figures of one scenario's plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScenarioMetrics {
    pub total_cost: f64,
    pub fuel_cost: f64,
    pub labor_cost: f64,
    pub distance_km: f64,
    pub time_minutes: f64,
    pub emissions_kg: f64,
    pub violations: usize,
    pub routes: usize,
    pub unserved: usize,
    pub objective_value: f64,
}

impl ScenarioMetrics {
    pub fn from_plan(plan: &DispatchPlan) -> Self {
        let totals = &plan.economics.totals;
        Self {
            total_cost: totals.total_cost,
            fuel_cost: totals.fuel_cost,
            labor_cost: totals.labor_cost,
            distance_km: plan.economics.distance_km,
            time_minutes: plan.economics.time_minutes,
            emissions_kg: totals.emissions_kg,
            violations: plan.violations.len(),
            routes: plan.solution.num_routes(),
            unserved: plan.solution.unserved().len(),
            objective_value: plan.solution.objective_value(),
        }
    }
}

/// Change of a scenario's metrics relative to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioDelta {
    pub cost_delta: f64,
    /// Percent change of total cost; `None` when the baseline costs
    /// nothing but the scenario does.
    pub cost_delta_pct: Option<f64>,
    pub distance_delta_km: f64,
    pub time_delta_minutes: f64,
    pub emissions_delta_kg: f64,
    pub violation_delta: i64,
    pub routes_delta: i64,
}

impl ScenarioDelta {
    /// `scenario - baseline` for every metric.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_dispatch::scenario::{ScenarioDelta, ScenarioMetrics};
    ///
    /// let base = ScenarioMetrics { total_cost: 200.0, routes: 2, ..Default::default() };
    /// let more = ScenarioMetrics { total_cost: 250.0, routes: 1, ..Default::default() };
    /// let d = ScenarioDelta::between(&base, &more);
    /// assert_eq!(d.cost_delta, 50.0);
    /// assert_eq!(d.cost_delta_pct, Some(25.0));
    /// assert_eq!(d.routes_delta, -1);
    /// ```
    pub fn between(baseline: &ScenarioMetrics, scenario: &ScenarioMetrics) -> Self {
        let cost_delta = scenario.total_cost - baseline.total_cost;
        let cost_delta_pct = if baseline.total_cost > 0.0 {
            Some(cost_delta / baseline.total_cost * 100.0)
        } else if cost_delta == 0.0 {
            Some(0.0)
        } else {
            None
        };
        Self {
            cost_delta,
            cost_delta_pct,
            distance_delta_km: scenario.distance_km - baseline.distance_km,
            time_delta_minutes: scenario.time_minutes - baseline.time_minutes,
            emissions_delta_kg: scenario.emissions_kg - baseline.emissions_kg,
            violation_delta: scenario.violations as i64 - baseline.violations as i64,
            routes_delta: scenario.routes as i64 - baseline.routes as i64,
        }
    }
}

/// Result of one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub status: ScenarioStatus,
    /// Present when the scenario completed.
    pub metrics: Option<ScenarioMetrics>,
    /// Present for completed variants when the baseline also completed.
    pub delta: Option<ScenarioDelta>,
    #[serde(skip)]
    pub plan: Option<DispatchPlan>,
}

impl ScenarioOutcome {
    pub(crate) fn completed(name: String, description: Option<String>, plan: DispatchPlan) -> Self {
        Self {
            name,
            description,
            status: ScenarioStatus::Completed,
            metrics: Some(ScenarioMetrics::from_plan(&plan)),
            delta: None,
            plan: Some(plan),
        }
    }

    pub(crate) fn failed(name: String, description: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            name,
            description,
            status: ScenarioStatus::Failed {
                reason: reason.into(),
            },
            metrics: None,
            delta: None,
            plan: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ScenarioStatus::Completed
    }
}

/// All scenarios of a comparison: the baseline first, then the variants
/// in the order they were given.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub outcomes: Vec<ScenarioOutcome>,
}

impl ScenarioReport {
    pub(crate) fn new(mut outcomes: Vec<ScenarioOutcome>) -> Self {
        let baseline = outcomes.first().and_then(|b| b.metrics);
        if let Some(base) = baseline {
            for outcome in outcomes.iter_mut().skip(1) {
                outcome.delta = outcome
                    .metrics
                    .as_ref()
                    .map(|m| ScenarioDelta::between(&base, m));
            }
        }
        Self { outcomes }
    }

    pub fn baseline(&self) -> Option<&ScenarioOutcome> {
        self.outcomes.first()
    }

    pub fn get(&self, name: &str) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Completed variant with the lowest total cost.
    pub fn cheapest(&self) -> Option<&ScenarioOutcome> {
        self.outcomes
            .iter()
            .filter_map(|o| o.metrics.map(|m| (o, m.total_cost)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(o, _)| o)
    }
}

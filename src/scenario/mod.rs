//! What-if comparison of planning scenarios.
//!
//! A comparison solves the baseline and every variant independently on a
//! bounded rayon pool. Each scenario gets its own derived [`ProblemModel`]
//! and shares nothing mutable with its siblings. An override that cannot
//! be applied, or a scenario that yields no route while orders exist, is
//! reported as [`ScenarioStatus::Failed`]; the comparison itself always
//! returns one outcome per scenario.

mod overrides;
mod report;
mod sensitivity;

pub use overrides::{CostOverride, ParamOverride, ScenarioError};
pub use report::{ScenarioDelta, ScenarioMetrics, ScenarioOutcome, ScenarioReport, ScenarioStatus};
pub use sensitivity::{SensitivityLevel, SensitivityPoint, SensitivityReport, SweepParameter};

use std::num::NonZeroUsize;
use std::thread;
use std::time::Duration;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{info, instrument, warn};

use crate::contract;
use crate::models::ProblemModel;
use crate::solver::{RoutingSolver, SolverParams};
use crate::validation::OperationalLimits;

/// Name of the implicit scenario without overrides.
pub const BASELINE: &str = "baseline";

/// Runs scenario comparisons with shared limits and solver settings.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_dispatch::distance::TravelMatrices;
/// use u_dispatch::models::{Depot, DistanceMode, Location, Objective, Order, ProblemModel, Vehicle};
/// use u_dispatch::scenario::{ParamOverride, ScenarioRunner};
/// use u_dispatch::validation::OperationalLimits;
///
/// let depot = Depot::new("D", Location::new("D", 0.0, 0.0));
/// let order = Order::new("O1", Location::new("O1", 0.02, 0.0), 1.0);
/// let locations = vec![depot.location().clone(), order.location().clone()];
/// let matrices = TravelMatrices::from_locations(&locations, DistanceMode::Euclidean, 40.0);
/// let model = ProblemModel::build(
///     vec![order],
///     vec![Vehicle::new("V1", 5.0)],
///     depot,
///     matrices,
///     Objective::MinimizeCost,
///     &[],
/// )
/// .unwrap();
///
/// let variants = vec![
///     ("pricey fuel".to_string(), ParamOverride::default().with_fuel_price(3.0)),
///     ("no fleet".to_string(), ParamOverride::default().with_unavailable("V1")),
/// ];
/// let report = ScenarioRunner::new(OperationalLimits::default())
///     .compare(&model, &variants, Duration::from_millis(200));
///
/// assert_eq!(report.len(), 3);
/// assert!(report.get("pricey fuel").is_some_and(|o| o.delta.is_some()));
/// assert!(report.get("no fleet").is_some_and(|o| !o.is_completed()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    limits: OperationalLimits,
    solver: RoutingSolver,
}

impl ScenarioRunner {
    pub fn new(limits: OperationalLimits) -> Self {
        Self {
            limits,
            solver: RoutingSolver::default(),
        }
    }

    pub fn with_solver_params(mut self, params: SolverParams) -> Self {
        self.solver = RoutingSolver::new(params);
        self
    }

    pub fn limits(&self) -> &OperationalLimits {
        &self.limits
    }

    /// Solves the baseline and each variant, then computes every variant's
    /// delta against the baseline.
    ///
    /// Outcomes come back baseline first, then in the order of `variants`,
    /// whatever order the solves finish in. A variant named [`BASELINE`]
    /// is not solved and comes back failed.
    #[instrument(skip_all, fields(variants = variants.len(), budget_ms = time_budget.as_millis() as u64))]
    pub fn compare(
        &self,
        base: &ProblemModel,
        variants: &[(String, ParamOverride)],
        time_budget: Duration,
    ) -> ScenarioReport {
        let mut scenarios = Vec::with_capacity(variants.len() + 1);
        scenarios.push((BASELINE.to_string(), ParamOverride::default()));
        scenarios.extend(variants.iter().filter(|(name, _)| name != BASELINE).cloned());

        let mut solved = self.run_all(base, &scenarios, time_budget).into_iter();
        let mut outcomes: Vec<ScenarioOutcome> = solved.next().into_iter().collect();
        for (name, overrides) in variants {
            if name == BASELINE {
                let err = ScenarioError::ReservedName(name.clone());
                warn!(scenario = name.as_str(), %err, "scenario failed");
                outcomes.push(ScenarioOutcome::failed(
                    name.clone(),
                    overrides.description.clone(),
                    err.to_string(),
                ));
            } else {
                outcomes.extend(solved.next());
            }
        }
        ScenarioReport::new(outcomes)
    }

    /// Sweeps one parameter over `steps` evenly spaced values in
    /// `[min, max]`.
    #[instrument(skip_all, fields(parameter = %parameter, steps = steps))]
    pub fn sensitivity(
        &self,
        base: &ProblemModel,
        parameter: SweepParameter,
        min: f64,
        max: f64,
        steps: usize,
        time_budget: Duration,
    ) -> SensitivityReport {
        let values = sensitivity::linspace(min, max, steps);
        let scenarios: Vec<(String, ParamOverride)> = values
            .iter()
            .map(|&v| (format!("{parameter}={v:.2}"), parameter.overrides(v)))
            .collect();

        let points = values
            .into_iter()
            .zip(self.run_all(base, &scenarios, time_budget))
            .map(|(value, outcome)| SensitivityPoint {
                value,
                status: outcome.status,
                metrics: outcome.metrics,
            })
            .collect();
        SensitivityReport::new(parameter, points)
    }

    fn run_all(
        &self,
        base: &ProblemModel,
        scenarios: &[(String, ParamOverride)],
        time_budget: Duration,
    ) -> Vec<ScenarioOutcome> {
        let cores = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        let threads = scenarios.len().min(cores).max(1);

        match ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(|| {
                scenarios
                    .par_iter()
                    .map(|(name, overrides)| self.run_one(base, name, overrides, time_budget))
                    .collect()
            }),
            Err(err) => {
                warn!(%err, "cannot build scenario pool, running sequentially");
                scenarios
                    .iter()
                    .map(|(name, overrides)| self.run_one(base, name, overrides, time_budget))
                    .collect()
            }
        }
    }

    fn run_one(
        &self,
        base: &ProblemModel,
        name: &str,
        overrides: &ParamOverride,
        time_budget: Duration,
    ) -> ScenarioOutcome {
        let description = overrides.description.clone();
        let (model, limits) = match overrides.apply(base, &self.limits) {
            Ok(derived) => derived,
            Err(err) => {
                info!(scenario = name, %err, "scenario failed");
                return ScenarioOutcome::failed(name.to_string(), description, err.to_string());
            }
        };

        let plan = contract::plan(&model, time_budget, &limits, &self.solver);
        let has_orders = (0..model.num_orders()).any(|i| !model.is_excluded(i));
        if plan.solution.num_routes() == 0 && has_orders {
            info!(scenario = name, "scenario failed: no feasible route");
            return ScenarioOutcome::failed(
                name.to_string(),
                description,
                "no feasible route could be built",
            );
        }

        info!(
            scenario = name,
            cost = plan.economics.totals.total_cost,
            routes = plan.solution.num_routes(),
            unserved = plan.solution.unserved().len(),
            violations = plan.violations.len(),
            "scenario completed"
        );
        ScenarioOutcome::completed(name.to_string(), description, plan)
    }
}

/// Compares scenarios with default limits and solver settings.
pub fn compare(
    base: &ProblemModel,
    variants: &[(String, ParamOverride)],
    time_budget: Duration,
) -> ScenarioReport {
    ScenarioRunner::default().compare(base, variants, time_budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{TravelMatrices, TravelMatrix};
    use crate::models::{Depot, Location, Objective, Order, Vehicle};

    const BUDGET: Duration = Duration::from_millis(500);

    /// One order 20 km out; a single possible route.
    fn single_route() -> ProblemModel {
        let d = TravelMatrix::from_rows(vec![vec![0.0, 20.0], vec![20.0, 0.0]]).expect("square");
        let t = d.scaled(1.5);
        ProblemModel::build(
            vec![Order::new("O1", Location::new("O1", 0.0, 0.0), 4.0)],
            vec![Vehicle::new("V1", 10.0), Vehicle::new("V2", 10.0)],
            Depot::new("D", Location::new("D", 0.0, 0.0)),
            TravelMatrices::new(d, t).expect("same size"),
            Objective::MinimizeCost,
            &[],
        )
        .expect("valid")
    }

    fn named(name: &str, o: ParamOverride) -> (String, ParamOverride) {
        (name.to_string(), o)
    }

    #[test]
    fn test_fuel_increase_delta() {
        let base = single_route();
        let report = compare(
            &base,
            &[named("fuel +25%", ParamOverride::default().with_fuel_price(1.5 * 1.25))],
            BUDGET,
        );

        let baseline = report.baseline().and_then(|b| b.metrics).expect("baseline metrics");
        let fuel = report.get("fuel +25%").expect("outcome");
        let delta = fuel.delta.expect("delta");

        let expected = 0.25 * baseline.fuel_cost / baseline.total_cost * 100.0;
        assert!((delta.cost_delta_pct.expect("pct") - expected).abs() < 1e-9);
        assert_eq!(delta.distance_delta_km, 0.0);
        assert_eq!(delta.time_delta_minutes, 0.0);
        assert_eq!(delta.routes_delta, 0);
    }

    #[test]
    fn test_one_outcome_per_scenario_in_order() {
        let base = single_route();
        let variants = vec![
            named("bad speed", ParamOverride::default().with_speed_reduction(1.5)),
            named("no fleet", ParamOverride::default().with_vehicle_count(0)),
            named("one truck", ParamOverride::default().with_vehicle_count(1)),
            named("ghost", ParamOverride::default().with_unavailable("V9")),
        ];
        let report = ScenarioRunner::new(OperationalLimits::default()).compare(&base, &variants, BUDGET);

        let names: Vec<&str> = report.outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec![BASELINE, "bad speed", "no fleet", "one truck", "ghost"]);

        let status = |name: &str| report.get(name).map(|o| o.is_completed());
        assert_eq!(status(BASELINE), Some(true));
        assert_eq!(status("bad speed"), Some(false));
        assert_eq!(status("no fleet"), Some(false));
        assert_eq!(status("one truck"), Some(true));
        assert_eq!(status("ghost"), Some(false));
        assert!(report.get("no fleet").is_some_and(|o| o.delta.is_none()));
    }

    #[test]
    fn test_variant_cannot_reuse_baseline_name() {
        let base = single_route();
        let variants = vec![
            named(BASELINE, ParamOverride::default().with_fuel_price(9.0)),
            named("one truck", ParamOverride::default().with_vehicle_count(1)),
        ];
        let report = compare(&base, &variants, BUDGET);

        let names: Vec<&str> = report.outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec![BASELINE, BASELINE, "one truck"]);
        assert!(report.baseline().is_some_and(|b| b.is_completed()));
        assert!(report.get(BASELINE).is_some_and(|b| b.is_completed()));

        let clash = &report.outcomes[1];
        assert!(!clash.is_completed());
        assert!(clash.delta.is_none());
        assert!(matches!(
            &clash.status,
            ScenarioStatus::Failed { reason } if reason.contains("reserved")
        ));
        assert!(report.get("one truck").is_some_and(|o| o.delta.is_some()));
    }

    #[test]
    fn test_overridden_limits_flag_violations() {
        let base = single_route();
        // Route duration is 60 minutes.
        let report = compare(
            &base,
            &[named("short shift", ParamOverride::default().with_max_driver_minutes(30.0))],
            BUDGET,
        );
        let outcome = report.get("short shift").expect("outcome");
        assert_eq!(outcome.metrics.map(|m| m.violations), Some(1));
        assert_eq!(outcome.delta.map(|d| d.violation_delta), Some(1));
    }

    #[test]
    fn test_speed_reduction_increases_time() {
        let base = single_route();
        let report = compare(
            &base,
            &[named("rush hour", ParamOverride::default().with_speed_reduction(0.5))],
            BUDGET,
        );
        let delta = report.get("rush hour").and_then(|o| o.delta).expect("delta");
        assert!((delta.time_delta_minutes - 60.0).abs() < 1e-9);
        assert_eq!(delta.distance_delta_km, 0.0);
    }

    #[test]
    fn test_all_excluded_still_completes() {
        let d = TravelMatrix::from_rows(vec![vec![0.0, 5.0], vec![5.0, 0.0]]).expect("square");
        let base = ProblemModel::build(
            vec![Order::new("O1", Location::new("O1", 0.0, 0.0), 1.0)],
            vec![Vehicle::new("V1", 10.0)],
            Depot::new("D", Location::new("D", 0.0, 0.0)),
            TravelMatrices::new(d.clone(), d).expect("same size"),
            Objective::MinimizeDistance,
            &["O1".to_string()],
        )
        .expect("valid");
        let report = compare(&base, &[], BUDGET);
        assert!(report.baseline().is_some_and(|b| b.is_completed()));
    }

    #[test]
    fn test_sensitivity_fuel_sweep() {
        let base = single_route();
        let report = ScenarioRunner::default().sensitivity(
            &base,
            SweepParameter::FuelPrice,
            1.0,
            3.0,
            3,
            BUDGET,
        );
        assert_eq!(report.points.len(), 3);
        assert_eq!(report.completed().count(), 3);
        let costs: Vec<f64> = report.completed().filter_map(|p| p.metrics).map(|m| m.total_cost).collect();
        assert!(costs.windows(2).all(|w| w[1] > w[0]));
        assert!(report.level.is_some());
    }
}

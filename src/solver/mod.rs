//! CVRPTW solver: greedy insertion followed by time-budgeted local search.
//!
//! # Algorithm
//!
//! 1. [`greedy_insertion`](crate::constructive::greedy_insertion) builds a
//!    feasible plan, leaving out orders that fit nowhere.
//! 2. Improvement sweeps run five move families (relocate, swap, 2-opt,
//!    or-opt, re-insertion of unserved orders) in an order drawn from a
//!    seeded RNG. Each family applies acceptable moves until it finds none.
//! 3. The search stops after a sweep without an accepted move, or when
//!    the time budget runs out. The current plan is always feasible, so it
//!    is returned as is.
//!
//! With a budget large enough to converge, the result depends only on the
//! model and the seed.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, instrument};

use crate::constructive::build_plan;
use crate::evaluation::RouteEvaluator;
use crate::local_search::{commit, Deadline, MoveFamily, Scan};
use crate::models::{ProblemModel, Solution, SolveMetadata};

/// Search settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverParams {
    /// Seed for the move-family order of each sweep.
    pub seed: u64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

/// Stateless CVRPTW solver; every call is a fresh search.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_dispatch::distance::TravelMatrices;
/// use u_dispatch::models::{Depot, DistanceMode, Location, Objective, Order, ProblemModel, Vehicle};
/// use u_dispatch::solver::{RoutingSolver, SolverParams};
///
/// let depot = Depot::new("D", Location::new("D", 0.0, 0.0));
/// let orders: Vec<Order> = (1..=4)
///     .map(|i| Order::new(format!("O{i}"), Location::new(format!("O{i}"), 0.01 * i as f64, 0.0), 2.0))
///     .collect();
/// let mut locations = vec![depot.location().clone()];
/// locations.extend(orders.iter().map(|o| o.location().clone()));
/// let matrices = TravelMatrices::from_locations(&locations, DistanceMode::Euclidean, 40.0);
/// let model = ProblemModel::build(
///     orders,
///     vec![Vehicle::new("V1", 10.0), Vehicle::new("V2", 10.0)],
///     depot,
///     matrices,
///     Objective::MinimizeDistance,
///     &[],
/// )
/// .unwrap();
///
/// let solver = RoutingSolver::new(SolverParams { seed: 7 });
/// let solution = solver.solve(&model, Duration::from_secs(1));
/// assert_eq!(solution.num_served(), 4);
/// assert_eq!(solution.num_routes(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoutingSolver {
    params: SolverParams,
}

impl RoutingSolver {
    pub fn new(params: SolverParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Solves the model within `time_budget`. Never fails: orders that
    /// cannot be placed are reported as unserved.
    #[instrument(
        name = "solve",
        skip_all,
        fields(
            orders = model.num_orders(),
            vehicles = model.fleet().len(),
            objective = ?model.objective(),
        )
    )]
    pub fn solve(&self, model: &ProblemModel, time_budget: Duration) -> Solution {
        let deadline = Deadline::new(time_budget);
        let evaluator = RouteEvaluator::new(model);
        let mut plan = build_plan(&evaluator);
        let mut rng = StdRng::seed_from_u64(self.params.seed);

        let mut sweeps = 0;
        let mut accepted = 0;
        let mut budget_exhausted = false;

        'search: loop {
            if deadline.expired() {
                budget_exhausted = true;
                break;
            }
            sweeps += 1;
            let mut families = MoveFamily::ALL;
            families.shuffle(&mut rng);

            let mut improved = false;
            for family in families {
                let mut applied = 0;
                loop {
                    match family.scan(&plan, &evaluator, &deadline) {
                        Scan::Found(change) => {
                            commit(&mut plan, &evaluator, change);
                            applied += 1;
                        }
                        Scan::Nothing => break,
                        Scan::TimedOut => {
                            accepted += applied;
                            budget_exhausted = true;
                            break 'search;
                        }
                    }
                }
                if applied > 0 {
                    debug!(sweep = sweeps, %family, moves = applied, "moves accepted");
                    accepted += applied;
                    improved = true;
                }
            }
            if !improved {
                break;
            }
        }

        let objective_value = plan.objective(model);
        debug!(
            sweeps,
            accepted,
            budget_exhausted,
            objective = objective_value,
            "search finished"
        );

        let mut solution = plan.to_solution(&evaluator);
        solution.set_metadata(SolveMetadata {
            objective_value,
            elapsed: deadline.elapsed(),
            budget_exhausted,
            sweeps,
            accepted_moves: accepted,
        });
        solution
    }
}

/// Solves the model with default solver settings.
pub fn solve(model: &ProblemModel, time_budget: Duration) -> Solution {
    RoutingSolver::default().solve(model, time_budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::TravelMatrices;
    use crate::evaluation::{objective_value, UNSERVED_PENALTY};
    use crate::models::{Depot, DistanceMode, Location, Objective, Order, TimeWindow, Vehicle};
    use crate::validation::{validate, OperationalLimits};
    use proptest::prelude::*;

    fn model_from(
        orders: Vec<Order>,
        vehicles: Vec<Vehicle>,
        objective: Objective,
        exclusions: &[String],
    ) -> ProblemModel {
        let depot = Depot::new("D", Location::new("D", 0.0, 0.0));
        let mut locations = vec![depot.location().clone()];
        locations.extend(orders.iter().map(|o| Location::new(o.id(), o.location().latitude(), o.location().longitude())));
        let matrices = TravelMatrices::from_locations(&locations, DistanceMode::Euclidean, 40.0);
        ProblemModel::build(orders, vehicles, depot, matrices, objective, exclusions).expect("valid")
    }

    fn ring(n: usize, demand: f64) -> Vec<Order> {
        (0..n)
            .map(|i| {
                let angle = i as f64 / n as f64 * std::f64::consts::TAU;
                Order::new(
                    format!("O{}", i + 1),
                    Location::new(format!("L{}", i + 1), 0.05 * angle.cos(), 0.05 * angle.sin()),
                    demand,
                )
                .with_service_minutes(5.0)
            })
            .collect()
    }

    fn budget() -> Duration {
        Duration::from_secs(2)
    }

    #[test]
    fn test_ample_capacity_serves_all() {
        let model = model_from(
            ring(5, 2.0),
            vec![Vehicle::new("V1", 50.0), Vehicle::new("V2", 50.0)],
            Objective::MinimizeDistance,
            &[],
        );
        let sol = solve(&model, budget());
        assert_eq!(sol.num_served(), 5);
        assert!(sol.unserved().is_empty());
        assert!(!sol.metadata().budget_exhausted);
        assert!(sol.metadata().sweeps >= 1);
        assert!(validate(&sol, &model, &OperationalLimits::default()).is_empty());
    }

    #[test]
    fn test_capacity_shortfall_leaves_unserved() {
        // Capacity covers 6 of 10 orders.
        let model = model_from(
            ring(10, 5.0),
            vec![Vehicle::new("V1", 30.0)],
            Objective::MinimizeDistance,
            &[],
        );
        let sol = solve(&model, budget());
        assert_eq!(sol.num_served(), 6);
        assert_eq!(sol.unserved().len(), 4);
        assert!(sol.objective_value() >= 4.0 * UNSERVED_PENALTY);
        assert!(sol.objective_value() < 5.0 * UNSERVED_PENALTY);
    }

    #[test]
    fn test_metadata_objective_matches_pure_function() {
        for objective in [
            Objective::MinimizeDistance,
            Objective::MinimizeTime,
            Objective::MinimizeCost,
            Objective::MinimizeEmissions,
        ] {
            let model = model_from(
                ring(8, 5.0),
                vec![Vehicle::new("V1", 25.0), Vehicle::new("V2", 25.0)],
                objective,
                &["O3".to_string()],
            );
            let sol = solve(&model, budget());
            let recomputed = objective_value(&sol, &model);
            assert!((sol.objective_value() - recomputed).abs() < 1e-6, "{objective:?}");
        }
    }

    #[test]
    fn test_exclusion_is_binding() {
        let model = model_from(
            ring(4, 1.0),
            vec![Vehicle::new("V1", 50.0)],
            Objective::MinimizeCost,
            &["O2".to_string()],
        );
        let sol = solve(&model, budget());
        assert_eq!(sol.excluded(), ["O2".to_string()]);
        assert_eq!(sol.num_served(), 3);
        assert!(sol.objective_value() < UNSERVED_PENALTY);
    }

    #[test]
    fn test_deterministic_objective() {
        let model = model_from(
            ring(9, 4.0),
            vec![
                Vehicle::new("V1", 12.0),
                Vehicle::new("V2", 12.0),
                Vehicle::new("V3", 12.0),
            ],
            Objective::MinimizeCost,
            &[],
        );
        let a = solve(&model, budget());
        let b = solve(&model, budget());
        assert_eq!(a.objective_value(), b.objective_value());
    }

    #[test]
    fn test_zero_budget_returns_construction() {
        let model = model_from(
            ring(6, 1.0),
            vec![Vehicle::new("V1", 50.0)],
            Objective::MinimizeDistance,
            &[],
        );
        let sol = solve(&model, Duration::ZERO);
        assert_eq!(sol.num_served(), 6);
        assert!(sol.metadata().budget_exhausted);
        assert_eq!(sol.metadata().sweeps, 0);
    }

    #[test]
    fn test_no_available_vehicle() {
        let model = model_from(
            ring(3, 1.0),
            vec![Vehicle::new("V1", 50.0).with_available(false)],
            Objective::MinimizeDistance,
            &[],
        );
        let sol = solve(&model, budget());
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.unserved().len(), 3);
    }

    #[test]
    fn test_tight_window_forces_order() {
        // O2 closes early, so it must be visited before O1.
        let orders = vec![
            Order::new("O1", Location::new("O1", 0.0, 0.01), 1.0),
            Order::new("O2", Location::new("O2", 0.02, 0.0), 1.0)
                .with_time_window(TimeWindow::new(0.0, 4.0).expect("valid")),
        ];
        let model = model_from(orders, vec![Vehicle::new("V1", 10.0)], Objective::MinimizeDistance, &[]);
        let sol = solve(&model, budget());
        let route = sol.route("V1").expect("used");
        assert_eq!(route.stop_ids(), vec!["D", "O2", "O1", "D"]);
    }

    prop_compose! {
        fn order_strategy()
            (lat in 0.0f64..0.2, lon in 0.0f64..0.2, demand in 1.0f64..10.0,
             service in 0.0f64..15.0, open in 0.0f64..300.0, width in 20.0f64..400.0,
             cold in any::<bool>())
            -> (f64, f64, f64, f64, f64, f64, bool) {
            (lat, lon, demand, service, open, width, cold)
        }
    }

    prop_compose! {
        fn instance()
            (specs in prop::collection::vec(order_strategy(), 1..10),
             capacities in prop::collection::vec(5.0f64..30.0, 1..4),
             excluded in prop::option::of(0usize..10))
            -> ProblemModel {
            let orders: Vec<Order> = specs
                .iter()
                .enumerate()
                .map(|(i, &(lat, lon, demand, service, open, width, cold))| {
                    Order::new(format!("O{i}"), Location::new(format!("O{i}"), lat, lon), demand)
                        .with_service_minutes(service)
                        .with_time_window(TimeWindow::new(open, open + width).expect("valid"))
                        .with_cold_chain(cold)
                })
                .collect();
            let vehicles = capacities
                .iter()
                .enumerate()
                .map(|(i, &c)| Vehicle::new(format!("V{i}"), c))
                .collect();
            let exclusions: Vec<String> = excluded
                .filter(|&i| i < orders.len())
                .map(|i| vec![format!("O{i}")])
                .unwrap_or_default();
            model_from(orders, vehicles, Objective::MinimizeCost, &exclusions)
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_routes_are_feasible(model in instance()) {
            let sol = solve(&model, Duration::from_millis(200));
            let eval = RouteEvaluator::new(&model);

            let mut seen = vec![false; model.num_orders()];
            for route in sol.routes() {
                let orders = route.order_indices();
                prop_assert!(eval.is_feasible(route.vehicle_index(), &orders));
                let capacity = model.vehicle(route.vehicle_index()).capacity();
                for stop in route.deliveries() {
                    prop_assert!(stop.load <= capacity + 1e-9);
                    let idx = stop.order.expect("order stop");
                    prop_assert!(stop.arrival <= model.order(idx).time_window().latest() + 1e-9);
                }
                for idx in orders {
                    prop_assert!(!seen[idx]);
                    seen[idx] = true;
                }
            }
            for id in sol.unserved() {
                let idx = model.order_index(id).expect("known order");
                prop_assert!(!seen[idx]);
                seen[idx] = true;
            }
            prop_assert!(seen.iter().all(|&s| s));
        }
    }
}

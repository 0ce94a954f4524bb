//! Objective function.

use crate::economics::Economics;
use crate::models::{Objective, ProblemModel, Route, Solution};

/// Added to the objective for every non-excluded order left unserved.
pub const UNSERVED_PENALTY: f64 = 1_000_000.0;

/// Added to the objective for every excluded order that is served anyway.
pub const EXCLUSION_PENALTY: f64 = 1_000_000.0;

/// Objective contribution of a non-empty route with the given totals,
/// penalties excluded.
pub(crate) fn measure(model: &ProblemModel, vehicle: usize, distance_km: f64, duration_minutes: f64) -> f64 {
    match model.objective() {
        Objective::MinimizeDistance => distance_km,
        Objective::MinimizeTime => duration_minutes,
        Objective::MinimizeCost | Objective::MinimizeEmissions => {
            let config = model.cost_config_for(vehicle);
            let e = Economics::from_totals(distance_km, duration_minutes, true, &config);
            if model.objective() == Objective::MinimizeCost {
                e.total_cost
            } else {
                e.emissions_kg
            }
        }
    }
}

/// Penalty charged when the order at `index` is left unserved.
pub(crate) fn drop_cost(model: &ProblemModel, index: usize) -> f64 {
    if model.is_excluded(index) {
        0.0
    } else {
        UNSERVED_PENALTY
    }
}

/// Penalty charged when the order at `index` is served.
pub(crate) fn serve_surcharge(model: &ProblemModel, index: usize) -> f64 {
    if model.is_excluded(index) {
        EXCLUSION_PENALTY
    } else {
        0.0
    }
}

/// Objective contribution of one route, exclusion penalties included.
pub fn route_objective(route: &Route, model: &ProblemModel) -> f64 {
    if route.is_empty() {
        return 0.0;
    }
    let surcharge: f64 = route
        .order_indices()
        .into_iter()
        .map(|i| serve_surcharge(model, i))
        .sum();
    measure(
        model,
        route.vehicle_index(),
        route.distance_km(),
        route.duration_minutes(),
    ) + surcharge
}

/// Objective value of a solution under the model's objective.
///
/// Sums each route's distance, duration, total cost or emissions, then adds
/// [`UNSERVED_PENALTY`] per unserved order that was not excluded and
/// [`EXCLUSION_PENALTY`] per excluded order that was served.
pub fn objective_value(solution: &Solution, model: &ProblemModel) -> f64 {
    let routes: f64 = solution.routes().map(|r| route_objective(r, model)).sum();
    let unserved: f64 = solution
        .unserved()
        .iter()
        .filter_map(|id| model.order_index(id))
        .map(|i| drop_cost(model, i))
        .sum();
    routes + unserved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{TravelMatrices, TravelMatrix};
    use crate::evaluation::RouteEvaluator;
    use crate::models::{Depot, Location, Order, Vehicle};

    fn model(objective: Objective, exclusions: &[String]) -> ProblemModel {
        let rows = vec![
            vec![0.0, 10.0, 20.0],
            vec![10.0, 0.0, 10.0],
            vec![20.0, 10.0, 0.0],
        ];
        let d = TravelMatrix::from_rows(rows).expect("square");
        let t = d.scaled(2.0);
        let orders = (1..=2)
            .map(|i| Order::new(format!("O{i}"), Location::new(format!("O{i}"), 0.0, 0.0), 1.0))
            .collect();
        ProblemModel::build(
            orders,
            vec![Vehicle::new("V1", 10.0)],
            Depot::new("D", Location::new("D", 0.0, 0.0)),
            TravelMatrices::new(d, t).expect("same size"),
            objective,
            exclusions,
        )
        .expect("valid")
    }

    #[test]
    fn test_objectives() {
        let cases = [
            (Objective::MinimizeDistance, 40.0),
            (Objective::MinimizeTime, 80.0),
            // fuel 6 + labor 20 + fixed 50 + maintenance 100
            (Objective::MinimizeCost, 176.0),
            (Objective::MinimizeEmissions, 10.0),
        ];
        for (objective, expected) in cases {
            let m = model(objective, &[]);
            let route = RouteEvaluator::new(&m).build_route(0, &[0, 1]);
            let mut sol = Solution::new();
            sol.insert_route(route);
            assert!(
                (objective_value(&sol, &m) - expected).abs() < 1e-9,
                "{objective:?}"
            );
        }
    }

    #[test]
    fn test_unserved_penalty() {
        let m = model(Objective::MinimizeDistance, &[]);
        let mut sol = Solution::new();
        sol.insert_route(RouteEvaluator::new(&m).build_route(0, &[0]));
        sol.add_unserved("O2");
        assert!((objective_value(&sol, &m) - (20.0 + UNSERVED_PENALTY)).abs() < 1e-9);
    }

    #[test]
    fn test_excluded_order_penalties() {
        let m = model(Objective::MinimizeDistance, &["O2".to_string()]);

        let mut left_out = Solution::new();
        left_out.insert_route(RouteEvaluator::new(&m).build_route(0, &[0]));
        left_out.add_unserved("O2");
        left_out.add_excluded("O2");
        assert!((objective_value(&left_out, &m) - 20.0).abs() < 1e-9);

        let mut served = Solution::new();
        served.insert_route(RouteEvaluator::new(&m).build_route(0, &[0, 1]));
        assert!((objective_value(&served, &m) - (40.0 + EXCLUSION_PENALTY)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_solution() {
        let m = model(Objective::MinimizeCost, &[]);
        assert_eq!(objective_value(&Solution::new(), &m), 0.0);
    }
}

//! Greedy cheapest-insertion construction for CVRPTW.
//!
//! # Algorithm
//!
//! Orders are processed tightest first: by time-window width ascending,
//! then demand descending, then priority descending, then input order.
//! Each order is inserted at the feasible position, over all open routes,
//! with the smallest increase in the objective. When no open route can take
//! it, the cheapest feasible unused vehicle is opened. An order is only
//! placed when doing so costs less than leaving it unserved, so excluded
//! orders stay out.
//!
//! # Complexity
//!
//! O(n² · m) sequence evaluations, each O(n), where m = vehicles.

use tracing::debug;

use crate::evaluation::{drop_cost, Plan, RouteEvaluator, Tour, FEASIBILITY_EPS};
use crate::models::{ProblemModel, Solution};

/// Constructs a solution with greedy cheapest insertion.
///
/// # Examples
///
/// ```
/// use u_dispatch::constructive::greedy_insertion;
/// use u_dispatch::distance::TravelMatrices;
/// use u_dispatch::models::{Depot, DistanceMode, Location, Objective, Order, ProblemModel, Vehicle};
///
/// let depot = Depot::new("D", Location::new("D", 0.0, 0.0));
/// let orders = vec![
///     Order::new("O1", Location::new("O1", 0.05, 0.0), 4.0),
///     Order::new("O2", Location::new("O2", 0.10, 0.0), 4.0),
/// ];
/// let mut locations = vec![depot.location().clone()];
/// locations.extend(orders.iter().map(|o| o.location().clone()));
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
///
/// let solution = greedy_insertion(&model);
/// assert_eq!(solution.num_served(), 2);
/// assert!(solution.unserved().is_empty());
/// ```
pub fn greedy_insertion(model: &ProblemModel) -> Solution {
    let evaluator = RouteEvaluator::new(model);
    build_plan(&evaluator).to_solution(&evaluator)
}

/// Orders in construction sequence.
pub(crate) fn insertion_order(model: &ProblemModel) -> Vec<usize> {
    let mut sequence: Vec<usize> = (0..model.num_orders()).collect();
    sequence.sort_by(|&a, &b| {
        let (oa, ob) = (model.order(a), model.order(b));
        oa.time_window()
            .width()
            .total_cmp(&ob.time_window().width())
            .then_with(|| ob.demand().total_cmp(&oa.demand()))
            .then_with(|| ob.priority().cmp(&oa.priority()))
            .then(a.cmp(&b))
    });
    sequence
}

/// Builds the initial plan.
pub(crate) fn build_plan(evaluator: &RouteEvaluator<'_>) -> Plan {
    let model = evaluator.model();
    let mut plan = Plan::new();

    for idx in insertion_order(model) {
        let drop = drop_cost(model, idx);
        match cheapest_insertion(evaluator, &plan, idx) {
            Some((t, pos, delta)) => {
                if delta < drop - FEASIBILITY_EPS {
                    let mut orders = plan.tour(t).orders.clone();
                    orders.insert(pos, idx);
                    let cost = plan.tour(t).cost + delta;
                    plan.set(t, orders, cost);
                } else {
                    plan.mark_unserved(idx);
                }
            }
            None => match cheapest_opening(evaluator, &plan, idx) {
                Some((vehicle, cost)) if cost < drop - FEASIBILITY_EPS => {
                    plan.open(
                        model,
                        Tour {
                            vehicle,
                            orders: vec![idx],
                            cost,
                        },
                    );
                }
                _ => plan.mark_unserved(idx),
            },
        }
    }

    debug!(
        routes = plan.vehicles_used(),
        unserved = plan.unserved().len(),
        objective = plan.objective(model),
        "construction finished"
    );
    plan
}

/// Cheapest feasible position over all open tours: `(tour, position, delta)`.
///
/// Tours are visited in vehicle-id order and only a strictly cheaper
/// position replaces the incumbent, so ties go to the lower vehicle id.
pub(crate) fn cheapest_insertion(
    evaluator: &RouteEvaluator<'_>,
    plan: &Plan,
    order: usize,
) -> Option<(usize, usize, f64)> {
    let mut best: Option<(usize, usize, f64)> = None;
    let mut candidate = Vec::new();
    for (t, tour) in plan.tours().iter().enumerate() {
        for pos in 0..=tour.orders.len() {
            candidate.clear();
            candidate.extend_from_slice(&tour.orders[..pos]);
            candidate.push(order);
            candidate.extend_from_slice(&tour.orders[pos..]);
            let Some(cost) = evaluator.cost(tour.vehicle, &candidate) else {
                continue;
            };
            let delta = cost - tour.cost;
            if best.is_none_or(|(_, _, b)| delta < b - FEASIBILITY_EPS) {
                best = Some((t, pos, delta));
            }
        }
    }
    best
}

/// Cheapest unused available vehicle able to serve `order` alone:
/// `(vehicle, cost)`.
pub(crate) fn cheapest_opening(
    evaluator: &RouteEvaluator<'_>,
    plan: &Plan,
    order: usize,
) -> Option<(usize, f64)> {
    let model = evaluator.model();
    let mut best: Option<(usize, f64)> = None;
    for &vehicle in model.fleet() {
        if plan.uses(vehicle) {
            continue;
        }
        let Some(cost) = evaluator.cost(vehicle, &[order]) else {
            continue;
        };
        if best.is_none_or(|(_, b)| cost < b - FEASIBILITY_EPS) {
            best = Some((vehicle, cost));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{TravelMatrices, TravelMatrix};
    use crate::models::{Depot, Location, Objective, Order, Priority, TimeWindow, Vehicle};

    fn line_matrices(n: usize) -> TravelMatrices {
        let mut d = TravelMatrix::new(n);
        for i in 0..n {
            for j in 0..n {
                d.set(i, j, 10.0 * (i as f64 - j as f64).abs());
            }
        }
        TravelMatrices::new(d.clone(), d).expect("same size")
    }

    fn order(id: &str, demand: f64) -> Order {
        Order::new(id, Location::new(id, 0.0, 0.0), demand)
    }

    fn build(orders: Vec<Order>, vehicles: Vec<Vehicle>, exclusions: &[&str]) -> ProblemModel {
        let n = orders.len() + 1;
        let excl: Vec<String> = exclusions.iter().map(|s| s.to_string()).collect();
        ProblemModel::build(
            orders,
            vehicles,
            Depot::new("D", Location::new("D", 0.0, 0.0)),
            line_matrices(n),
            Objective::MinimizeDistance,
            &excl,
        )
        .expect("valid")
    }

    #[test]
    fn test_insertion_order() {
        let tw = |e, l| TimeWindow::new(e, l).expect("valid");
        let orders = vec![
            order("A", 1.0),
            order("B", 1.0).with_time_window(tw(0.0, 100.0)),
            order("C", 5.0),
            order("D", 1.0).with_priority(Priority::High),
            order("E", 1.0).with_time_window(tw(0.0, 100.0)),
        ];
        let model = build(orders, vec![Vehicle::new("V1", 100.0)], &[]);
        assert_eq!(insertion_order(&model), vec![1, 4, 2, 3, 0]);
    }

    #[test]
    fn test_single_vehicle_serves_all() {
        let model = build(
            vec![order("O1", 1.0), order("O2", 1.0), order("O3", 1.0)],
            vec![Vehicle::new("V1", 10.0), Vehicle::new("V2", 10.0)],
            &[],
        );
        let sol = greedy_insertion(&model);
        assert_eq!(sol.num_routes(), 1);
        let route = sol.route("V1").expect("V1 used");
        assert_eq!(route.len(), 3);
        assert_eq!(route.distance_km(), 60.0);
    }

    #[test]
    fn test_opens_second_vehicle_on_capacity() {
        let model = build(
            vec![order("O1", 6.0), order("O2", 6.0)],
            vec![Vehicle::new("V2", 10.0), Vehicle::new("V1", 10.0)],
            &[],
        );
        let sol = greedy_insertion(&model);
        assert_eq!(sol.num_routes(), 2);
        assert_eq!(sol.num_served(), 2);
        let ids: Vec<&str> = sol.routes().map(|r| r.vehicle_id()).collect();
        assert_eq!(ids, vec!["V1", "V2"]);
    }

    #[test]
    fn test_unserved_when_fleet_exhausted() {
        let model = build(
            vec![order("O1", 6.0), order("O2", 6.0)],
            vec![Vehicle::new("V1", 10.0)],
            &[],
        );
        let sol = greedy_insertion(&model);
        assert_eq!(sol.num_served(), 1);
        assert_eq!(sol.unserved().len(), 1);
        assert!(sol.excluded().is_empty());
    }

    #[test]
    fn test_excluded_order_left_out() {
        let model = build(
            vec![order("O1", 1.0), order("O2", 1.0)],
            vec![Vehicle::new("V1", 10.0)],
            &["O2"],
        );
        let sol = greedy_insertion(&model);
        assert_eq!(sol.num_served(), 1);
        assert_eq!(sol.unserved(), ["O2".to_string()]);
        assert_eq!(sol.excluded(), ["O2".to_string()]);
    }

    #[test]
    fn test_unavailable_vehicle_never_used() {
        let model = build(
            vec![order("O1", 1.0)],
            vec![
                Vehicle::new("V1", 10.0).with_available(false),
                Vehicle::new("V2", 10.0),
            ],
            &[],
        );
        let sol = greedy_insertion(&model);
        assert!(sol.route("V1").is_none());
        assert!(sol.route("V2").is_some());
    }

    #[test]
    fn test_no_vehicles() {
        let model = build(vec![order("O1", 1.0)], vec![], &[]);
        let sol = greedy_insertion(&model);
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.unserved(), ["O1".to_string()]);
    }
}

//! Single-order relocation, within a route or between routes.
//!
//! # Algorithm
//!
//! Removes each order from its route and tries every position in every
//! route, its own included. Emptying a route frees the vehicle, which the
//! acceptance rule rewards on ties.
//!
//! # Complexity
//!
//! O(n²) candidate sequences per scan, each evaluated in O(n).
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::{accepts, inserted, Change, Deadline, Scan};
use crate::evaluation::{Plan, RouteEvaluator};

pub(crate) fn relocate(plan: &Plan, evaluator: &RouteEvaluator<'_>, deadline: &Deadline) -> Scan {
    let tours = plan.tours();
    let used = plan.vehicles_used();

    for (a, from) in tours.iter().enumerate() {
        for i in 0..from.orders.len() {
            if deadline.expired() {
                return Scan::TimedOut;
            }
            let order = from.orders[i];
            let mut rest = from.orders.clone();
            rest.remove(i);
            let Some(rest_cost) = evaluator.cost(from.vehicle, &rest) else {
                continue;
            };

            for (b, to) in tours.iter().enumerate() {
                if a == b {
                    for pos in (0..=rest.len()).filter(|&p| p != i) {
                        let candidate = inserted(&rest, pos, order);
                        let Some(cost) = evaluator.cost(from.vehicle, &candidate) else {
                            continue;
                        };
                        if accepts(cost - from.cost, used, used) {
                            return Scan::Found(Change::edit(a, candidate, cost));
                        }
                    }
                    continue;
                }

                let after = if rest.is_empty() { used - 1 } else { used };
                for pos in 0..=to.orders.len() {
                    let candidate = inserted(&to.orders, pos, order);
                    let Some(cost) = evaluator.cost(to.vehicle, &candidate) else {
                        continue;
                    };
                    let delta = (rest_cost - from.cost) + (cost - to.cost);
                    if accepts(delta, used, after) {
                        return Scan::Found(
                            Change::edit(a, rest, rest_cost).and_edit(b, candidate, cost),
                        );
                    }
                }
            }
        }
    }
    Scan::Nothing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_search::commit;
    use crate::local_search::testing::{line_model, plan};
    use crate::models::Vehicle;
    use std::time::Duration;

    fn forever() -> Deadline {
        Deadline::new(Duration::from_secs(3600))
    }

    #[test]
    fn test_merges_routes_on_tie() {
        // O1 and O2 on separate vehicles: 2 + 4 = 6. Together: 4.
        let model = line_model(2, vec![Vehicle::new("V1", 10.0), Vehicle::new("V2", 10.0)], &[]);
        let eval = RouteEvaluator::new(&model);
        let mut p = plan(&eval, &[&[0], &[1]]);
        let before = p.objective(&model);

        let Scan::Found(change) = relocate(&p, &eval, &forever()) else {
            panic!("expected a move");
        };
        commit(&mut p, &eval, change);
        assert!(p.objective(&model) < before);
        assert_eq!(p.vehicles_used(), 1);
        assert_eq!(p.tours().len(), 1);
    }

    #[test]
    fn test_intra_route_fix() {
        // 0 -> 2 -> 1 -> 3 -> 0 = 2 + 1 + 2 + 3 = 8, optimal is 6
        let model = line_model(3, vec![Vehicle::new("V1", 10.0)], &[]);
        let eval = RouteEvaluator::new(&model);
        let mut p = plan(&eval, &[&[1, 0, 2]]);
        let Scan::Found(change) = relocate(&p, &eval, &forever()) else {
            panic!("expected a move");
        };
        commit(&mut p, &eval, change);
        assert!((p.objective(&model) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_respects_capacity() {
        let model = line_model(2, vec![Vehicle::new("V1", 1.0), Vehicle::new("V2", 1.0)], &[]);
        let eval = RouteEvaluator::new(&model);
        let p = plan(&eval, &[&[0], &[1]]);
        assert_eq!(relocate(&p, &eval, &forever()), Scan::Nothing);
    }

    #[test]
    fn test_times_out() {
        let model = line_model(2, vec![Vehicle::new("V1", 10.0)], &[]);
        let eval = RouteEvaluator::new(&model);
        let p = plan(&eval, &[&[0, 1]]);
        assert_eq!(relocate(&p, &eval, &Deadline::new(Duration::ZERO)), Scan::TimedOut);
    }
}

//! Intra-route 2-opt segment reversal.
//!
//! # Algorithm
//!
//! For each pair of positions `i < j` in a route, reverses the orders in
//! `[i..=j]`. With time windows the reversed segment changes every arrival
//! after `i`, so candidates are re-evaluated in full rather than by edge
//! delta.
//!
//! # Complexity
//!
//! O(n²) candidates per route, each evaluated in O(n).
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::{accepts, Change, Deadline, Scan};
use crate::evaluation::{Plan, RouteEvaluator};

pub(crate) fn two_opt(plan: &Plan, evaluator: &RouteEvaluator<'_>, deadline: &Deadline) -> Scan {
    let used = plan.vehicles_used();

    for (t, tour) in plan.tours().iter().enumerate() {
        let n = tour.orders.len();
        for i in 0..n.saturating_sub(1) {
            if deadline.expired() {
                return Scan::TimedOut;
            }
            for j in i + 1..n {
                let mut candidate = tour.orders.clone();
                candidate[i..=j].reverse();
                let Some(cost) = evaluator.cost(tour.vehicle, &candidate) else {
                    continue;
                };
                if accepts(cost - tour.cost, used, used) {
                    return Scan::Found(Change::edit(t, candidate, cost));
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
    fn test_uncrosses_route() {
        // 0 -> 1 -> 4 -> 3 -> 2 -> 5 -> 0 = 1 + 3 + 1 + 1 + 3 + 5 = 14
        let model = line_model(5, vec![Vehicle::new("V1", 10.0)], &[]);
        let eval = RouteEvaluator::new(&model);
        let mut p = plan(&eval, &[&[0, 3, 2, 1, 4]]);
        assert!((p.objective(&model) - 14.0).abs() < 1e-9);

        let Scan::Found(change) = two_opt(&p, &eval, &forever()) else {
            panic!("expected a move");
        };
        commit(&mut p, &eval, change);
        assert_eq!(p.tour(0).orders, vec![0, 1, 2, 3, 4]);
        assert!((p.objective(&model) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_routes_untouched() {
        let model = line_model(1, vec![Vehicle::new("V1", 10.0)], &[]);
        let eval = RouteEvaluator::new(&model);
        let p = plan(&eval, &[&[0]]);
        assert_eq!(two_opt(&p, &eval, &forever()), Scan::Nothing);
    }
}

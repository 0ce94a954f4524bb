//! Exchange of two orders, within a route or between routes.
//!
//! # Complexity
//!
//! O(n²) candidate pairs per scan, each evaluated in O(n).

use super::{accepts, Change, Deadline, Scan};
use crate::evaluation::{Plan, RouteEvaluator};

pub(crate) fn swap(plan: &Plan, evaluator: &RouteEvaluator<'_>, deadline: &Deadline) -> Scan {
    let tours = plan.tours();
    let used = plan.vehicles_used();

    for (a, first) in tours.iter().enumerate() {
        for i in 0..first.orders.len() {
            if deadline.expired() {
                return Scan::TimedOut;
            }

            for j in i + 1..first.orders.len() {
                let mut candidate = first.orders.clone();
                candidate.swap(i, j);
                let Some(cost) = evaluator.cost(first.vehicle, &candidate) else {
                    continue;
                };
                if accepts(cost - first.cost, used, used) {
                    return Scan::Found(Change::edit(a, candidate, cost));
                }
            }

            for (b, second) in tours.iter().enumerate().skip(a + 1) {
                for j in 0..second.orders.len() {
                    let mut left = first.orders.clone();
                    let mut right = second.orders.clone();
                    std::mem::swap(&mut left[i], &mut right[j]);
                    let Some(left_cost) = evaluator.cost(first.vehicle, &left) else {
                        continue;
                    };
                    let Some(right_cost) = evaluator.cost(second.vehicle, &right) else {
                        continue;
                    };
                    let delta = (left_cost - first.cost) + (right_cost - second.cost);
                    if accepts(delta, used, used) {
                        return Scan::Found(
                            Change::edit(a, left, left_cost).and_edit(b, right, right_cost),
                        );
                    }
                }
            }
        }
    }
    Scan::Nothing
}

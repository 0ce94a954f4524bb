//! Or-opt: relocation of a segment of 2-3 consecutive orders.
//!
//! # Algorithm
//!
//! Cuts each segment of length 2 or 3 out of its route and tries it, in
//! its original orientation, at every position of every route.
//!
//! # Complexity
//!
//! O(n²) candidates per segment length, each evaluated in O(n).
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::{accepts, Change, Deadline, Scan};
use crate::evaluation::{Plan, RouteEvaluator};

const SEGMENT_LENGTHS: [usize; 2] = [2, 3];

fn spliced(seq: &[usize], pos: usize, segment: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(seq.len() + segment.len());
    out.extend_from_slice(&seq[..pos]);
    out.extend_from_slice(segment);
    out.extend_from_slice(&seq[pos..]);
    out
}

pub(crate) fn or_opt(plan: &Plan, evaluator: &RouteEvaluator<'_>, deadline: &Deadline) -> Scan {
    let tours = plan.tours();
    let used = plan.vehicles_used();

    for (a, from) in tours.iter().enumerate() {
        for len in SEGMENT_LENGTHS {
            if from.orders.len() < len {
                continue;
            }
            for i in 0..=from.orders.len() - len {
                if deadline.expired() {
                    return Scan::TimedOut;
                }
                let segment = &from.orders[i..i + len];
                let mut rest = from.orders.clone();
                rest.drain(i..i + len);
                let Some(rest_cost) = evaluator.cost(from.vehicle, &rest) else {
                    continue;
                };

                for (b, to) in tours.iter().enumerate() {
                    if a == b {
                        for pos in (0..=rest.len()).filter(|&p| p != i) {
                            let candidate = spliced(&rest, pos, segment);
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
                        let candidate = spliced(&to.orders, pos, segment);
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
    fn test_moves_segment_within_route() {
        // 0 -> 3 -> 4 -> 1 -> 2 -> 0 = 3 + 1 + 3 + 1 + 2 = 10, optimal 8
        let model = line_model(4, vec![Vehicle::new("V1", 10.0)], &[]);
        let eval = RouteEvaluator::new(&model);
        let mut p = plan(&eval, &[&[2, 3, 0, 1]]);
        let Scan::Found(change) = or_opt(&p, &eval, &forever()) else {
            panic!("expected a move");
        };
        commit(&mut p, &eval, change);
        assert!((p.objective(&model) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_moves_segment_between_routes() {
        // Merging two routes on the same side of the depot saves a return trip.
        let model = line_model(4, vec![Vehicle::new("V1", 10.0), Vehicle::new("V2", 10.0)], &[]);
        let eval = RouteEvaluator::new(&model);
        let mut p = plan(&eval, &[&[0, 1], &[2, 3]]);
        let before = p.objective(&model);
        let Scan::Found(change) = or_opt(&p, &eval, &forever()) else {
            panic!("expected a move");
        };
        commit(&mut p, &eval, change);
        assert!(p.objective(&model) < before);
        assert_eq!(p.vehicles_used(), 1);
    }

    #[test]
    fn test_single_order_routes_skipped() {
        let model = line_model(2, vec![Vehicle::new("V1", 1.0), Vehicle::new("V2", 1.0)], &[]);
        let eval = RouteEvaluator::new(&model);
        let p = plan(&eval, &[&[0], &[1]]);
        assert_eq!(or_opt(&p, &eval, &forever()), Scan::Nothing);
    }
}

//! Re-insertion of unserved orders.
//!
//! Orders left out during construction can fit later, after other moves
//! have tightened the routes. Each unserved order is tried at every
//! position of every route and then on every idle available vehicle; the
//! move pays off when its cost is below the order's drop penalty.

use super::{accepts, inserted, Change, Deadline, Scan};
use crate::evaluation::{drop_cost, Plan, RouteEvaluator, Tour};

pub(crate) fn reinsert(plan: &Plan, evaluator: &RouteEvaluator<'_>, deadline: &Deadline) -> Scan {
    let model = evaluator.model();
    let used = plan.vehicles_used();

    for (u, &order) in plan.unserved().iter().enumerate() {
        if deadline.expired() {
            return Scan::TimedOut;
        }
        let drop = drop_cost(model, order);

        for (t, tour) in plan.tours().iter().enumerate() {
            for pos in 0..=tour.orders.len() {
                let candidate = inserted(&tour.orders, pos, order);
                let Some(cost) = evaluator.cost(tour.vehicle, &candidate) else {
                    continue;
                };
                if accepts(cost - tour.cost - drop, used, used) {
                    let mut change = Change::edit(t, candidate, cost);
                    change.served = Some(u);
                    return Scan::Found(change);
                }
            }
        }

        for &vehicle in model.fleet() {
            if plan.uses(vehicle) {
                continue;
            }
            let Some(cost) = evaluator.cost(vehicle, &[order]) else {
                continue;
            };
            if accepts(cost - drop, used, used + 1) {
                return Scan::Found(Change {
                    edits: Vec::new(),
                    served: Some(u),
                    opened: Some(Tour {
                        vehicle,
                        orders: vec![order],
                        cost,
                    }),
                });
            }
        }
    }
    Scan::Nothing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::UNSERVED_PENALTY;
    use crate::local_search::commit;
    use crate::local_search::testing::{line_model, plan};
    use crate::models::Vehicle;
    use std::time::Duration;

    fn forever() -> Deadline {
        Deadline::new(Duration::from_secs(3600))
    }

    #[test]
    fn test_inserts_into_existing_route() {
        let model = line_model(2, vec![Vehicle::new("V1", 10.0)], &[]);
        let eval = RouteEvaluator::new(&model);
        let mut p = plan(&eval, &[&[0]]);
        p.mark_unserved(1);
        assert!((p.objective(&model) - (2.0 + UNSERVED_PENALTY)).abs() < 1e-9);

        let Scan::Found(change) = reinsert(&p, &eval, &forever()) else {
            panic!("expected a move");
        };
        commit(&mut p, &eval, change);
        assert!(p.unserved().is_empty());
        assert!((p.objective(&model) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_opens_idle_vehicle() {
        let model = line_model(2, vec![Vehicle::new("V1", 1.0), Vehicle::new("V2", 1.0)], &[]);
        let eval = RouteEvaluator::new(&model);
        let mut p = plan(&eval, &[&[0]]);
        p.mark_unserved(1);

        let Scan::Found(change) = reinsert(&p, &eval, &forever()) else {
            panic!("expected a move");
        };
        commit(&mut p, &eval, change);
        assert!(p.unserved().is_empty());
        assert_eq!(p.vehicles_used(), 2);
    }

    #[test]
    fn test_excluded_order_stays_out() {
        let model = line_model(2, vec![Vehicle::new("V1", 10.0)], &["O2"]);
        let eval = RouteEvaluator::new(&model);
        let mut p = plan(&eval, &[&[0]]);
        p.mark_unserved(1);
        assert_eq!(reinsert(&p, &eval, &forever()), Scan::Nothing);
    }
}

//! Operational checks on solved routes.
//!
//! The solver guarantees capacity and time windows. This layer checks the
//! business rules that are allowed to fail, driver hours and cold-chain
//! transit, and reports them as [`Violation`]s. Violations are computed
//! fresh on every call and never stored on the solution.

mod limits;
mod violation;

pub use limits::OperationalLimits;
pub use violation::{Severity, Violation, ViolationKind};

use crate::economics::labor_with_overtime;
use crate::models::{ProblemModel, Route, Solution};

/// Checks every route of a solution against the operational limits.
///
/// Violations come grouped by vehicle id. Within a route: driver overtime
/// first, then cold-chain breaches in stop order, then capacity overage.
pub fn validate(solution: &Solution, model: &ProblemModel, limits: &OperationalLimits) -> Vec<Violation> {
    solution
        .routes()
        .flat_map(|route| check_route(route, model, limits))
        .collect()
}

fn check_route(route: &Route, model: &ProblemModel, limits: &OperationalLimits) -> Vec<Violation> {
    let mut violations = Vec::new();
    let vehicle = model.vehicle(route.vehicle_index());

    let limit = limits.max_driver_minutes.min(vehicle.max_duty_minutes());
    let excess = route.duration_minutes() - limit;
    if excess > 0.0 {
        let config = model.cost_config_for(route.vehicle_index());
        let labor = labor_with_overtime(route.duration_minutes(), limit, &config);
        violations.push(Violation::driver_overtime(
            route.vehicle_id(),
            excess,
            labor.overtime_cost,
            limit,
            limits.overtime_warning_band_minutes,
        ));
    }

    for stop in route.deliveries() {
        let Some(idx) = stop.order else { continue };
        let order = model.order(idx);
        if !order.is_cold_chain() {
            continue;
        }
        let elapsed = route.elapsed_at(stop);
        if elapsed > limits.cold_chain_minutes {
            violations.push(Violation::cold_chain_exceeded(
                order.id(),
                elapsed,
                limits.cold_chain_minutes,
            ));
        }
    }

    let excess_load = route.max_load() - vehicle.capacity();
    if excess_load > 0.0 {
        violations.push(Violation::capacity_overage(route.vehicle_id(), excess_load));
    }

    violations
}

//! Economic and emissions model for routes.
//!
//! - [`economics`] — cost breakdown of a single route
//! - [`labor_with_overtime`] — driver pay with time-and-a-half past the shift
//! - [`FleetEconomics`] — totals, per-route breakdown and unit costs

mod config;
mod cost;

pub use config::CostConfig;
pub use cost::{economics, labor_with_overtime, Economics, FleetEconomics, LaborCost, RouteEconomics, OVERTIME_MULTIPLIER};

//! Route feasibility, timing, and objective evaluation.
//!
//! - [`RouteEvaluator`] — walks visit sequences and builds routes
//! - [`objective_value`] — objective of a solution, penalties included

mod evaluator;
mod objective;
mod plan;

pub use evaluator::RouteEvaluator;
pub use objective::{objective_value, route_objective, EXCLUSION_PENALTY, UNSERVED_PENALTY};

pub(crate) use evaluator::FEASIBILITY_EPS;
pub(crate) use objective::drop_cost;
pub(crate) use plan::{Plan, Tour};

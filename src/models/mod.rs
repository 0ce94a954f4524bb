//! Domain model types for fleet dispatch planning.
//!
//! Provides locations, orders with time windows, vehicles, the depot,
//! routes as derived stop sequences, solutions, and the validated
//! [`ProblemModel`] that ties everything together.

mod depot;
mod location;
mod order;
mod problem;
mod route;
mod solution;
mod vehicle;

pub use depot::Depot;
pub use location::{DistanceMode, Location};
pub use order::{Order, Priority, TimeWindow};
pub use problem::{Objective, ProblemModel};
pub use route::{Route, Stop};
pub use solution::{SolveMetadata, Solution};
pub use vehicle::Vehicle;

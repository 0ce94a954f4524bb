//! Distance and travel time matrices.
//!
//! Matrices are opaque inputs to the planner; [`TravelMatrices::from_locations`]
//! offers a coordinate approximation for small instances.

mod matrix;

pub use matrix::{TravelMatrices, TravelMatrix};

//! Constructive heuristics for building initial dispatch plans.
//!
//! - [`greedy_insertion`] — cheapest feasible insertion, tightest orders first, O(n²m)

mod insertion;

pub use insertion::greedy_insertion;

pub(crate) use insertion::build_plan;

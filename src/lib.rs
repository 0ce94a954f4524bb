//! # u-dispatch
//!
//! Fleet dispatch planning core: a capacitated vehicle routing solver with
//! time windows (CVRPTW), post-solve operational checks, route economics,
//! and parallel what-if scenario comparison.
//!
//! ## Modules
//!
//! - [`models`] — Orders, vehicles, depot, the validated [`ProblemModel`](models::ProblemModel), routes and solutions
//! - [`distance`] — Distance and travel-time matrices
//! - [`economics`] — Cost and emissions breakdown of routes and fleets
//! - [`evaluation`] — Route feasibility, timing, and objective evaluation
//! - [`constructive`] — Greedy cheapest-insertion construction
//! - [`solver`] — Construction plus time-budgeted local search
//! - [`validation`] — Driver-hour, cold-chain and capacity checks
//! - [`scenario`] — Baseline vs. variant comparison and sensitivity sweeps
//! - [`contract`] — Request/response shapes and the solve-validate-cost pipeline
//! - [`config`] — Planner configuration from TOML
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use u_dispatch::distance::{TravelMatrices, TravelMatrix};
//! use u_dispatch::models::{Depot, Location, Objective, Order, ProblemModel, Vehicle};
//! use u_dispatch::validation::{validate, OperationalLimits};
//!
//! let distance = TravelMatrix::from_rows(vec![
//!     vec![0.0, 10.0, 12.0],
//!     vec![10.0, 0.0, 5.0],
//!     vec![12.0, 5.0, 0.0],
//! ])
//! .unwrap();
//! let time = distance.scaled(1.5);
//! let model = ProblemModel::build(
//!     vec![
//!         Order::new("O1", Location::new("O1", 0.0, 0.1), 3.0),
//!         Order::new("O2", Location::new("O2", 0.1, 0.1), 4.0),
//!     ],
//!     vec![Vehicle::new("V1", 10.0)],
//!     Depot::new("D", Location::new("D", 0.0, 0.0)),
//!     TravelMatrices::new(distance, time).unwrap(),
//!     Objective::MinimizeDistance,
//!     &[],
//! )
//! .unwrap();
//!
//! let solution = u_dispatch::solver::solve(&model, Duration::from_millis(200));
//! assert_eq!(solution.num_served(), 2);
//! assert_eq!(solution.total_distance(), 27.0);
//! assert!(validate(&solution, &model, &OperationalLimits::default()).is_empty());
//! ```

pub mod config;
pub mod constructive;
pub mod contract;
pub mod distance;
pub mod economics;
pub mod error;
pub mod evaluation;
mod local_search;
pub mod models;
pub mod scenario;
pub mod solver;
pub mod validation;

pub use error::ModelError;

//! Local search moves for improving dispatch plans.
//!
//! Every move family scans tours in vehicle-id order and stops at the first
//! acceptable move. A move is acceptable when all changed tours stay
//! feasible and it either lowers the objective or keeps it equal while
//! freeing a vehicle.
//!
//! - [`relocate`] — move one order to another position or vehicle
//! - [`swap`] — exchange two orders
//! - [`two_opt`] — reverse a segment of one route
//! - [`or_opt`] — move a segment of 2-3 consecutive orders
//! - [`reinsert`] — place an unserved order on a route

mod or_opt;
mod reinsert;
mod relocate;
mod swap;
mod two_opt;

use std::fmt;
use std::time::{Duration, Instant};

use crate::evaluation::{Plan, RouteEvaluator, Tour, FEASIBILITY_EPS};

pub(crate) use or_opt::or_opt;
pub(crate) use reinsert::reinsert;
pub(crate) use relocate::relocate;
pub(crate) use swap::swap;
pub(crate) use two_opt::two_opt;

/// Cooperative time limit, polled once per scan step.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn new(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.budget
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Result of scanning one neighborhood.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Scan {
    Found(Change),
    Nothing,
    TimedOut,
}

/// Edits to a plan produced by one accepted move.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Change {
    /// `(tour index, new sequence, new cost)`.
    pub edits: Vec<(usize, Vec<usize>, f64)>,
    /// Position in the unserved list of an order now served.
    pub served: Option<usize>,
    /// Tour for a vehicle that was idle.
    pub opened: Option<Tour>,
}

impl Change {
    pub fn edit(tour: usize, orders: Vec<usize>, cost: f64) -> Self {
        Self {
            edits: vec![(tour, orders, cost)],
            ..Self::default()
        }
    }

    pub fn and_edit(mut self, tour: usize, orders: Vec<usize>, cost: f64) -> Self {
        self.edits.push((tour, orders, cost));
        self
    }
}

/// Applies a change, dropping tours it empties.
pub(crate) fn commit(plan: &mut Plan, evaluator: &RouteEvaluator<'_>, change: Change) {
    for (tour, orders, cost) in change.edits {
        plan.set(tour, orders, cost);
    }
    if let Some(position) = change.served {
        plan.take_unserved(position);
    }
    if let Some(tour) = change.opened {
        plan.open(evaluator.model(), tour);
    }
    plan.prune();
}

/// Move acceptance rule.
pub(crate) fn accepts(delta: f64, vehicles_before: usize, vehicles_after: usize) -> bool {
    delta < -FEASIBILITY_EPS || (delta.abs() <= FEASIBILITY_EPS && vehicles_after < vehicles_before)
}

/// `seq` with `item` inserted at `pos`.
pub(crate) fn inserted(seq: &[usize], pos: usize, item: usize) -> Vec<usize> {
    let mut out = Vec::with_capacity(seq.len() + 1);
    out.extend_from_slice(&seq[..pos]);
    out.push(item);
    out.extend_from_slice(&seq[pos..]);
    out
}

/// Neighborhoods the improvement phase cycles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MoveFamily {
    Relocate,
    Swap,
    TwoOpt,
    OrOpt,
    Reinsert,
}

impl MoveFamily {
    pub const ALL: [MoveFamily; 5] = [
        MoveFamily::Relocate,
        MoveFamily::Swap,
        MoveFamily::TwoOpt,
        MoveFamily::OrOpt,
        MoveFamily::Reinsert,
    ];

    /// Scans this neighborhood for the first acceptable move.
    pub fn scan(self, plan: &Plan, evaluator: &RouteEvaluator<'_>, deadline: &Deadline) -> Scan {
        match self {
            MoveFamily::Relocate => relocate(plan, evaluator, deadline),
            MoveFamily::Swap => swap(plan, evaluator, deadline),
            MoveFamily::TwoOpt => two_opt(plan, evaluator, deadline),
            MoveFamily::OrOpt => or_opt(plan, evaluator, deadline),
            MoveFamily::Reinsert => reinsert(plan, evaluator, deadline),
        }
    }
}

impl fmt::Display for MoveFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoveFamily::Relocate => "relocate",
            MoveFamily::Swap => "swap",
            MoveFamily::TwoOpt => "2-opt",
            MoveFamily::OrOpt => "or-opt",
            MoveFamily::Reinsert => "reinsert",
        };
        f.write_str(name)
    }
}

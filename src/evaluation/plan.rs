//! Working representation of a solution during search.

use super::objective::drop_cost;
use super::RouteEvaluator;
use crate::models::{ProblemModel, Solution};

/// Visit sequence of one vehicle and its cached objective contribution.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Tour {
    pub vehicle: usize,
    pub orders: Vec<usize>,
    pub cost: f64,
}

/// Tours sorted by vehicle id, plus the orders on none of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Plan {
    tours: Vec<Tour>,
    unserved: Vec<usize>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tours(&self) -> &[Tour] {
        &self.tours
    }

    pub fn tour(&self, index: usize) -> &Tour {
        &self.tours[index]
    }

    pub fn unserved(&self) -> &[usize] {
        &self.unserved
    }

    pub fn mark_unserved(&mut self, order: usize) {
        self.unserved.push(order);
    }

    /// Removes the unserved entry at `position` and returns its order.
    pub fn take_unserved(&mut self, position: usize) -> usize {
        self.unserved.remove(position)
    }

    /// Returns `true` if `vehicle` already has a tour.
    pub fn uses(&self, vehicle: usize) -> bool {
        self.tours.iter().any(|t| t.vehicle == vehicle)
    }

    /// Number of vehicles with at least one order.
    pub fn vehicles_used(&self) -> usize {
        self.tours.iter().filter(|t| !t.orders.is_empty()).count()
    }

    /// Adds a tour for an unused vehicle, keeping tours in vehicle-id order.
    pub fn open(&mut self, model: &ProblemModel, tour: Tour) {
        let id = model.vehicle(tour.vehicle).id();
        let at = self
            .tours
            .partition_point(|t| model.vehicle(t.vehicle).id() < id);
        self.tours.insert(at, tour);
    }

    /// Replaces a tour's sequence and cost.
    pub fn set(&mut self, index: usize, orders: Vec<usize>, cost: f64) {
        let tour = &mut self.tours[index];
        tour.orders = orders;
        tour.cost = cost;
    }

    /// Drops tours left without orders, freeing their vehicles.
    pub fn prune(&mut self) {
        self.tours.retain(|t| !t.orders.is_empty());
    }

    /// Objective value: tour costs plus the penalties of unserved orders.
    pub fn objective(&self, model: &ProblemModel) -> f64 {
        let tours: f64 = self.tours.iter().map(|t| t.cost).sum();
        let dropped: f64 = self.unserved.iter().map(|&i| drop_cost(model, i)).sum();
        tours + dropped
    }

    /// Materializes every tour into a route.
    pub fn to_solution(&self, evaluator: &RouteEvaluator<'_>) -> Solution {
        let model = evaluator.model();
        let mut solution = Solution::new();
        for tour in &self.tours {
            solution.insert_route(evaluator.build_route(tour.vehicle, &tour.orders));
        }
        let mut unserved = self.unserved.clone();
        unserved.sort_unstable();
        for idx in unserved {
            let id = model.order(idx).id();
            solution.add_unserved(id);
            if model.is_excluded(idx) {
                solution.add_excluded(id);
            }
        }
        solution
    }
}

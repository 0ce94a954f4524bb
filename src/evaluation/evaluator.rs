//! Route evaluator that computes timing, load, and feasibility.

use super::objective::{measure, serve_surcharge};
use crate::models::{ProblemModel, Route, Stop};

/// Tolerance for time and load comparisons.
pub(crate) const FEASIBILITY_EPS: f64 = 1e-9;

/// Totals of a walk along a visit sequence.
#[derive(Debug, Clone, Copy)]
struct Trace {
    distance: f64,
    start: f64,
    end: f64,
}

/// Walks visit sequences through the model's travel matrices, computing
/// visit timing, cumulative load, and total distance and duration.
///
/// The vehicle leaves the depot when it opens, waits at an order if it
/// arrives before the window opens, and must arrive no later than the
/// window closes. Cumulative load may not exceed capacity, and the vehicle
/// must be back before the depot closes.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::{TravelMatrices, TravelMatrix};
/// use u_dispatch::evaluation::RouteEvaluator;
/// use u_dispatch::models::{Depot, Location, Objective, Order, ProblemModel, TimeWindow, Vehicle};
///
/// let d = TravelMatrix::from_rows(vec![vec![0.0, 10.0], vec![10.0, 0.0]]).unwrap();
/// let t = d.scaled(3.0);
/// let order = Order::new("O1", Location::new("O1", 0.0, 0.0), 4.0)
///     .with_service_minutes(5.0)
///     .with_time_window(TimeWindow::new(60.0, 90.0).unwrap());
/// let model = ProblemModel::build(
///     vec![order],
///     vec![Vehicle::new("V1", 10.0)],
///     Depot::new("D", Location::new("D", 0.0, 0.0)),
///     TravelMatrices::new(d, t).unwrap(),
///     Objective::MinimizeDistance,
///     &[],
/// )
/// .unwrap();
///
/// let evaluator = RouteEvaluator::new(&model);
/// let route = evaluator.build_route(0, &[0]);
/// assert_eq!(route.time_sequence(), vec![0.0, 30.0, 95.0]);
/// assert_eq!(route.distance_km(), 20.0);
/// assert!(evaluator.is_feasible(0, &[0]));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RouteEvaluator<'a> {
    model: &'a ProblemModel,
}

impl<'a> RouteEvaluator<'a> {
    pub fn new(model: &'a ProblemModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &'a ProblemModel {
        self.model
    }

    fn trace<F>(&self, vehicle: usize, orders: &[usize], strict: bool, mut visit: F) -> Option<Trace>
    where
        F: FnMut(usize, f64, f64, f64),
    {
        let m = self.model.matrices();
        let capacity = self.model.vehicle(vehicle).capacity();
        let start = self.model.depot().opens_at();
        let mut clock = start;
        let mut load = 0.0;
        let mut distance = 0.0;
        let mut prev = 0;

        for &idx in orders {
            let node = ProblemModel::node(idx);
            let order = self.model.order(idx);
            distance += m.distance(prev, node);
            let arrival = clock + m.time(prev, node);
            load += order.demand();
            if strict
                && (arrival > order.time_window().latest() + FEASIBILITY_EPS
                    || load > capacity + FEASIBILITY_EPS)
            {
                return None;
            }
            let departure = arrival + order.time_window().waiting_time(arrival) + order.service_minutes();
            visit(idx, arrival, departure, load);
            clock = departure;
            prev = node;
        }

        distance += m.distance(prev, 0);
        let end = clock + m.time(prev, 0);
        if strict && !orders.is_empty() && end > self.model.depot().closes_at() + FEASIBILITY_EPS {
            return None;
        }
        Some(Trace { distance, start, end })
    }

    /// Returns `true` if the vehicle can serve `orders` in this order
    /// without breaking capacity, a time window, or the depot closing time.
    pub fn is_feasible(&self, vehicle: usize, orders: &[usize]) -> bool {
        self.trace(vehicle, orders, true, |_, _, _, _| {}).is_some()
    }

    /// Objective contribution of serving `orders` with `vehicle`, or `None`
    /// if the sequence is infeasible. An empty sequence costs nothing.
    pub fn cost(&self, vehicle: usize, orders: &[usize]) -> Option<f64> {
        if orders.is_empty() {
            return Some(0.0);
        }
        let trace = self.trace(vehicle, orders, true, |_, _, _, _| {})?;
        let surcharge: f64 = orders.iter().map(|&i| serve_surcharge(self.model, i)).sum();
        Some(measure(self.model, vehicle, trace.distance, trace.end - trace.start) + surcharge)
    }

    /// Builds a route from a sequence of order indices, computing timing
    /// and load at every stop.
    ///
    /// The route is built even when the sequence is infeasible.
    pub fn build_route(&self, vehicle: usize, orders: &[usize]) -> Route {
        let depot = self.model.depot();
        let start = depot.opens_at();
        let mut stops = Vec::with_capacity(orders.len() + 2);
        stops.push(Stop {
            location_id: depot.id().to_string(),
            order: None,
            arrival: start,
            departure: start,
            load: 0.0,
        });

        let mut last_load = 0.0;
        let trace = self.trace(vehicle, orders, false, |idx, arrival, departure, load| {
            stops.push(Stop {
                location_id: self.model.order(idx).id().to_string(),
                order: Some(idx),
                arrival,
                departure,
                load,
            });
            last_load = load;
        });
        let (distance, end) = trace.map_or((0.0, start), |t| (t.distance, t.end));

        stops.push(Stop {
            location_id: depot.id().to_string(),
            order: None,
            arrival: end,
            departure: end,
            load: last_load,
        });

        let v = self.model.vehicle(vehicle);
        Route::new(v.id().to_string(), vehicle, stops, distance, end - start)
    }
}

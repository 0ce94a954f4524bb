//! Route and stop types.

use serde::Serialize;

/// One stop of a route: the depot at either end, or an order in between.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    /// Depot or order identifier.
    pub location_id: String,
    /// Index of the order in the problem model; `None` for the depot.
    pub order: Option<usize>,
    /// Arrival clock time (minutes from start of day).
    pub arrival: f64,
    /// Departure clock time (arrival + waiting + service).
    pub departure: f64,
    /// Cumulative load after this stop.
    pub load: f64,
}

impl Stop {
    pub fn is_depot(&self) -> bool {
        self.order.is_none()
    }
}

/// An ordered sequence of stops `Depot, Order, ..., Depot` served by one
/// vehicle.
///
/// All fields are derived from the visit order by the
/// [`RouteEvaluator`](crate::evaluation::RouteEvaluator); routes cannot be
/// edited in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    vehicle_id: String,
    #[serde(skip)]
    vehicle_index: usize,
    stops: Vec<Stop>,
    distance_km: f64,
    duration_minutes: f64,
}

impl Route {
    pub(crate) fn new(
        vehicle_id: String,
        vehicle_index: usize,
        stops: Vec<Stop>,
        distance_km: f64,
        duration_minutes: f64,
    ) -> Self {
        Self {
            vehicle_id,
            vehicle_index,
            stops,
            distance_km,
            duration_minutes,
        }
    }

    /// Identifier of the assigned vehicle.
    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    /// Index of the assigned vehicle in the problem model.
    pub fn vehicle_index(&self) -> usize {
        self.vehicle_index
    }

    /// All stops including the depot at both ends.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Order stops only, in visit order.
    pub fn deliveries(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter().filter(|s| !s.is_depot())
    }

    /// Order indices in visit order.
    pub fn order_indices(&self) -> Vec<usize> {
        self.stops.iter().filter_map(|s| s.order).collect()
    }

    /// Stop identifiers including the depot at both ends.
    pub fn stop_ids(&self) -> Vec<String> {
        self.stops.iter().map(|s| s.location_id.clone()).collect()
    }

    pub fn load_sequence(&self) -> Vec<f64> {
        self.stops.iter().map(|s| s.load).collect()
    }

    pub fn time_sequence(&self) -> Vec<f64> {
        self.stops.iter().map(|s| s.arrival).collect()
    }

    /// Number of orders served.
    pub fn len(&self) -> usize {
        self.stops.iter().filter(|s| !s.is_depot()).count()
    }

    /// Returns `true` if the route serves no order.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clock time the vehicle leaves the depot.
    pub fn start_time(&self) -> f64 {
        self.stops.first().map_or(0.0, |s| s.departure)
    }

    /// Minutes elapsed between depot departure and arrival at `stop`.
    pub fn elapsed_at(&self, stop: &Stop) -> f64 {
        stop.arrival - self.start_time()
    }

    /// Highest cumulative load along the route.
    pub fn max_load(&self) -> f64 {
        self.stops.iter().map(|s| s.load).fold(0.0, f64::max)
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Depot departure to depot return.
    pub fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }
}

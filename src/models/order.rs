//! Delivery orders and time windows.

use serde::{Deserialize, Serialize};

use super::Location;

/// A time window for service at an order's location, in minutes from the
/// start of the day.
///
/// The vehicle must arrive no later than `latest` and may arrive as early
/// as it likes (it waits until `earliest`).
///
/// # Examples
///
/// ```
/// use u_dispatch::models::TimeWindow;
///
/// let tw = TimeWindow::new(480.0, 720.0).unwrap();
/// assert_eq!(tw.waiting_time(420.0), 60.0);
/// assert_eq!(tw.waiting_time(600.0), 0.0);
/// assert_eq!(tw.width(), 240.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeWindow")]
pub struct TimeWindow {
    earliest: f64,
    latest: f64,
}

#[derive(Deserialize)]
struct RawTimeWindow {
    earliest: f64,
    latest: f64,
}

impl TryFrom<RawTimeWindow> for TimeWindow {
    type Error = String;

    fn try_from(raw: RawTimeWindow) -> Result<Self, Self::Error> {
        TimeWindow::new(raw.earliest, raw.latest).ok_or_else(|| {
            format!(
                "time window [{}, {}] must be finite with earliest <= latest",
                raw.earliest, raw.latest
            )
        })
    }
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `earliest > latest` or either value is non-finite.
    pub fn new(earliest: f64, latest: f64) -> Option<Self> {
        if !earliest.is_finite() || !latest.is_finite() || earliest > latest {
            return None;
        }
        Some(Self { earliest, latest })
    }

    /// A window covering the whole day.
    pub fn full_day() -> Self {
        Self {
            earliest: 0.0,
            latest: 1440.0,
        }
    }

    /// Earliest service start.
    pub fn earliest(&self) -> f64 {
        self.earliest
    }

    /// Latest allowable arrival.
    pub fn latest(&self) -> f64 {
        self.latest
    }

    /// Window length in minutes; smaller is tighter.
    pub fn width(&self) -> f64 {
        self.latest - self.earliest
    }

    /// Waiting time when arriving at `arrival`; zero if not early.
    pub fn waiting_time(&self, arrival: f64) -> f64 {
        (self.earliest - arrival).max(0.0)
    }
}

/// Delivery priority tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A customer delivery request.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{Location, Order, Priority, TimeWindow};
///
/// let order = Order::new("O1", Location::new("C1", 40.71, -74.0), 15.5)
///     .with_service_minutes(10.0)
///     .with_time_window(TimeWindow::new(480.0, 720.0).unwrap())
///     .with_cold_chain(true)
///     .with_priority(Priority::High);
/// assert_eq!(order.id(), "O1");
/// assert!(order.is_cold_chain());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: String,
    location: Location,
    demand: f64,
    #[serde(default)]
    service_minutes: f64,
    #[serde(default = "TimeWindow::full_day")]
    time_window: TimeWindow,
    #[serde(default)]
    cold_chain: bool,
    #[serde(default)]
    priority: Priority,
}

impl Order {
    /// Creates an order with no service time, a full-day window, no
    /// cold-chain requirement and medium priority.
    pub fn new(id: impl Into<String>, location: Location, demand: f64) -> Self {
        Self {
            id: id.into(),
            location,
            demand,
            service_minutes: 0.0,
            time_window: TimeWindow::full_day(),
            cold_chain: false,
            priority: Priority::default(),
        }
    }

    /// Sets the on-site service duration.
    pub fn with_service_minutes(mut self, minutes: f64) -> Self {
        self.service_minutes = minutes;
        self
    }

    /// Sets the delivery time window.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = tw;
        self
    }

    /// Marks the order as requiring refrigerated transport.
    pub fn with_cold_chain(mut self, cold_chain: bool) -> Self {
        self.cold_chain = cold_chain;
        self
    }

    /// Sets the priority tier.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn demand(&self) -> f64 {
        self.demand
    }

    pub fn service_minutes(&self) -> f64 {
        self.service_minutes
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    pub fn is_cold_chain(&self) -> bool {
        self.cold_chain
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_invalid() {
        assert!(TimeWindow::new(20.0, 10.0).is_none());
        assert!(TimeWindow::new(f64::NAN, 10.0).is_none());
        assert!(TimeWindow::new(10.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_time_window_point() {
        let tw = TimeWindow::new(10.0, 10.0).expect("valid");
        assert_eq!(tw.width(), 0.0);
        assert_eq!(tw.waiting_time(10.0), 0.0);
    }

    #[test]
    fn test_time_window_waiting() {
        let tw = TimeWindow::new(10.0, 20.0).expect("valid");
        assert!((tw.waiting_time(5.0) - 5.0).abs() < 1e-10);
        assert!(tw.waiting_time(10.0).abs() < 1e-10);
        assert!(tw.waiting_time(15.0).abs() < 1e-10);
    }

    #[test]
    fn test_time_window_deserialize_rejects_inverted() {
        let ok: Result<TimeWindow, _> = serde_json::from_str(r#"{"earliest":1,"latest":2}"#);
        assert!(ok.is_ok());
        let bad: Result<TimeWindow, _> = serde_json::from_str(r#"{"earliest":3,"latest":2}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_order_defaults() {
        let o = Order::new("O1", Location::new("C1", 0.0, 0.0), 5.0);
        assert_eq!(o.demand(), 5.0);
        assert_eq!(o.service_minutes(), 0.0);
        assert_eq!(o.time_window(), &TimeWindow::full_day());
        assert!(!o.is_cold_chain());
        assert_eq!(o.priority(), Priority::Medium);
    }

    #[test]
    fn test_order_deserialize_with_defaults() {
        let json = r#"{
            "id": "O7",
            "location": {"id": "C7", "latitude": 1.0, "longitude": 2.0},
            "demand": 3.5
        }"#;
        let o: Order = serde_json::from_str(json).expect("parses");
        assert_eq!(o.id(), "O7");
        assert_eq!(o.time_window().latest(), 1440.0);
        assert_eq!(o.priority(), Priority::Medium);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }
}

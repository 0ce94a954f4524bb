//! Vehicle type with capacity, duty and cost parameters.

use serde::{Deserialize, Serialize};

fn default_max_duty_minutes() -> f64 {
    480.0
}

fn default_speed_kmh() -> f64 {
    50.0
}

fn default_available() -> bool {
    true
}

/// A vehicle that can be assigned one route.
///
/// Cost fields are optional: when set they override the fleet-wide
/// [`CostConfig`](crate::economics::CostConfig) for this vehicle only.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::Vehicle;
///
/// let v = Vehicle::new("V1", 200.0).with_fixed_daily_cost(80.0);
/// assert_eq!(v.id(), "V1");
/// assert_eq!(v.capacity(), 200.0);
/// assert_eq!(v.max_duty_minutes(), 480.0);
/// assert_eq!(v.fixed_daily_cost(), Some(80.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: String,
    capacity: f64,
    #[serde(default = "default_max_duty_minutes")]
    max_duty_minutes: f64,
    #[serde(default = "default_speed_kmh")]
    speed_kmh: f64,
    #[serde(default)]
    fixed_daily_cost: Option<f64>,
    #[serde(default)]
    cost_per_km: Option<f64>,
    #[serde(default)]
    emissions_per_km: Option<f64>,
    #[serde(default = "default_available")]
    available: bool,
}

impl Vehicle {
    /// Creates an available vehicle with the given capacity.
    ///
    /// Default: 480 min on duty, 50 km/h, no cost overrides.
    pub fn new(id: impl Into<String>, capacity: f64) -> Self {
        Self {
            id: id.into(),
            capacity,
            max_duty_minutes: default_max_duty_minutes(),
            speed_kmh: default_speed_kmh(),
            fixed_daily_cost: None,
            cost_per_km: None,
            emissions_per_km: None,
            available: true,
        }
    }

    /// Sets maximum on-duty duration.
    pub fn with_max_duty_minutes(mut self, minutes: f64) -> Self {
        self.max_duty_minutes = minutes;
        self
    }

    /// Sets average travel speed.
    pub fn with_speed_kmh(mut self, speed: f64) -> Self {
        self.speed_kmh = speed;
        self
    }

    /// Sets the fixed cost charged once per day of use.
    pub fn with_fixed_daily_cost(mut self, cost: f64) -> Self {
        self.fixed_daily_cost = Some(cost);
        self
    }

    /// Sets the distance-proportional running cost.
    pub fn with_cost_per_km(mut self, cost: f64) -> Self {
        self.cost_per_km = Some(cost);
        self
    }

    /// Sets CO2 emitted per kilometer.
    pub fn with_emissions_per_km(mut self, kg: f64) -> Self {
        self.emissions_per_km = Some(kg);
        self
    }

    /// Marks the vehicle as (un)available for dispatch.
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Returns a copy under a different identifier.
    pub fn renamed(&self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..self.clone()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Maximum cumulative load.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Maximum on-duty duration in minutes.
    pub fn max_duty_minutes(&self) -> f64 {
        self.max_duty_minutes
    }

    /// Average speed in km/h.
    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    pub fn fixed_daily_cost(&self) -> Option<f64> {
        self.fixed_daily_cost
    }

    pub fn cost_per_km(&self) -> Option<f64> {
        self.cost_per_km
    }

    pub fn emissions_per_km(&self) -> Option<f64> {
        self.emissions_per_km
    }

    pub fn is_available(&self) -> bool {
        self.available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_new() {
        let v = Vehicle::new("V0", 200.0);
        assert_eq!(v.id(), "V0");
        assert_eq!(v.capacity(), 200.0);
        assert_eq!(v.speed_kmh(), 50.0);
        assert!(v.is_available());
        assert!(v.fixed_daily_cost().is_none());
        assert!(v.cost_per_km().is_none());
        assert!(v.emissions_per_km().is_none());
    }

    #[test]
    fn test_vehicle_builder() {
        let v = Vehicle::new("V1", 100.0)
            .with_max_duty_minutes(600.0)
            .with_speed_kmh(40.0)
            .with_fixed_daily_cost(50.0)
            .with_cost_per_km(1.5)
            .with_emissions_per_km(0.3)
            .with_available(false);
        assert_eq!(v.max_duty_minutes(), 600.0);
        assert_eq!(v.speed_kmh(), 40.0);
        assert_eq!(v.fixed_daily_cost(), Some(50.0));
        assert_eq!(v.cost_per_km(), Some(1.5));
        assert_eq!(v.emissions_per_km(), Some(0.3));
        assert!(!v.is_available());
    }

    #[test]
    fn test_renamed_keeps_parameters() {
        let v = Vehicle::new("V1", 10.0).with_cost_per_km(2.0);
        let w = v.renamed("V1-2");
        assert_eq!(w.id(), "V1-2");
        assert_eq!(w.cost_per_km(), Some(2.0));
    }

    #[test]
    fn test_vehicle_deserialize_defaults() {
        let v: Vehicle = serde_json::from_str(r#"{"id":"V9","capacity":12.5}"#).expect("parses");
        assert_eq!(v.capacity(), 12.5);
        assert_eq!(v.max_duty_minutes(), 480.0);
        assert!(v.is_available());
    }
}

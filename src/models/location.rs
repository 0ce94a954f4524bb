//! Geographic locations.

use serde::{Deserialize, Serialize};

/// Kilometers per degree of latitude.
const KM_PER_DEGREE: f64 = 111.0;

/// How a distance is approximated between two coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMode {
    /// Straight line on an equirectangular projection.
    #[default]
    Euclidean,
    /// Grid distance on the same projection (city blocks).
    Manhattan,
}

/// A named point given by latitude and longitude in degrees.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{DistanceMode, Location};
///
/// let a = Location::new("A", 0.0, 0.0);
/// let b = Location::new("B", 1.0, 0.0);
/// assert!((a.distance_km(&b, DistanceMode::Euclidean) - 111.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    id: String,
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Creates a location.
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
        }
    }

    /// Location identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Approximate distance in kilometers.
    ///
    /// Longitude degrees are scaled by the cosine of the mean latitude, which
    /// is accurate enough for city-scale (< 100 km) instances.
    pub fn distance_km(&self, other: &Location, mode: DistanceMode) -> f64 {
        let mean_lat = ((self.latitude + other.latitude) / 2.0).to_radians();
        let dy = (other.latitude - self.latitude) * KM_PER_DEGREE;
        let dx = (other.longitude - self.longitude) * KM_PER_DEGREE * mean_lat.cos();
        match mode {
            DistanceMode::Euclidean => (dx * dx + dy * dy).sqrt(),
            DistanceMode::Manhattan => dx.abs() + dy.abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_accessors() {
        let l = Location::new("D1", 40.7, -74.0);
        assert_eq!(l.id(), "D1");
        assert_eq!(l.latitude(), 40.7);
        assert_eq!(l.longitude(), -74.0);
    }

    #[test]
    fn test_distance_zero_to_self() {
        let l = Location::new("A", 40.7, -74.0);
        assert!(l.distance_km(&l, DistanceMode::Euclidean).abs() < 1e-12);
        assert!(l.distance_km(&l, DistanceMode::Manhattan).abs() < 1e-12);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = Location::new("A", 40.71, -74.00);
        let b = Location::new("B", 40.76, -73.98);
        let ab = a.distance_km(&b, DistanceMode::Euclidean);
        let ba = b.distance_km(&a, DistanceMode::Euclidean);
        assert!((ab - ba).abs() < 1e-10);
    }

    #[test]
    fn test_manhattan_not_shorter() {
        let a = Location::new("A", 40.71, -74.00);
        let b = Location::new("B", 40.76, -73.98);
        assert!(
            a.distance_km(&b, DistanceMode::Manhattan)
                >= a.distance_km(&b, DistanceMode::Euclidean)
        );
    }
}

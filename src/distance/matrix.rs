//! Dense travel matrices.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::models::{DistanceMode, Location};

/// A dense n×n matrix stored in row-major order.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::TravelMatrix;
///
/// let m = TravelMatrix::from_rows(vec![vec![0.0, 5.0], vec![6.0, 0.0]]).unwrap();
/// assert_eq!(m.get(0, 1), 5.0);
/// assert_eq!(m.get(1, 0), 6.0);
/// assert_eq!(m.size(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelMatrix {
    data: Vec<f64>,
    size: usize,
}

impl TravelMatrix {
    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a matrix from nested rows.
    ///
    /// Fails with [`ModelError::DimensionMismatch`] unless every row has as
    /// many entries as there are rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ModelError> {
        let size = rows.len();
        let actual: usize = rows.iter().map(Vec::len).sum();
        if rows.iter().any(|r| r.len() != size) {
            return Err(ModelError::DimensionMismatch {
                expected: size * size,
                actual,
            });
        }
        Ok(Self {
            data: rows.into_iter().flatten().collect(),
            size,
        })
    }

    /// Returns the entry for travelling from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the entry for travelling from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, value: f64) {
        self.data[from * self.size + to] = value;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a copy with every entry multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            data: self.data.iter().map(|v| v * factor).collect(),
            size: self.size,
        }
    }

    /// Position of the first negative or non-finite entry.
    pub(crate) fn find_invalid(&self) -> Option<(usize, usize, f64)> {
        self.data
            .iter()
            .position(|v| !v.is_finite() || *v < 0.0)
            .map(|k| (k / self.size, k % self.size, self.data[k]))
    }
}

/// Distance (km) and time (minutes) matrices indexed consistently with the
/// depot at 0 and order `i` at `i + 1`.
///
/// Rows may be labelled with location ids, in which case the problem model
/// checks that the labels match its depot and orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelMatrices {
    distance: TravelMatrix,
    time: TravelMatrix,
    #[serde(default)]
    labels: Option<Vec<String>>,
}

impl TravelMatrices {
    /// Pairs a distance and a time matrix.
    ///
    /// Fails with [`ModelError::DimensionMismatch`] if their sizes differ.
    pub fn new(distance: TravelMatrix, time: TravelMatrix) -> Result<Self, ModelError> {
        if distance.size() != time.size() {
            return Err(ModelError::DimensionMismatch {
                expected: distance.len(),
                actual: time.len(),
            });
        }
        Ok(Self {
            distance,
            time,
            labels: None,
        })
    }

    /// Labels rows with location ids.
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Approximates both matrices from coordinates.
    ///
    /// `locations[0]` must be the depot. Travel time assumes a constant
    /// `speed_kmh`. Rows are left unlabelled since location ids need not
    /// match depot and order ids; use [`with_labels`](Self::with_labels)
    /// to have the problem model check them.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_dispatch::distance::TravelMatrices;
    /// use u_dispatch::models::{DistanceMode, Location};
    ///
    /// let locations = vec![Location::new("D", 0.0, 0.0), Location::new("O1", 0.5, 0.0)];
    /// let m = TravelMatrices::from_locations(&locations, DistanceMode::Euclidean, 55.5);
    /// assert!((m.distance(0, 1) - 55.5).abs() < 1e-9);
    /// assert!((m.time(0, 1) - 60.0).abs() < 1e-9);
    /// ```
    pub fn from_locations(locations: &[Location], mode: DistanceMode, speed_kmh: f64) -> Self {
        let n = locations.len();
        let mut distance = TravelMatrix::new(n);
        let mut time = TravelMatrix::new(n);
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let d = locations[i].distance_km(&locations[j], mode);
                distance.set(i, j, d);
                time.set(i, j, d / speed_kmh * 60.0);
            }
        }
        Self {
            distance,
            time,
            labels: None,
        }
    }

    /// Distance in km.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distance.get(from, to)
    }

    /// Travel time in minutes.
    pub fn time(&self, from: usize, to: usize) -> f64 {
        self.time.get(from, to)
    }

    pub fn distance_matrix(&self) -> &TravelMatrix {
        &self.distance
    }

    pub fn time_matrix(&self) -> &TravelMatrix {
        &self.time
    }

    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    pub fn size(&self) -> usize {
        self.distance.size()
    }

    /// Returns a copy whose travel times are multiplied by `factor`.
    pub fn with_time_scale(&self, factor: f64) -> Self {
        Self {
            distance: self.distance.clone(),
            time: self.time.scaled(factor),
            labels: self.labels.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(rows: &[&[f64]]) -> TravelMatrix {
        TravelMatrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).expect("square")
    }

    #[test]
    fn test_from_rows_ragged() {
        let err = TravelMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            ModelError::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_set_get_asymmetric() {
        let mut m = TravelMatrix::new(2);
        m.set(0, 1, 10.0);
        m.set(1, 0, 15.0);
        assert_eq!(m.get(0, 1), 10.0);
        assert_eq!(m.get(1, 0), 15.0);
    }

    #[test]
    fn test_scaled() {
        let m = square(&[&[0.0, 4.0], &[2.0, 0.0]]);
        let s = m.scaled(1.5);
        assert_eq!(s.get(0, 1), 6.0);
        assert_eq!(s.get(1, 0), 3.0);
    }

    #[test]
    fn test_find_invalid() {
        let m = square(&[&[0.0, 4.0], &[-1.0, 0.0]]);
        assert_eq!(m.find_invalid(), Some((1, 0, -1.0)));
        let ok = TravelMatrix::new(3);
        assert_eq!(ok.find_invalid(), None);
    }

    #[test]
    fn test_matrices_size_mismatch() {
        let err = TravelMatrices::new(TravelMatrix::new(2), TravelMatrix::new(3)).unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_time_scale_keeps_distance() {
        let d = square(&[&[0.0, 10.0], &[10.0, 0.0]]);
        let t = square(&[&[0.0, 20.0], &[20.0, 0.0]]);
        let m = TravelMatrices::new(d, t).expect("same size").with_time_scale(1.25);
        assert_eq!(m.distance(0, 1), 10.0);
        assert_eq!(m.time(0, 1), 25.0);
    }

    #[test]
    fn test_from_locations_unlabelled() {
        let locations = vec![
            Location::new("D", 40.0, -74.0),
            Location::new("O1", 40.01, -74.0),
            Location::new("O2", 40.0, -74.01),
        ];
        let m = TravelMatrices::from_locations(&locations, DistanceMode::Manhattan, 50.0);
        assert_eq!(m.size(), 3);
        assert!(m.labels().is_none());
        assert_eq!(m.distance(1, 1), 0.0);
        assert!(m.distance(0, 1) > 0.0);
    }
}

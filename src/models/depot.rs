//! The single depot every route starts from and returns to.

use serde::{Deserialize, Serialize};

use super::{Location, TimeWindow};

/// Depot location and operating window.
///
/// Vehicles leave at the opening time and must be back by closing time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    id: String,
    location: Location,
    #[serde(default = "TimeWindow::full_day")]
    operating_window: TimeWindow,
}

impl Depot {
    /// Creates a depot open all day.
    pub fn new(id: impl Into<String>, location: Location) -> Self {
        Self {
            id: id.into(),
            location,
            operating_window: TimeWindow::full_day(),
        }
    }

    /// Sets the operating window.
    pub fn with_operating_window(mut self, window: TimeWindow) -> Self {
        self.operating_window = window;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn operating_window(&self) -> &TimeWindow {
        &self.operating_window
    }

    /// Departure time of every route.
    pub fn opens_at(&self) -> f64 {
        self.operating_window.earliest()
    }

    /// Latest return time.
    pub fn closes_at(&self) -> f64 {
        self.operating_window.latest()
    }
}

use serde::{Deserialize, Serialize};

/// Business limits checked after solving.
///
/// # Examples
///
/// ```
/// use u_dispatch::validation::OperationalLimits;
///
/// let limits: OperationalLimits = toml::from_str("cold_chain_minutes = 90").unwrap();
/// assert_eq!(limits.cold_chain_minutes, 90.0);
/// assert_eq!(limits.max_driver_minutes, 480.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationalLimits {
    /// Maximum route duration for a driver, capped further by each
    /// vehicle's own duty limit.
    pub max_driver_minutes: f64,
    /// Maximum time a cold-chain order may spend between depot departure
    /// and delivery.
    pub cold_chain_minutes: f64,
    /// Overtime up to this many minutes is a warning; beyond it, critical.
    pub overtime_warning_band_minutes: f64,
}

impl Default for OperationalLimits {
    fn default() -> Self {
        Self {
            max_driver_minutes: 480.0,
            cold_chain_minutes: 120.0,
            overtime_warning_band_minutes: 60.0,
        }
    }
}

//! Cost parameters.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::models::Vehicle;

/// Prices and factors that turn distance and time into money and CO2.
///
/// # Examples
///
/// ```
/// use u_dispatch::economics::CostConfig;
///
/// let config = CostConfig::default();
/// assert_eq!(config.fuel_price_per_liter, 1.5);
/// assert_eq!(config.driver_wage_per_hour, 15.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    pub fuel_price_per_liter: f64,
    pub fuel_consumption_l_per_km: f64,
    pub driver_wage_per_hour: f64,
    pub fixed_cost_per_vehicle_per_day: f64,
    pub maintenance_per_km: f64,
    pub emissions_factor_kg_per_km: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            fuel_price_per_liter: 1.5,
            // 10 km per liter
            fuel_consumption_l_per_km: 0.1,
            driver_wage_per_hour: 15.0,
            fixed_cost_per_vehicle_per_day: 50.0,
            maintenance_per_km: 2.5,
            emissions_factor_kg_per_km: 0.25,
        }
    }
}

impl CostConfig {
    /// Applies the vehicle's own cost and emissions figures, where it has them.
    pub fn for_vehicle(&self, vehicle: &Vehicle) -> Self {
        Self {
            fixed_cost_per_vehicle_per_day: vehicle
                .fixed_daily_cost()
                .unwrap_or(self.fixed_cost_per_vehicle_per_day),
            maintenance_per_km: vehicle.cost_per_km().unwrap_or(self.maintenance_per_km),
            emissions_factor_kg_per_km: vehicle
                .emissions_per_km()
                .unwrap_or(self.emissions_factor_kg_per_km),
            ..*self
        }
    }

    /// Checks that every parameter is finite and non-negative.
    pub fn validate(&self) -> Result<(), ModelError> {
        let fields = [
            ("fuel_price_per_liter", self.fuel_price_per_liter),
            ("fuel_consumption_l_per_km", self.fuel_consumption_l_per_km),
            ("driver_wage_per_hour", self.driver_wage_per_hour),
            ("fixed_cost_per_vehicle_per_day", self.fixed_cost_per_vehicle_per_day),
            ("maintenance_per_km", self.maintenance_per_km),
            ("emissions_factor_kg_per_km", self.emissions_factor_kg_per_km),
        ];
        match fields.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            Some((name, _)) => Err(ModelError::InvalidCostConfig(name)),
            None => Ok(()),
        }
    }
}

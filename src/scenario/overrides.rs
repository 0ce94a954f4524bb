//! Parameter overrides that derive a scenario from the baseline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::economics::CostConfig;
use crate::error::ModelError;
use crate::models::{Objective, ProblemModel};
use crate::validation::OperationalLimits;

/// Why an override could not be applied. Reported as a failed scenario,
/// never raised out of a comparison.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    #[error("speed reduction must be in [0, 1), got {0}")]
    InvalidSpeedReduction(f64),

    #[error("{name} must be positive, got {value}")]
    InvalidLimit { name: &'static str, value: f64 },

    #[error("no available vehicle to clone for a fleet of {0}")]
    NoVehicleToClone(usize),

    #[error("scenario name {0:?} is reserved")]
    ReservedName(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Replacement values for individual cost parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostOverride {
    pub fuel_price_per_liter: Option<f64>,
    pub fuel_consumption_l_per_km: Option<f64>,
    pub driver_wage_per_hour: Option<f64>,
    pub fixed_cost_per_vehicle_per_day: Option<f64>,
    pub maintenance_per_km: Option<f64>,
    pub emissions_factor_kg_per_km: Option<f64>,
}

impl CostOverride {
    pub fn apply(&self, base: &CostConfig) -> CostConfig {
        CostConfig {
            fuel_price_per_liter: self.fuel_price_per_liter.unwrap_or(base.fuel_price_per_liter),
            fuel_consumption_l_per_km: self
                .fuel_consumption_l_per_km
                .unwrap_or(base.fuel_consumption_l_per_km),
            driver_wage_per_hour: self.driver_wage_per_hour.unwrap_or(base.driver_wage_per_hour),
            fixed_cost_per_vehicle_per_day: self
                .fixed_cost_per_vehicle_per_day
                .unwrap_or(base.fixed_cost_per_vehicle_per_day),
            maintenance_per_km: self.maintenance_per_km.unwrap_or(base.maintenance_per_km),
            emissions_factor_kg_per_km: self
                .emissions_factor_kg_per_km
                .unwrap_or(base.emissions_factor_kg_per_km),
        }
    }
}

/// Changes a scenario makes to the baseline model and limits.
///
/// Unset fields keep the baseline value. Vehicles named in
/// `unavailable_vehicles` are removed first; `vehicle_count` then trims
/// the remaining available fleet in id order, or grows it by cloning the
/// last available vehicle as `<id>-1`, `<id>-2`, ...
///
/// # Examples
///
/// ```
/// use u_dispatch::scenario::ParamOverride;
///
/// let rush_hour = ParamOverride::default()
///     .with_speed_reduction(0.3)
///     .with_description("Morning congestion");
/// assert_eq!(rush_hour.speed_reduction, Some(0.3));
///
/// let parsed: ParamOverride =
///     serde_json::from_str(r#"{"cost": {"fuel_price_per_liter": 1.875}, "vehicle_count": 3}"#).unwrap();
/// assert_eq!(parsed.cost.fuel_price_per_liter, Some(1.875));
/// assert_eq!(parsed.vehicle_count, Some(3));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamOverride {
    pub description: Option<String>,
    pub cost: CostOverride,
    pub vehicle_count: Option<usize>,
    pub unavailable_vehicles: Vec<String>,
    /// Fractional loss of speed; travel times are divided by `1 - r`.
    pub speed_reduction: Option<f64>,
    pub max_driver_minutes: Option<f64>,
    pub cold_chain_minutes: Option<f64>,
    pub objective: Option<Objective>,
}

impl ParamOverride {
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_cost(mut self, cost: CostOverride) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_fuel_price(mut self, price: f64) -> Self {
        self.cost.fuel_price_per_liter = Some(price);
        self
    }

    pub fn with_driver_wage(mut self, wage: f64) -> Self {
        self.cost.driver_wage_per_hour = Some(wage);
        self
    }

    pub fn with_vehicle_count(mut self, count: usize) -> Self {
        self.vehicle_count = Some(count);
        self
    }

    pub fn with_unavailable(mut self, vehicle_id: impl Into<String>) -> Self {
        self.unavailable_vehicles.push(vehicle_id.into());
        self
    }

    pub fn with_speed_reduction(mut self, reduction: f64) -> Self {
        self.speed_reduction = Some(reduction);
        self
    }

    pub fn with_max_driver_minutes(mut self, minutes: f64) -> Self {
        self.max_driver_minutes = Some(minutes);
        self
    }

    pub fn with_cold_chain_minutes(mut self, minutes: f64) -> Self {
        self.cold_chain_minutes = Some(minutes);
        self
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = Some(objective);
        self
    }

    /// Derives the scenario's model and limits.
    pub fn apply(
        &self,
        base: &ProblemModel,
        limits: &OperationalLimits,
    ) -> Result<(ProblemModel, OperationalLimits), ScenarioError> {
        let mut model = base
            .clone()
            .with_cost_config(self.cost.apply(base.cost_config()))?;

        if !self.unavailable_vehicles.is_empty() || self.vehicle_count.is_some() {
            model = model.with_vehicles(self.fleet(base)?)?;
        }

        if let Some(r) = self.speed_reduction {
            if !(0.0..1.0).contains(&r) {
                return Err(ScenarioError::InvalidSpeedReduction(r));
            }
            model = model.with_travel_time_scale(1.0 / (1.0 - r))?;
        }

        if let Some(objective) = self.objective {
            model = model.with_objective(objective);
        }

        let mut limits = *limits;
        if let Some(minutes) = self.max_driver_minutes {
            limits.max_driver_minutes = positive("max_driver_minutes", minutes)?;
        }
        if let Some(minutes) = self.cold_chain_minutes {
            limits.cold_chain_minutes = positive("cold_chain_minutes", minutes)?;
        }

        Ok((model, limits))
    }

    fn fleet(&self, base: &ProblemModel) -> Result<Vec<crate::models::Vehicle>, ScenarioError> {
        let mut vehicles = base.vehicles().to_vec();
        for id in &self.unavailable_vehicles {
            let v = vehicles
                .iter_mut()
                .find(|v| v.id() == id)
                .ok_or_else(|| ModelError::UnknownId(id.clone()))?;
            *v = v.clone().with_available(false);
        }

        let Some(count) = self.vehicle_count else {
            return Ok(vehicles);
        };
        let mut available: Vec<usize> = (0..vehicles.len())
            .filter(|&i| vehicles[i].is_available())
            .collect();
        available.sort_by(|&a, &b| vehicles[a].id().cmp(vehicles[b].id()));

        if count <= available.len() {
            for &i in &available[count..] {
                vehicles[i] = vehicles[i].clone().with_available(false);
            }
        } else {
            let template = available
                .last()
                .map(|&i| vehicles[i].clone())
                .ok_or(ScenarioError::NoVehicleToClone(count))?;
            for k in 1..=count - available.len() {
                vehicles.push(template.renamed(format!("{}-{k}", template.id())));
            }
        }
        Ok(vehicles)
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, ScenarioError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ScenarioError::InvalidLimit { name, value })
    }
}

//! Route and fleet economics.

use std::iter::Sum;
use std::ops::Add;

use serde::Serialize;

use super::CostConfig;
use crate::models::{ProblemModel, Route, Solution};

/// Money and emissions attributed to a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Economics {
    pub fuel_cost: f64,
    pub labor_cost: f64,
    pub fixed_cost: f64,
    pub maintenance_cost: f64,
    pub total_cost: f64,
    pub emissions_kg: f64,
}

impl Economics {
    /// Breakdown for a route of the given length and duration.
    ///
    /// The fixed cost is only charged when `in_use` is set.
    pub fn from_totals(distance_km: f64, time_minutes: f64, in_use: bool, config: &CostConfig) -> Self {
        let fuel_cost =
            distance_km * config.fuel_consumption_l_per_km * config.fuel_price_per_liter;
        let labor_cost = time_minutes / 60.0 * config.driver_wage_per_hour;
        let fixed_cost = if in_use {
            config.fixed_cost_per_vehicle_per_day
        } else {
            0.0
        };
        let maintenance_cost = distance_km * config.maintenance_per_km;
        Self {
            fuel_cost,
            labor_cost,
            fixed_cost,
            maintenance_cost,
            total_cost: fuel_cost + labor_cost + fixed_cost + maintenance_cost,
            emissions_kg: distance_km * config.emissions_factor_kg_per_km,
        }
    }
}

impl Add for Economics {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            fuel_cost: self.fuel_cost + rhs.fuel_cost,
            labor_cost: self.labor_cost + rhs.labor_cost,
            fixed_cost: self.fixed_cost + rhs.fixed_cost,
            maintenance_cost: self.maintenance_cost + rhs.maintenance_cost,
            total_cost: self.total_cost + rhs.total_cost,
            emissions_kg: self.emissions_kg + rhs.emissions_kg,
        }
    }
}

impl Sum for Economics {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Computes the cost and emissions breakdown of one route.
///
/// # Examples
///
/// ```
/// use u_dispatch::economics::{CostConfig, Economics};
///
/// // 100 km in 120 minutes with default prices
/// let e = Economics::from_totals(100.0, 120.0, true, &CostConfig::default());
/// assert!((e.fuel_cost - 15.0).abs() < 1e-9);
/// assert!((e.labor_cost - 30.0).abs() < 1e-9);
/// assert!((e.total_cost - 345.0).abs() < 1e-9);
/// ```
pub fn economics(route: &Route, config: &CostConfig) -> Economics {
    Economics::from_totals(
        route.distance_km(),
        route.duration_minutes(),
        !route.is_empty(),
        config,
    )
}

/// Pay multiplier applied to minutes beyond the regular shift.
pub const OVERTIME_MULTIPLIER: f64 = 1.5;

/// Driver pay split into regular and overtime parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LaborCost {
    pub regular_minutes: f64,
    pub overtime_minutes: f64,
    pub regular_cost: f64,
    pub overtime_cost: f64,
    pub total_cost: f64,
}

/// Prices `time_minutes` of driving when everything past `regular_minutes`
/// is paid at [`OVERTIME_MULTIPLIER`] times the wage.
///
/// # Examples
///
/// ```
/// use u_dispatch::economics::{labor_with_overtime, CostConfig};
///
/// // 9 hours against an 8-hour shift at 15/h
/// let labor = labor_with_overtime(540.0, 480.0, &CostConfig::default());
/// assert_eq!(labor.overtime_minutes, 60.0);
/// assert!((labor.regular_cost - 120.0).abs() < 1e-9);
/// assert!((labor.overtime_cost - 22.5).abs() < 1e-9);
/// assert!((labor.total_cost - 142.5).abs() < 1e-9);
/// ```
pub fn labor_with_overtime(time_minutes: f64, regular_minutes: f64, config: &CostConfig) -> LaborCost {
    let regular_minutes_worked = time_minutes.min(regular_minutes).max(0.0);
    let overtime_minutes = (time_minutes - regular_minutes).max(0.0);
    let wage = config.driver_wage_per_hour;
    let regular_cost = regular_minutes_worked / 60.0 * wage;
    let overtime_cost = overtime_minutes / 60.0 * wage * OVERTIME_MULTIPLIER;
    LaborCost {
        regular_minutes: regular_minutes_worked,
        overtime_minutes,
        regular_cost,
        overtime_cost,
        total_cost: regular_cost + overtime_cost,
    }
}

/// One route's share of the fleet totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteEconomics {
    pub vehicle_id: String,
    pub distance_km: f64,
    pub time_minutes: f64,
    pub deliveries: usize,
    pub economics: Economics,
}

impl RouteEconomics {
    pub fn cost_per_delivery(&self) -> f64 {
        if self.deliveries == 0 {
            0.0
        } else {
            self.economics.total_cost / self.deliveries as f64
        }
    }
}

/// Totals and unit economics of a whole solution.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FleetEconomics {
    pub totals: Economics,
    pub distance_km: f64,
    pub time_minutes: f64,
    pub deliveries: usize,
    pub routes: Vec<RouteEconomics>,
}

impl FleetEconomics {
    /// Prices every route with the model's cost parameters, applying each
    /// vehicle's own overrides.
    pub fn of(solution: &Solution, model: &ProblemModel) -> Self {
        let routes: Vec<RouteEconomics> = solution
            .routes()
            .map(|route| {
                let config = model.cost_config_for(route.vehicle_index());
                RouteEconomics {
                    vehicle_id: route.vehicle_id().to_string(),
                    distance_km: route.distance_km(),
                    time_minutes: route.duration_minutes(),
                    deliveries: route.len(),
                    economics: economics(route, &config),
                }
            })
            .collect();
        Self {
            totals: routes.iter().map(|r| r.economics).sum(),
            distance_km: routes.iter().map(|r| r.distance_km).sum(),
            time_minutes: routes.iter().map(|r| r.time_minutes).sum(),
            deliveries: routes.iter().map(|r| r.deliveries).sum(),
            routes,
        }
    }

    pub fn cost_per_km(&self) -> f64 {
        ratio(self.totals.total_cost, self.distance_km)
    }

    pub fn cost_per_delivery(&self) -> f64 {
        ratio(self.totals.total_cost, self.deliveries as f64)
    }

    pub fn emissions_per_km(&self) -> f64 {
        ratio(self.totals.emissions_kg, self.distance_km)
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

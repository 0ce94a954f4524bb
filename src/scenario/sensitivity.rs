//! One-parameter sweeps over a range of values.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ParamOverride, ScenarioMetrics, ScenarioStatus};

/// Parameter varied by a sensitivity sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepParameter {
    FuelPrice,
    DriverWage,
    SpeedReduction,
    MaxDriverMinutes,
}

impl SweepParameter {
    pub(crate) fn overrides(self, value: f64) -> ParamOverride {
        let base = ParamOverride::default();
        match self {
            Self::FuelPrice => base.with_fuel_price(value),
            Self::DriverWage => base.with_driver_wage(value),
            Self::SpeedReduction => base.with_speed_reduction(value),
            Self::MaxDriverMinutes => base.with_max_driver_minutes(value),
        }
    }
}

impl fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FuelPrice => "fuel_price",
            Self::DriverWage => "driver_wage",
            Self::SpeedReduction => "speed_reduction",
            Self::MaxDriverMinutes => "max_driver_minutes",
        })
    }
}

/// How strongly total cost reacts to the swept parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityLevel {
    High,
    Moderate,
    Low,
}

impl SensitivityLevel {
    /// Classifies an absolute cost change in percent.
    ///
    /// ```
    /// use u_dispatch::scenario::SensitivityLevel;
    ///
    /// assert_eq!(SensitivityLevel::classify(-25.0), SensitivityLevel::High);
    /// assert_eq!(SensitivityLevel::classify(15.0), SensitivityLevel::Moderate);
    /// assert_eq!(SensitivityLevel::classify(10.0), SensitivityLevel::Low);
    /// ```
    pub fn classify(cost_change_pct: f64) -> Self {
        let pct = cost_change_pct.abs();
        if pct > 20.0 {
            Self::High
        } else if pct > 10.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

/// One sampled value of the swept parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityPoint {
    pub value: f64,
    #[serde(flatten)]
    pub status: ScenarioStatus,
    pub metrics: Option<ScenarioMetrics>,
}

/// Result of a sweep, summarized from the first to the last completed point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityReport {
    pub parameter: SweepParameter,
    pub points: Vec<SensitivityPoint>,
    /// `None` with fewer than two completed points.
    pub cost_change: Option<f64>,
    pub cost_change_pct: Option<f64>,
    pub time_change_minutes: Option<f64>,
    pub level: Option<SensitivityLevel>,
    pub recommendation: String,
}

impl SensitivityReport {
    pub(crate) fn new(parameter: SweepParameter, points: Vec<SensitivityPoint>) -> Self {
        let completed: Vec<&ScenarioMetrics> = points.iter().filter_map(|p| p.metrics.as_ref()).collect();
        let (first, last) = match completed.as_slice() {
            [first, .., last] => (*first, *last),
            _ => {
                return Self {
                    parameter,
                    points,
                    cost_change: None,
                    cost_change_pct: None,
                    time_change_minutes: None,
                    level: None,
                    recommendation: "Not enough completed runs to assess sensitivity".to_string(),
                }
            }
        };

        let cost_change = last.total_cost - first.total_cost;
        let pct = if first.total_cost > 0.0 {
            cost_change / first.total_cost * 100.0
        } else {
            0.0
        };
        let time_change = last.time_minutes - first.time_minutes;
        let violation_change = last.violations as i64 - first.violations as i64;

        Self {
            parameter,
            cost_change: Some(cost_change),
            cost_change_pct: Some(pct),
            time_change_minutes: Some(time_change),
            level: Some(SensitivityLevel::classify(pct)),
            recommendation: recommendation(parameter, pct, time_change, violation_change).to_string(),
            points,
        }
    }

    pub fn completed(&self) -> impl Iterator<Item = &SensitivityPoint> {
        self.points.iter().filter(|p| p.metrics.is_some())
    }
}

fn recommendation(parameter: SweepParameter, pct: f64, time_change: f64, violation_change: i64) -> &'static str {
    match parameter {
        SweepParameter::FuelPrice if pct.abs() > 20.0 => {
            "Fuel dominates cost; lock in fuel prices or consolidate routes to cut distance"
        }
        SweepParameter::FuelPrice => "Fuel price has limited effect on the current routes",
        SweepParameter::DriverWage if pct.abs() > 15.0 => {
            "Labor dominates cost; shorten route time and reduce the vehicles in use"
        }
        SweepParameter::DriverWage => "Labor cost is under control at current utilization",
        SweepParameter::SpeedReduction if time_change > 60.0 => {
            "Congestion adds over an hour; dispatch earlier or avoid peak corridors"
        }
        SweepParameter::SpeedReduction => "Routes absorb moderate traffic delays",
        SweepParameter::MaxDriverMinutes if violation_change != 0 => {
            "Shift length changes the number of violations; review driver schedules"
        }
        SweepParameter::MaxDriverMinutes => "Routes fit within the tested shift lengths",
    }
}

/// `steps` evenly spaced values from `min` to `max`, both included.
pub(crate) fn linspace(min: f64, max: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (steps - 1) as f64;
            (0..steps).map(|i| min + step * i as f64).collect()
        }
    }
}

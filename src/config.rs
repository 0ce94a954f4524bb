//! Planner configuration loaded from TOML.
//!
//! Every section and field is optional; missing values take their
//! defaults.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use u_dispatch::config::PlannerConfig;
//!
//! let config = PlannerConfig::from_toml_str(r#"
//!     [cost]
//!     fuel_price_per_liter = 1.9
//!
//!     [limits]
//!     max_driver_minutes = 540
//!
//!     [solver]
//!     time_budget_secs = 5
//!     seed = 7
//! "#).unwrap();
//!
//! assert_eq!(config.cost.fuel_price_per_liter, 1.9);
//! assert_eq!(config.cost.driver_wage_per_hour, 15.0);
//! assert_eq!(config.limits.max_driver_minutes, 540.0);
//! assert_eq!(config.solver.time_budget(), Duration::from_secs(5));
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::economics::CostConfig;
use crate::solver::SolverParams;
use crate::validation::OperationalLimits;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Search settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Wall-clock budget per solve, in seconds.
    pub time_budget_secs: f64,
    pub seed: u64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            time_budget_secs: 10.0,
            seed: SolverParams::default().seed,
        }
    }
}

impl SolverSettings {
    /// The budget as a [`Duration`], clamped to `[0, Duration::MAX]`.
    pub fn time_budget(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_budget_secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    pub fn params(&self) -> SolverParams {
        SolverParams { seed: self.seed }
    }
}

/// Cost parameters, operational limits and solver settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub cost: CostConfig,
    pub limits: OperationalLimits,
    pub solver: SolverSettings,
}

impl PlannerConfig {
    /// Loads and checks configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and checks configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cost
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let limits = [
            ("limits.max_driver_minutes", self.limits.max_driver_minutes),
            ("limits.cold_chain_minutes", self.limits.cold_chain_minutes),
        ];
        if let Some((name, value)) = limits.iter().find(|(_, v)| !(v.is_finite() && *v > 0.0)) {
            return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
        }
        let band = self.limits.overtime_warning_band_minutes;
        if !(band.is_finite() && band >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "limits.overtime_warning_band_minutes must be non-negative, got {band}"
            )));
        }

        let budget = self.solver.time_budget_secs;
        if Duration::try_from_secs_f64(budget).is_err() {
            return Err(ConfigError::Invalid(format!(
                "solver.time_budget_secs must be a non-negative number of seconds, got {budget}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_default() {
        let config = PlannerConfig::from_toml_str("").expect("parses");
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.solver.params(), SolverParams::default());
    }

    #[test]
    fn test_invalid_values() {
        let err = PlannerConfig::from_toml_str("[cost]\ndriver_wage_per_hour = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("driver_wage_per_hour")));

        let err = PlannerConfig::from_toml_str("[limits]\ncold_chain_minutes = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("cold_chain_minutes")));

        let err = PlannerConfig::from_toml_str("[solver]\ntime_budget_secs = -2").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_budget_beyond_duration_range() {
        let err = PlannerConfig::from_toml_str("[solver]\ntime_budget_secs = 1e30").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("time_budget_secs")));

        let settings = SolverSettings {
            time_budget_secs: 1e30,
            ..SolverSettings::default()
        };
        assert_eq!(settings.time_budget(), Duration::MAX);
        let settings = SolverSettings {
            time_budget_secs: f64::NAN,
            ..SolverSettings::default()
        };
        assert_eq!(settings.time_budget(), Duration::ZERO);
    }

    #[test]
    fn test_bad_toml() {
        let err = PlannerConfig::from_toml_str("[cost\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = PlannerConfig::load("/nonexistent/u-dispatch.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

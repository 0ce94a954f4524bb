//! Error types raised while building a problem model.

use thiserror::Error;

/// Caller-input problems detected when a [`ProblemModel`](crate::models::ProblemModel)
/// is constructed.
///
/// This is the only hard-failure class of the planning core: once a model
/// exists, solving, validation, costing and scenario comparison are total.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("matrix has {actual} entries, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("unknown id: {0}")]
    UnknownId(String),

    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error("invalid vehicle {vehicle_id}: {reason}")]
    InvalidVehicle { vehicle_id: String, reason: String },

    #[error("invalid order {order_id}: {reason}")]
    InvalidOrder { order_id: String, reason: String },

    #[error("invalid travel entry at ({row}, {col}): {value}")]
    InvalidMatrix { row: usize, col: usize, value: f64 },

    #[error("invalid cost parameter: {0}")]
    InvalidCostConfig(&'static str),
}

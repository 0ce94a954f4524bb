use serde::Serialize;

/// How urgently a violation needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Critical,
}

/// What rule a route breaks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViolationKind {
    DriverOvertime {
        vehicle_id: String,
        excess_minutes: f64,
        /// Extra pay for the excess at the overtime rate.
        overtime_cost: f64,
    },
    ColdChainExceeded {
        order_id: String,
        arrival_minutes: f64,
        limit_minutes: f64,
    },
    CapacityOverage {
        vehicle_id: String,
        excess_load: f64,
    },
}

/// A broken operational rule with a suggested fix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    #[serde(flatten)]
    pub kind: ViolationKind,
    pub severity: Severity,
    pub message: String,
    pub recommendation: String,
}

impl Violation {
    pub(crate) fn driver_overtime(
        vehicle_id: &str,
        excess: f64,
        overtime_cost: f64,
        limit: f64,
        warning_band: f64,
    ) -> Self {
        let (severity, recommendation) = if excess <= warning_band {
            (
                Severity::Warning,
                "Approve paid overtime or move the last stop to another vehicle",
            )
        } else {
            (
                Severity::Critical,
                "Split the route or add a vehicle to bring the shift within the limit",
            )
        };
        Self {
            message: format!(
                "Vehicle {vehicle_id} exceeds the {:.1}-hour driver limit by {excess:.0} minutes \
                 ({overtime_cost:.2} in overtime pay)",
                limit / 60.0
            ),
            kind: ViolationKind::DriverOvertime {
                vehicle_id: vehicle_id.to_string(),
                excess_minutes: excess,
                overtime_cost,
            },
            severity,
            recommendation: recommendation.to_string(),
        }
    }

    pub(crate) fn cold_chain_exceeded(order_id: &str, arrival: f64, limit: f64) -> Self {
        Self {
            message: format!(
                "Cold-chain order {order_id} delivered after {arrival:.0} minutes in transit (limit {limit:.0})"
            ),
            kind: ViolationKind::ColdChainExceeded {
                order_id: order_id.to_string(),
                arrival_minutes: arrival,
                limit_minutes: limit,
            },
            severity: Severity::Critical,
            recommendation: "Deliver this order earlier in the route or on a dedicated refrigerated run"
                .to_string(),
        }
    }

    pub(crate) fn capacity_overage(vehicle_id: &str, excess: f64) -> Self {
        Self {
            message: format!("Vehicle {vehicle_id} is loaded {excess:.1} units over capacity"),
            kind: ViolationKind::CapacityOverage {
                vehicle_id: vehicle_id.to_string(),
                excess_load: excess,
            },
            severity: Severity::Critical,
            recommendation: "Move orders to a vehicle with spare capacity".to_string(),
        }
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HeatmapError {
    #[error("Invalid decay config: {0}")]
    InvalidDecayConfig(String),
}

/// A stored report the aggregator refused to turn into a heat point
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Report {report_id} skipped: {reason}")]
pub struct MalformedReport {
    pub report_id: Uuid,
    pub reason: MalformedReason,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedReason {
    #[error("criticality weight is missing")]
    MissingWeight,

    #[error("criticality weight {0} is not a finite number")]
    NonFiniteWeight(f64),

    #[error("criticality weight {0} is outside [0, 1]")]
    WeightOutOfRange(f64),

    #[error("coordinates ({latitude}, {longitude}) are out of range")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

//! Domain error types.
//!
//! These errors represent validation failures in the domain layer.
//! They are distinct from remote service and transport errors.

use super::{InvalidStationCode, InvalidTrainNumber};

/// Domain-level errors for validation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// A station code failed validation
    #[error(transparent)]
    StationCode(#[from] InvalidStationCode),

    /// A train number failed validation
    #[error(transparent)]
    TrainNumber(#[from] InvalidTrainNumber),

    /// A date could not be parsed or is out of range
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A price could not be represented
    #[error("invalid price: {0}")]
    InvalidPrice(String),
}

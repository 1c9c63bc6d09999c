//! Fare aggregation error types.

use crate::domain::{DomainError, Station, TrainNumber};
use crate::stations::StationError;
use crate::timetable::QueryError;

/// Errors that can occur while computing fares.
#[derive(Debug, thiserror::Error)]
pub enum FareError {
    /// A station name couldn't be resolved
    #[error(transparent)]
    Station(#[from] StationError),

    /// A timetable query failed
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The train doesn't appear in the fare results for a pair
    #[error("train {train} is not offered from {from} to {to}")]
    TrainNotOffered {
        train: TrainNumber,
        from: Station,
        to: Station,
    },

    /// The route has no stops
    #[error("train {0} has no stops on this date")]
    EmptyRoute(TrainNumber),

    /// A station isn't served in the required order on the route
    #[error("train {train} does not call at {station}")]
    NotOnRoute { train: TrainNumber, station: Station },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

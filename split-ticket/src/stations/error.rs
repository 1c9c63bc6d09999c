//! Station resolution error types.

use crate::domain::Station;
use crate::timetable::QueryError;

/// Errors that can occur when resolving a station name.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// No station starts with the given name
    #[error("no station matches {0:?}")]
    NotFound(String),

    /// Several stations match and nobody picked one
    #[error("{name:?} is ambiguous: {}", format_candidates(.candidates))]
    Ambiguous {
        name: String,
        candidates: Vec<Station>,
    },

    /// Querying the suggestion endpoint failed
    #[error(transparent)]
    Query(#[from] QueryError),
}

fn format_candidates(candidates: &[Station]) -> String {
    candidates
        .iter()
        .map(Station::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

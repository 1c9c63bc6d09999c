//! Timetable service client.
//!
//! The service answers every query asynchronously: a submit request
//! returns a request id, and the result is fetched by polling with that
//! id (plus a session token for some queries). Responses come either as a
//! markup tree or as a JSON object depending on the query.
//!
//! Key characteristics of the service:
//! - Results are never returned synchronously; a poll must echo the
//!   submit's `rid` and `SESSION_ID` or it returns unrelated data
//! - Correlation also relies on session cookies, so each query gets its
//!   own cookie-carrying session
//! - Station codes are numeric and dates are `DD.MM.YYYY`

mod client;
mod convert;
mod error;
mod markup;
#[cfg(test)]
pub(crate) mod mock;
mod protocol;
mod transport;
mod types;

pub use client::{AsyncQueryClient, TimetableConfig};
pub use convert::{ConversionError, convert_route, convert_trip_variants};
pub use error::QueryError;
pub use markup::MarkupElement;
pub use protocol::{
    Correlation, ExchangeState, ParsedResponse, PollOutcome, QueryRequest, ResponseFormat,
};
pub use transport::{HttpSession, HttpTransport, Session, Transport};
pub use types::{CarOffer, FareResponse, Numeric, TrainOffer, TripPage};

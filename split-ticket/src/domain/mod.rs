//! Domain types for the split-ticket fare engine.
//!
//! These types represent validated timetable data. They enforce their
//! invariants at construction time, so code receiving them can trust
//! their validity.

mod date;
mod error;
mod fare;
mod station;
mod stop;
mod train;

pub use date::{format_service_date, parse_departure_date, return_date};
pub use error::DomainError;
pub use fare::{FareClass, FareQuote, Price, SplitQuote, TripVariant, TripVariants};
pub use station::{InvalidStationCode, Station, StationCode};
pub use stop::{Route, Stop};
pub use train::{InvalidTrainNumber, TrainNumber};

//! Station name resolution.
//!
//! Turns names typed by a person into stations with service codes, using
//! a built-in table first and the suggestion endpoint otherwise.

mod client;
mod error;
mod overrides;
mod resolver;

pub use client::{SuggestionDto, fetch_suggestions};
pub use error::StationError;
pub use overrides::{lookup, normalize};
pub use resolver::{Disambiguator, MAX_CANDIDATES, StationResolver, filter_by_prefix};

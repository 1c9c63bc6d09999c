//! Fare lookup and split-ticket comparison.
//!
//! Answers: "on this train, is it cheaper to buy two tickets split at an
//! intermediate stop than one ticket end to end?"

mod aggregator;
mod config;
mod error;

pub use aggregator::{FareAggregator, FareComparison, Saving, combine_legs};
pub use config::{AggregatorConfig, LegFailurePolicy};
pub use error::FareError;

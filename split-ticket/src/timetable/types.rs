//! Timetable service response DTOs.
//!
//! These types map directly to the object-format fare response. The
//! service is loose about numeric fields (numbers sometimes arrive as
//! strings), so those go through [`Numeric`].

use serde::Deserialize;

/// Object-format response of the fare query.
#[derive(Debug, Clone, Deserialize)]
pub struct FareResponse {
    /// Trip pages; the outbound direction is the first one.
    #[serde(default)]
    pub tp: Vec<TripPage>,
}

/// One direction's worth of trains.
#[derive(Debug, Clone, Deserialize)]
pub struct TripPage {
    #[serde(default)]
    pub list: Vec<TrainOffer>,
}

/// One train serving the requested pair.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainOffer {
    /// Train number, e.g. "016А".
    pub number: String,

    /// Per-class availability.
    #[serde(default)]
    pub cars: Vec<CarOffer>,
}

/// Availability and tariff for one fare class on a train.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarOffer {
    /// Fare class label.
    pub type_loc: String,

    pub free_seats: Numeric,

    pub tariff: Numeric,
}

/// A numeric field that may arrive as a number or as a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Integer(u64),
    Decimal(f64),
    Text(String),
}

//! Conversion from timetable responses to domain types.

use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::{
    FareClass, FareQuote, Price, Route, Station, StationCode, Stop, TrainNumber, TripVariant,
    TripVariants,
};

use super::error::QueryError;
use super::markup::MarkupElement;
use super::types::{CarOffer, FareResponse, Numeric};

/// Error during response to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse a station code
    #[error("invalid station code: {0}")]
    InvalidStationCode(String),

    /// Failed to parse a train number
    #[error("invalid train number: {0}")]
    InvalidTrainNumber(String),

    /// A numeric field held something else
    #[error("invalid number in {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Object didn't match the expected shape
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

impl From<ConversionError> for QueryError {
    fn from(err: ConversionError) -> Self {
        QueryError::protocol(err.to_string())
    }
}

/// Build a route from a markup route document.
///
/// Stops are taken from `Routes/Stop` in document order. A stop without a
/// `WaitingTime` child gets a waiting time of 0.
pub fn convert_route(
    root: &MarkupElement,
    train: TrainNumber,
    date: NaiveDate,
) -> Result<Route, ConversionError> {
    let stops = root
        .select(&["Routes", "Stop"])
        .into_iter()
        .enumerate()
        .map(|(index, node)| convert_stop(node, index))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Route::new(train, date, stops))
}

fn convert_stop(node: &MarkupElement, index: usize) -> Result<Stop, ConversionError> {
    let code = node
        .attribute("Code")
        .ok_or(ConversionError::MissingField("Stop/@Code"))?;
    let code = StationCode::parse(code)
        .map_err(|_| ConversionError::InvalidStationCode(code.to_string()))?;

    let name = node
        .attribute("Station")
        .ok_or(ConversionError::MissingField("Stop/@Station"))?;

    let waiting_time_secs = match node.child("WaitingTime").map(|n| n.text()) {
        None | Some("") => 0,
        Some(text) => text.parse().map_err(|_| ConversionError::InvalidNumber {
            field: "WaitingTime",
            value: text.to_string(),
        })?,
    };

    Ok(Stop::new(Station::new(code, name), index, waiting_time_secs))
}

/// Build per-train fare variants from an object-format fare response.
///
/// Only the first trip page (the outbound direction) is used.
pub fn convert_trip_variants(value: Value) -> Result<TripVariants, ConversionError> {
    let response: FareResponse =
        serde_json::from_value(value).map_err(|e| ConversionError::Shape(e.to_string()))?;

    let page = response
        .tp
        .into_iter()
        .next()
        .ok_or(ConversionError::MissingField("tp[0]"))?;

    let mut variants = TripVariants::new();
    for offer in page.list {
        let train = TrainNumber::parse(&offer.number)
            .map_err(|_| ConversionError::InvalidTrainNumber(offer.number.clone()))?;

        let variant = offer
            .cars
            .iter()
            .map(convert_car)
            .collect::<Result<TripVariant, _>>()?;

        variants.insert(train, variant);
    }

    Ok(variants)
}

fn convert_car(car: &CarOffer) -> Result<(FareClass, FareQuote), ConversionError> {
    let free_seats = seat_count(&car.free_seats)?;
    let price = price(&car.tariff)?;
    Ok((
        FareClass::new(car.type_loc.clone()),
        FareQuote::new(free_seats, price),
    ))
}

fn seat_count(value: &Numeric) -> Result<u32, ConversionError> {
    let invalid = || ConversionError::InvalidNumber {
        field: "freeSeats",
        value: format!("{value:?}"),
    };

    match value {
        Numeric::Integer(n) => u32::try_from(*n).map_err(|_| invalid()),
        Numeric::Decimal(_) => Err(invalid()),
        Numeric::Text(s) => s.trim().parse().map_err(|_| invalid()),
    }
}

fn price(value: &Numeric) -> Result<Price, ConversionError> {
    let invalid = || ConversionError::InvalidNumber {
        field: "tariff",
        value: format!("{value:?}"),
    };

    match value {
        Numeric::Integer(n) => Ok(Price::from_units(*n)),
        Numeric::Decimal(d) => Price::from_decimal(*d).map_err(|_| invalid()),
        Numeric::Text(s) => Price::parse(s).map_err(|_| invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn train() -> TrainNumber {
        TrainNumber::parse("016А").unwrap()
    }

    #[test]
    fn route_stops_in_document_order() {
        let root = MarkupElement::parse(
            r#"<Response><Routes>
                <Stop Code="2004000" Station="САНКТ-ПЕТЕРБУРГ"><WaitingTime>0</WaitingTime></Stop>
                <Stop Code="2004600" Station="ТВЕРЬ"><WaitingTime>120</WaitingTime></Stop>
                <Stop Code="2000000" Station="МОСКВА"/>
            </Routes></Response>"#,
        )
        .unwrap();

        let route = convert_route(&root, train(), date()).unwrap();
        let stops = route.stops();
        assert_eq!(stops.len(), 3);
        assert_eq!(stops[0].station.name, "САНКТ-ПЕТЕРБУРГ");
        assert_eq!(stops[1].station.code, StationCode::from_u64(2004600));
        assert_eq!(stops[1].waiting_time_secs, 120);
        assert_eq!(stops[2].index, 2);
    }

    #[test]
    fn missing_waiting_time_defaults_to_zero() {
        let root = MarkupElement::parse(
            r#"<Response><Routes><Stop Code="1" Station="A"/><Stop Code="2" Station="B"><WaitingTime/></Stop></Routes></Response>"#,
        )
        .unwrap();

        let route = convert_route(&root, train(), date()).unwrap();
        assert_eq!(route.stops()[0].waiting_time_secs, 0);
        assert_eq!(route.stops()[1].waiting_time_secs, 0);
    }

    #[test]
    fn garbage_waiting_time_is_an_error() {
        let root = MarkupElement::parse(
            r#"<Response><Routes><Stop Code="1" Station="A"><WaitingTime>soon</WaitingTime></Stop></Routes></Response>"#,
        )
        .unwrap();

        assert!(matches!(
            convert_route(&root, train(), date()),
            Err(ConversionError::InvalidNumber { field: "WaitingTime", .. })
        ));
    }

    #[test]
    fn empty_route_is_valid() {
        let root = MarkupElement::parse("<Response><Routes/></Response>").unwrap();
        assert!(convert_route(&root, train(), date()).unwrap().is_empty());

        let root = MarkupElement::parse("<Response/>").unwrap();
        assert!(convert_route(&root, train(), date()).unwrap().is_empty());
    }

    #[test]
    fn stop_without_code_is_an_error() {
        let root =
            MarkupElement::parse(r#"<Response><Routes><Stop Station="A"/></Routes></Response>"#)
                .unwrap();
        assert!(matches!(
            convert_route(&root, train(), date()),
            Err(ConversionError::MissingField("Stop/@Code"))
        ));
    }

    #[test]
    fn conversion_error_becomes_protocol_error() {
        let err: QueryError = ConversionError::MissingField("tp[0]").into();
        assert!(matches!(err, QueryError::Protocol { .. }));
        assert!(err.to_string().contains("tp[0]"));
    }

    #[test]
    fn trip_variants_per_train() {
        let value = json!({
            "result": "OK",
            "tp": [{"list": [
                {"number": "016А", "cars": [
                    {"typeLoc": "Плацкартный", "freeSeats": 12, "tariff": 2100},
                    {"typeLoc": "Купе", "freeSeats": 3, "tariff": 4350}
                ]},
                {"number": "020У", "cars": [
                    {"typeLoc": "СВ", "freeSeats": 0, "tariff": "9100.50"}
                ]}
            ]}]
        });

        let variants = convert_trip_variants(value).unwrap();
        assert_eq!(variants.len(), 2);

        let first = variants.for_train(&train()).unwrap();
        let classes: Vec<_> = first.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(classes, vec!["Плацкартный", "Купе"]);
        assert_eq!(
            first.get(&FareClass::new("Купе")).unwrap(),
            &FareQuote::new(3, Price::from_units(4350))
        );

        let second = variants
            .for_train(&TrainNumber::parse("020У").unwrap())
            .unwrap();
        let sv = second.get(&FareClass::new("СВ")).unwrap();
        assert!(sv.is_sold_out());
        assert_eq!(sv.price, Price::from_minor(910050));
    }

    #[test]
    fn only_first_trip_page_is_used() {
        let value = json!({"tp": [
            {"list": [{"number": "016А", "cars": []}]},
            {"list": [{"number": "015А", "cars": []}]}
        ]});

        let variants = convert_trip_variants(value).unwrap();
        assert_eq!(variants.len(), 1);
        assert!(variants.for_train(&train()).is_some());
    }

    #[test]
    fn missing_trip_page_is_an_error() {
        assert!(matches!(
            convert_trip_variants(json!({"result": "OK", "tp": []})),
            Err(ConversionError::MissingField("tp[0]"))
        ));
    }

    #[test]
    fn negative_seats_are_rejected() {
        let value = json!({"tp": [{"list": [{"number": "016А", "cars": [
            {"typeLoc": "Купе", "freeSeats": -1, "tariff": 100}
        ]}]}]});

        assert!(matches!(
            convert_trip_variants(value),
            Err(ConversionError::InvalidNumber { field: "freeSeats", .. })
        ));
    }
}

//! Departure date handling.
//!
//! The timetable service wants dates as `DD.MM.YYYY`. Fare queries are
//! shaped like round trips, so every fare request also carries a return
//! date one day after the outbound one.

use chrono::NaiveDate;

use super::DomainError;

/// Date format the timetable service expects.
const SERVICE_DATE_FORMAT: &str = "%d.%m.%Y";

/// Format a date the way the timetable service expects it.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use split_ticket::domain::format_service_date;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// assert_eq!(format_service_date(date), "05.03.2024");
/// ```
pub fn format_service_date(date: NaiveDate) -> String {
    date.format(SERVICE_DATE_FORMAT).to_string()
}

/// Parse a user-supplied departure date.
///
/// Accepts the service's own `DD.MM.YYYY` form as well as ISO `YYYY-MM-DD`.
pub fn parse_departure_date(s: &str) -> Result<NaiveDate, DomainError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, SERVICE_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|_| DomainError::InvalidDate(s.to_string()))
}

/// The return-direction date the fare query shape requires (`dt1`).
pub fn return_date(departure: NaiveDate) -> Result<NaiveDate, DomainError> {
    departure
        .succ_opt()
        .ok_or_else(|| DomainError::InvalidDate(format_service_date(departure)))
}

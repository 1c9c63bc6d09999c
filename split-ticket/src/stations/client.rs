//! Station suggestion endpoint client.

use serde::Deserialize;
use tracing::debug;

use crate::domain::{Station, StationCode};
use crate::timetable::{AsyncQueryClient, Numeric, QueryError, Transport};

/// Language of returned station names.
const SUGGEST_LANG: &str = "ru";

/// The service sends this with every suggestion request. Its meaning is
/// undocumented, so it's passed through unchanged.
const SUGGEST_LAT: &str = "3";

/// One candidate as returned by the suggestion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionDto {
    /// Station code.
    pub c: Numeric,
    /// Station name.
    pub n: String,
}

impl SuggestionDto {
    fn into_station(self) -> Result<Station, QueryError> {
        let code = match &self.c {
            Numeric::Integer(n) => Some(StationCode::from_u64(*n)),
            Numeric::Text(s) => StationCode::parse(s).ok(),
            Numeric::Decimal(_) => None,
        }
        .ok_or_else(|| {
            QueryError::protocol(format!("suggestion {:?} has invalid code {:?}", self.n, self.c))
        })?;

        Ok(Station::new(code, self.n))
    }
}

/// Fetch station candidates for a name prefix, in the order the service
/// returned them.
pub async fn fetch_suggestions<T: Transport>(
    client: &AsyncQueryClient<T>,
    prefix: &str,
) -> Result<Vec<Station>, QueryError> {
    let params = [
        ("stationNamePart", prefix),
        ("lang", SUGGEST_LANG),
        ("compactMode", "y"),
        ("lat", SUGGEST_LAT),
    ]
    .map(|(k, v)| (k.to_string(), v.to_string()));

    let value = client
        .fetch_object(&client.config().suggest_url, &params)
        .await?;

    let suggestions: Vec<SuggestionDto> = serde_json::from_value(value)
        .map_err(|e| QueryError::protocol(format!("malformed suggestions: {e}")))?;

    debug!(prefix, count = suggestions.len(), "Fetched station suggestions");

    suggestions
        .into_iter()
        .map(SuggestionDto::into_station)
        .collect()
}

//! Train route lookup.
//!
//! Fetches the ordered stops of one train on one departure date.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Route, TrainNumber, format_service_date};
use crate::timetable::{
    AsyncQueryClient, HttpTransport, QueryError, QueryRequest, ResponseFormat, Transport,
    convert_route,
};

const ROUTE_STRUCTURE_ID: u32 = 735;
const ROUTE_LAYER_ID: u32 = 5451;

/// Fetches train routes from the timetable service.
#[derive(Debug, Clone)]
pub struct RouteFetcher<T = HttpTransport> {
    client: AsyncQueryClient<T>,
}

impl<T: Transport> RouteFetcher<T> {
    pub fn new(client: AsyncQueryClient<T>) -> Self {
        Self { client }
    }

    /// The query used to look up `train` departing on `date`.
    pub fn route_request(train: &TrainNumber, date: NaiveDate) -> QueryRequest {
        QueryRequest::new(ROUTE_STRUCTURE_ID, ROUTE_LAYER_ID, ResponseFormat::Markup)
            .param("train_num", train)
            .param("date", format_service_date(date))
    }

    /// Fetch the stops of `train` departing on `date`, in route order.
    ///
    /// An empty route is not an error here; the service returns one for
    /// trains that don't run on the date.
    pub async fn fetch_route(
        &self,
        train: &TrainNumber,
        date: NaiveDate,
    ) -> Result<Route, QueryError> {
        let root = self
            .client
            .execute(&Self::route_request(train, date))
            .await?
            .into_markup()?;

        let route = convert_route(&root, train.clone(), date)?;
        debug!(train = %train, %date, stops = route.len(), "Fetched route");
        Ok(route)
    }
}

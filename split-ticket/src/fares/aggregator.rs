//! Split-ticket fare aggregation.
//!
//! For a train running A → … → Z, the direct fare A → Z is compared with
//! every two-ticket alternative A → X, X → Z where X is an intermediate
//! stop of the same train. Only fare classes sold on both legs can be
//! combined.

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::{
    Price, Route, SplitQuote, Station, Stop, TrainNumber, TripVariant, TripVariants,
    format_service_date, return_date,
};
use crate::stations::StationResolver;
use crate::timetable::{
    AsyncQueryClient, HttpTransport, QueryError, QueryRequest, ResponseFormat, Transport,
    convert_trip_variants,
};

use super::config::{AggregatorConfig, LegFailurePolicy};
use super::error::FareError;

const FARE_STRUCTURE_ID: u32 = 735;
const FARE_LAYER_ID: u32 = 5371;

/// Direct fare and split options for one train between its termini.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareComparison {
    pub train: TrainNumber,
    pub origin: Station,
    pub destination: Station,
    /// Direct ticket quotes per fare class.
    pub direct: TripVariant,
    /// Split options in route order.
    pub splits: Vec<SplitQuote>,
    /// Split points whose fares couldn't be fetched (only with
    /// [`LegFailurePolicy::Skip`]).
    pub skipped: Vec<Station>,
}

/// A split option that beats the direct fare of the same class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Saving<'a> {
    pub split: &'a SplitQuote,
    pub direct_price: Price,
    pub saving: Price,
}

impl FareComparison {
    /// Split options strictly cheaper than the direct fare, in route order.
    ///
    /// Classes with no direct quote are never listed.
    pub fn savings(&self) -> Vec<Saving<'_>> {
        self.splits
            .iter()
            .filter_map(|split| {
                let direct = self.direct.get(&split.fare_class)?;
                let saving = split.saving_over(direct)?;
                Some(Saving {
                    split,
                    direct_price: direct.price,
                    saving,
                })
            })
            .collect()
    }
}

/// Split options found along a route, plus the stops that were skipped.
struct SplitOutcome {
    splits: Vec<SplitQuote>,
    skipped: Vec<Station>,
}

/// Computes fares and split-ticket options for trains.
#[derive(Clone)]
pub struct FareAggregator<T = HttpTransport> {
    client: AsyncQueryClient<T>,
    resolver: StationResolver<T>,
    config: AggregatorConfig,
}

impl<T: Transport + Clone> FareAggregator<T> {
    /// Create an aggregator resolving names with a non-interactive resolver.
    pub fn new(client: AsyncQueryClient<T>, config: AggregatorConfig) -> Self {
        let resolver = StationResolver::new(client.clone());
        Self {
            client,
            resolver,
            config,
        }
    }
}

impl<T: Transport> FareAggregator<T> {
    /// Resolve station names with `resolver` (e.g. one with a disambiguator).
    pub fn with_resolver(mut self, resolver: StationResolver<T>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// The fare query for travelling `from` → `to` departing on `date`.
    ///
    /// The service only accepts round-trip-shaped fare queries, so a return
    /// date one day later is always included.
    pub fn fare_request(
        from: &Station,
        to: &Station,
        date: NaiveDate,
    ) -> Result<QueryRequest, FareError> {
        let back = return_date(date)?;

        Ok(
            QueryRequest::new(FARE_STRUCTURE_ID, FARE_LAYER_ID, ResponseFormat::Object)
                .param("dir", 0)
                .param("tfl", 3)
                .param("checkSeats", 1)
                .param("st0", from.name.to_uppercase())
                .param("code0", from.code)
                .param("dt0", format_service_date(date))
                .param("st1", to.name.to_uppercase())
                .param("code1", to.code)
                .param("dt1", format_service_date(back)),
        )
    }

    /// Fare quotes for every train serving `from` → `to` on `date`.
    pub async fn compute_variants(
        &self,
        from: &Station,
        to: &Station,
        date: NaiveDate,
    ) -> Result<TripVariants, FareError> {
        let request = Self::fare_request(from, to, date)?;
        let value = self.client.execute(&request).await?.into_object()?;
        let variants = convert_trip_variants(value).map_err(QueryError::from)?;

        debug!(
            from = %from,
            to = %to,
            %date,
            trains = variants.len(),
            "Fetched trip variants"
        );
        Ok(variants)
    }

    /// Like [`compute_variants`](Self::compute_variants), resolving the
    /// station names first.
    pub async fn compute_variants_by_name(
        &self,
        from: &str,
        to: &str,
        date: NaiveDate,
    ) -> Result<TripVariants, FareError> {
        let from = self.resolver.resolve(from).await?;
        let to = self.resolver.resolve(to).await?;
        self.compute_variants(&from, &to, date).await
    }

    /// Quotes for `train` alone on `from` → `to`.
    pub async fn leg_variant(
        &self,
        from: &Station,
        to: &Station,
        train: &TrainNumber,
        date: NaiveDate,
    ) -> Result<TripVariant, FareError> {
        self.compute_variants(from, to, date)
            .await?
            .take_train(train)
            .ok_or_else(|| FareError::TrainNotOffered {
                train: train.clone(),
                from: from.clone(),
                to: to.clone(),
            })
    }

    /// Split options for `train` at every intermediate stop of `route`.
    ///
    /// Options come out in route order, and within one stop in the order
    /// the first leg listed its fare classes. The termini are never used
    /// as split points.
    pub async fn compute_split_options(
        &self,
        route: &Route,
        train: &TrainNumber,
        date: NaiveDate,
    ) -> Result<Vec<SplitQuote>, FareError> {
        Ok(self.split_outcome(route, train, date).await?.splits)
    }

    /// Direct fare plus all split options for `train` over `route`.
    pub async fn compare(
        &self,
        route: &Route,
        train: &TrainNumber,
        date: NaiveDate,
    ) -> Result<FareComparison, FareError> {
        let (origin, destination) = termini(route, train)?;

        let direct = self
            .leg_variant(&origin.station, &destination.station, train, date)
            .await?;
        let outcome = self.split_outcome(route, train, date).await?;

        Ok(FareComparison {
            train: train.clone(),
            origin: origin.station.clone(),
            destination: destination.station.clone(),
            direct,
            splits: outcome.splits,
            skipped: outcome.skipped,
        })
    }

    async fn split_outcome(
        &self,
        route: &Route,
        train: &TrainNumber,
        date: NaiveDate,
    ) -> Result<SplitOutcome, FareError> {
        let (origin, destination) = termini(route, train)?;
        let (origin, destination) = (&origin.station, &destination.station);

        let mut splits = Vec::new();
        let mut skipped = Vec::new();

        for batch in route.intermediates().chunks(self.config.max_concurrent.max(1)) {
            let futures: Vec<_> = batch
                .iter()
                .map(|stop| async move {
                    let result = self.split_at(origin, stop, destination, train, date).await;
                    (stop, result)
                })
                .collect();

            for (stop, result) in join_all(futures).await {
                match result {
                    Ok(quotes) => splits.extend(quotes),
                    Err(e) if self.config.leg_failure == LegFailurePolicy::Skip => {
                        warn!(
                            train = %train,
                            stop = %stop.station,
                            error = %e,
                            "Skipping split point"
                        );
                        skipped.push(stop.station.clone());
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        debug!(
            train = %train,
            splits = splits.len(),
            skipped = skipped.len(),
            "Split options computed"
        );

        Ok(SplitOutcome { splits, skipped })
    }

    async fn split_at(
        &self,
        origin: &Station,
        stop: &Stop,
        destination: &Station,
        train: &TrainNumber,
        date: NaiveDate,
    ) -> Result<Vec<SplitQuote>, FareError> {
        let first = self.leg_variant(origin, &stop.station, train, date).await?;
        let second = self
            .leg_variant(&stop.station, destination, train, date)
            .await?;
        Ok(combine_legs(&stop.station, &first, &second))
    }
}

/// One split quote per class sold on both legs, in first-leg order.
pub fn combine_legs(
    intermediate: &Station,
    first: &TripVariant,
    second: &TripVariant,
) -> Vec<SplitQuote> {
    first
        .iter()
        .filter_map(|(class, before)| {
            let after = second.get(class)?;
            Some(SplitQuote::from_legs(
                intermediate.clone(),
                class.clone(),
                before,
                after,
            ))
        })
        .collect()
}

fn termini<'r>(route: &'r Route, train: &TrainNumber) -> Result<(&'r Stop, &'r Stop), FareError> {
    match (route.origin(), route.destination()) {
        (Some(origin), Some(destination)) => Ok((origin, destination)),
        _ => Err(FareError::EmptyRoute(train.clone())),
    }
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;

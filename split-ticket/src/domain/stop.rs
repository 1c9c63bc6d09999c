//! Route stop types.
//!
//! A `Stop` is one station call on a train's route. A `Route` keeps the
//! stops in the order the timetable service returned them; the first and
//! last stops are the route's termini.

use chrono::NaiveDate;

use super::{Station, StationCode, TrainNumber};

/// One stop on a train's route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub station: Station,
    /// 0-based position in route order.
    pub index: usize,
    /// Dwell time at this stop, 0 when the service omits it.
    pub waiting_time_secs: u32,
}

impl Stop {
    pub fn new(station: Station, index: usize, waiting_time_secs: u32) -> Self {
        Self {
            station,
            index,
            waiting_time_secs,
        }
    }
}

/// The ordered stops of one train on one departure date.
///
/// An empty route is valid: it is what the service returns for a train
/// that doesn't run on the requested date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub train: TrainNumber,
    pub date: NaiveDate,
    stops: Vec<Stop>,
}

impl Route {
    /// Create a route, renumbering stop indices to match their position.
    pub fn new(train: TrainNumber, date: NaiveDate, stops: Vec<Stop>) -> Self {
        let stops = stops
            .into_iter()
            .enumerate()
            .map(|(index, stop)| Stop { index, ..stop })
            .collect();

        Self { train, date, stops }
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// The first stop (origin terminus).
    pub fn origin(&self) -> Option<&Stop> {
        self.stops.first()
    }

    /// The last stop (destination terminus).
    pub fn destination(&self) -> Option<&Stop> {
        self.stops.last()
    }

    /// Stops strictly between the termini, in route order.
    ///
    /// These are the only candidates for a split point.
    pub fn intermediates(&self) -> &[Stop] {
        if self.stops.len() <= 2 {
            return &[];
        }
        &self.stops[1..self.stops.len() - 1]
    }

    /// Find the first stop at `code` at or after `from_index`.
    pub fn find_stop(&self, code: StationCode, from_index: usize) -> Option<&Stop> {
        self.stops
            .iter()
            .skip(from_index)
            .find(|stop| stop.station.code == code)
    }

    /// The sub-journey from boarding at `from` to alighting at `to`.
    ///
    /// Returns `None` unless `from` is served before `to`. The returned
    /// route's termini are `from` and `to`, so split points are chosen
    /// only between them.
    pub fn between(&self, from: StationCode, to: StationCode) -> Option<Route> {
        let board = self.find_stop(from, 0)?;
        let alight = self.find_stop(to, board.index + 1)?;

        Some(Route::new(
            self.train.clone(),
            self.date,
            self.stops[board.index..=alight.index].to_vec(),
        ))
    }
}

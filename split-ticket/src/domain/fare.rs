//! Fare classes, quotes and split-ticket candidates.

use std::fmt;
use std::ops::Add;

use indexmap::IndexMap;

use super::{DomainError, Station, TrainNumber};

/// A booking category as labelled by the fare service (e.g. "Плацкартный").
///
/// Labels are opaque: they are compared exactly as returned and never
/// normalized, since we can't tell which differences are meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FareClass(String);

impl FareClass {
    pub fn new(label: impl Into<String>) -> Self {
        FareClass(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FareClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A ticket price in hundredths of the service's currency unit.
///
/// # Examples
///
/// ```
/// use split_ticket::domain::Price;
///
/// let a = Price::from_units(1000);
/// let b = Price::from_decimal(1200.5).unwrap();
/// assert_eq!((a + b).to_string(), "2200.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Price(u64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Create a price from hundredths of a unit.
    pub const fn from_minor(minor: u64) -> Self {
        Price(minor)
    }

    /// Create a price from whole units.
    pub const fn from_units(units: u64) -> Self {
        Price(units.saturating_mul(100))
    }

    /// Create a price from a decimal amount, rounded to the nearest hundredth.
    pub fn from_decimal(amount: f64) -> Result<Self, DomainError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(DomainError::InvalidPrice(amount.to_string()));
        }

        let minor = (amount * 100.0).round();
        if minor > u64::MAX as f64 {
            return Err(DomainError::InvalidPrice(amount.to_string()));
        }

        Ok(Price(minor as u64))
    }

    /// Parse a decimal price string such as "1234" or "1234.50".
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        let amount: f64 = trimmed
            .replace(',', ".")
            .parse()
            .map_err(|_| DomainError::InvalidPrice(s.to_string()))?;
        Self::from_decimal(amount)
    }

    pub fn minor(&self) -> u64 {
        self.0
    }

    /// Difference `self - other`, or `None` if `other` is larger.
    pub fn checked_sub(self, other: Price) -> Option<Price> {
        self.0.checked_sub(other.0).map(Price)
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = self.0 / 100;
        let cents = self.0 % 100;
        if cents == 0 {
            write!(f, "{units}")
        } else {
            write!(f, "{units}.{cents:02}")
        }
    }
}

/// Availability and price of one fare class on one leg.
///
/// `free_seats == 0` means sold out; it is still a valid quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FareQuote {
    pub free_seats: u32,
    pub price: Price,
}

impl FareQuote {
    pub fn new(free_seats: u32, price: Price) -> Self {
        Self { free_seats, price }
    }

    pub fn is_sold_out(&self) -> bool {
        self.free_seats == 0
    }
}

/// All fare quotes for one train on one origin-destination pair.
///
/// Fare classes keep the order in which the service listed them. If the
/// service lists a class twice, the later quote replaces the earlier one
/// but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripVariant {
    quotes: IndexMap<FareClass, FareQuote>,
}

impl TripVariant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class: FareClass, quote: FareQuote) {
        self.quotes.insert(class, quote);
    }

    pub fn get(&self, class: &FareClass) -> Option<&FareQuote> {
        self.quotes.get(class)
    }

    pub fn contains(&self, class: &FareClass) -> bool {
        self.quotes.contains_key(class)
    }

    /// Quotes in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&FareClass, &FareQuote)> {
        self.quotes.iter()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl FromIterator<(FareClass, FareQuote)> for TripVariant {
    fn from_iter<I: IntoIterator<Item = (FareClass, FareQuote)>>(iter: I) -> Self {
        let mut variant = TripVariant::new();
        for (class, quote) in iter {
            variant.insert(class, quote);
        }
        variant
    }
}

/// Trip variants for every train serving one station pair on one date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripVariants {
    trains: IndexMap<TrainNumber, TripVariant>,
}

impl TripVariants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, train: TrainNumber, variant: TripVariant) {
        self.trains.insert(train, variant);
    }

    /// The variant for one train, if it serves this pair.
    pub fn for_train(&self, train: &TrainNumber) -> Option<&TripVariant> {
        self.trains.get(train)
    }

    /// Owned variant for one train, consuming the collection.
    pub fn take_train(mut self, train: &TrainNumber) -> Option<TripVariant> {
        self.trains.swap_remove(train)
    }

    pub fn trains(&self) -> impl Iterator<Item = &TrainNumber> {
        self.trains.keys()
    }

    pub fn len(&self) -> usize {
        self.trains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }
}

/// A two-leg alternative to a direct ticket, split at `intermediate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitQuote {
    pub intermediate: Station,
    pub fare_class: FareClass,
    /// Leg 1 price plus leg 2 price.
    pub combined_price: Price,
    /// The fewer of the two legs' free seats.
    pub min_seats: u32,
}

impl SplitQuote {
    /// Combine the quotes of both legs for one fare class.
    pub fn from_legs(
        intermediate: Station,
        fare_class: FareClass,
        first: &FareQuote,
        second: &FareQuote,
    ) -> Self {
        Self {
            intermediate,
            fare_class,
            combined_price: first.price + second.price,
            min_seats: first.free_seats.min(second.free_seats),
        }
    }

    /// How much cheaper this split is than `direct`, if at all.
    pub fn saving_over(&self, direct: &FareQuote) -> Option<Price> {
        direct
            .price
            .checked_sub(self.combined_price)
            .filter(|saving| *saving > Price::ZERO)
    }
}

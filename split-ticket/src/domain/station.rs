//! Station code and station types.

use std::fmt;

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code {input:?}: {reason}")]
pub struct InvalidStationCode {
    input: String,
    reason: &'static str,
}

/// A numeric station code assigned by the timetable service.
///
/// Codes are opaque to us; the only thing we rely on is that they are
/// non-empty strings of ASCII digits (e.g. `2000000` for Moscow).
///
/// # Examples
///
/// ```
/// use split_ticket::domain::StationCode;
///
/// let moscow = StationCode::parse("2000000").unwrap();
/// assert_eq!(moscow.value(), 2_000_000);
///
/// assert!(StationCode::parse("").is_err());
/// assert!(StationCode::parse("20A0").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode(u64);

impl StationCode {
    /// Parse a station code from its decimal representation.
    ///
    /// Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidStationCode {
                input: s.to_string(),
                reason: "must not be empty",
            });
        }

        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStationCode {
                input: s.to_string(),
                reason: "must contain only ASCII digits",
            });
        }

        trimmed
            .parse::<u64>()
            .map(StationCode)
            .map_err(|_| InvalidStationCode {
                input: s.to_string(),
                reason: "out of range",
            })
    }

    /// Create a code from a number already known to be valid.
    pub const fn from_u64(value: u64) -> Self {
        StationCode(value)
    }

    /// Returns the numeric value of the code.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.0)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resolved station: code plus the name the service uses for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Station {
    pub code: StationCode,
    pub name: String,
}

impl Station {
    pub fn new(code: StationCode, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
        }
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

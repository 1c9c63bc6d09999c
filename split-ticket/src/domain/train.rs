//! Train number type.

use std::fmt;

/// Error returned when parsing an invalid train number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid train number {input:?}: {reason}")]
pub struct InvalidTrainNumber {
    input: String,
    reason: &'static str,
}

/// A train number as printed on tickets and timetables (e.g. "016А").
///
/// Train numbers usually combine digits with a Cyrillic letter, so the
/// only structure we enforce is "non-empty, no whitespace". Comparison is
/// exact: the fare service keys its results by this string and we look
/// trains up by it verbatim.
///
/// # Examples
///
/// ```
/// use split_ticket::domain::TrainNumber;
///
/// let train = TrainNumber::parse(" 016А ").unwrap();
/// assert_eq!(train.as_str(), "016А");
///
/// assert!(TrainNumber::parse("").is_err());
/// assert!(TrainNumber::parse("016 А").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TrainNumber(String);

impl TrainNumber {
    /// Parse a train number, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidTrainNumber> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidTrainNumber {
                input: s.to_string(),
                reason: "must not be empty",
            });
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(InvalidTrainNumber {
                input: s.to_string(),
                reason: "must not contain whitespace",
            });
        }

        Ok(TrainNumber(trimmed.to_string()))
    }

    /// Returns the train number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrainNumber({})", self.0)
    }
}

impl fmt::Display for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

use std::{fmt, str::FromStr};

use time::{Duration, OffsetDateTime};

/// A whole number of days, written as `30` or `30d`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Days(u32);

impl Days {
    pub const fn new(days: u32) -> Self {
        Self(days)
    }

    /// The moment `self` days before `now`. `None` if that lies outside the supported date range.
    pub fn before(self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        now.checked_sub(Duration::days(i64::from(self.0)))
    }
}

impl fmt::Display for Days {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.0)
    }
}

impl FromStr for Days {
    type Err = ParseDaysError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let digits = input.strip_suffix('d').unwrap_or(input);

        if digits.is_empty() {
            return Err(ParseDaysError::Empty);
        }

        digits.bytes().try_fold(0u32, |days, byte| {
            let digit = match byte {
                b'0'..=b'9' => u32::from(byte - b'0'),
                _ => return Err(ParseDaysError::InvalidDigit),
            };
            days.checked_mul(10)
                .and_then(|days| days.checked_add(digit))
                .ok_or(ParseDaysError::PosOverflow)
        })
        .map(Days)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum ParseDaysError {
    /// Value being parsed is empty.
    Empty,

    /// Contains a character that is neither a digit nor the trailing `d`.
    InvalidDigit,

    /// Integer is too large to store in target integer type.
    PosOverflow,
}

impl std::error::Error for ParseDaysError {}

impl fmt::Display for ParseDaysError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseDaysError::Empty => "empty, expected a number of days such as `30` or `30d`",
            ParseDaysError::InvalidDigit => "invalid digit, expected a number of days such as `30` or `30d`",
            ParseDaysError::PosOverflow => "number of days is too large",
        })
    }
}

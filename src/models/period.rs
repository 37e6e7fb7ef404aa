//! Quincena (half-month) period model.
//!
//! This module contains the [`Period`] and [`Half`] types. A period is identified on
//! the wire as `YYYY/MM/Q1` or `YYYY/MM/Q2` and is totally ordered: Q1 precedes Q2 of
//! the same month, and Q2 of a month precedes Q1 of the next month.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::SettlementError;

/// The last calendar day that belongs to the first half of a month.
pub const FIRST_HALF_LAST_DAY: u32 = 15;

/// Which half of the month a period covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Half {
    /// Days 1 to 15.
    Q1,
    /// Day 16 to the end of the month.
    Q2,
}

impl Half {
    /// Returns the wire label (`"Q1"` or `"Q2"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Half::Q1 => "Q1",
            Half::Q2 => "Q2",
        }
    }
}

/// Years a period may carry.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// A settlement period: one half of a calendar month.
///
/// # Example
///
/// ```
/// use quincena_settlement::models::Period;
///
/// let period: Period = "2024/01/Q1".parse().unwrap();
/// assert_eq!(period.previous().to_string(), "2023/12/Q2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
    half: Half,
}

impl Period {
    /// Creates a period, validating the year and month.
    ///
    /// Years are limited to what the four-digit wire form can carry.
    pub fn new(year: i32, month: u32, half: Half) -> Result<Self, SettlementError> {
        if !YEAR_RANGE.contains(&year) {
            return Err(SettlementError::InvalidPeriod {
                value: format!("{}/{:02}/{}", year, month, half.as_str()),
                message: "year must be between 0001 and 9999".to_string(),
            });
        }
        if !(1..=12).contains(&month) {
            return Err(SettlementError::InvalidPeriod {
                value: format!("{}/{:02}/{}", year, month, half.as_str()),
                message: "month must be between 01 and 12".to_string(),
            });
        }
        Ok(Self { year, month, half })
    }

    /// Returns the period a delivery date falls into.
    pub fn containing(date: NaiveDate) -> Self {
        let half = if date.day() <= FIRST_HALF_LAST_DAY {
            Half::Q1
        } else {
            Half::Q2
        };
        Self {
            year: date.year(),
            month: date.month(),
            half,
        }
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The half of the month.
    pub fn half(&self) -> Half {
        self.half
    }

    /// Returns the immediately preceding period.
    ///
    /// Q2 steps back to Q1 of the same month; Q1 steps back to Q2 of the
    /// previous month, rolling the year over in January.
    ///
    /// # Example
    ///
    /// ```
    /// use quincena_settlement::models::Period;
    ///
    /// let q2: Period = "2024/03/Q2".parse().unwrap();
    /// assert_eq!(q2.previous().to_string(), "2024/03/Q1");
    ///
    /// let q1: Period = "2024/03/Q1".parse().unwrap();
    /// assert_eq!(q1.previous().to_string(), "2024/02/Q2");
    /// ```
    pub fn previous(&self) -> Self {
        match self.half {
            Half::Q2 => Self {
                half: Half::Q1,
                ..*self
            },
            Half::Q1 if self.month == 1 => Self {
                year: self.year - 1,
                month: 12,
                half: Half::Q2,
            },
            Half::Q1 => Self {
                year: self.year,
                month: self.month - 1,
                half: Half::Q2,
            },
        }
    }

    /// Checks whether a delivery date belongs to this period.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        Self::containing(date) == *self
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{}", self.year, self.month, self.half.as_str())
    }
}

impl FromStr for Period {
    type Err = SettlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| SettlementError::InvalidPeriod {
            value: s.to_string(),
            message: message.to_string(),
        };

        let parts: Vec<&str> = s.trim().split('/').collect();
        let [year, month, half] = parts.as_slice() else {
            return Err(invalid("expected YYYY/MM/Q1 or YYYY/MM/Q2"));
        };

        let year: i32 = year.parse().map_err(|_| invalid("year is not a number"))?;
        let month: u32 = month.parse().map_err(|_| invalid("month is not a number"))?;
        let half = match *half {
            "Q1" => Half::Q1,
            "Q2" => Half::Q2,
            _ => return Err(invalid("half must be Q1 or Q2")),
        };

        Period::new(year, month, half).map_err(|e| match e {
            SettlementError::InvalidPeriod { message, .. } => invalid(&message),
            other => other,
        })
    }
}

impl TryFrom<String> for Period {
    type Error = SettlementError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

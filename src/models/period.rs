//! Payroll period value type.
//!
//! A payroll run covers exactly one calendar month. [`PayrollPeriod`]
//! represents that month as a value type with total ordering and date
//! helpers, so period comparisons are arithmetic rather than string-based.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A single payroll month.
///
/// Ordering follows the calendar: periods compare by `year * 12 + month`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollPeriod;
///
/// let jan = PayrollPeriod::new(1, 2025).unwrap();
/// let feb = PayrollPeriod::new(2, 2025).unwrap();
/// assert!(jan < feb);
/// assert_eq!(jan.next(), feb);
/// assert_eq!(jan.to_string(), "January 2025");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayrollPeriod {
    /// Calendar month, 1 through 12.
    month: u32,
    /// Calendar year.
    year: i32,
}

impl PayrollPeriod {
    /// Creates a period from a month number (1-12) and year.
    pub fn new(month: u32, year: i32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidPeriod {
                message: format!("month must be between 1 and 12, got {}", month),
            });
        }
        Ok(Self { month, year })
    }

    /// Creates a period from an English month name (e.g. "January") and year.
    ///
    /// Matching is case-insensitive.
    pub fn from_month_name(name: &str, year: i32) -> EngineResult<Self> {
        let index = MONTH_NAMES
            .iter()
            .position(|m| m.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| EngineError::InvalidPeriod {
                message: format!("unknown month name '{}'", name),
            })?;
        Self::new(index as u32 + 1, year)
    }

    /// The month number, 1 through 12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The English name of the month.
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// Linear month index used for ordering and window arithmetic.
    pub fn index(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    /// The first calendar day of the period.
    pub fn first_day(&self) -> NaiveDate {
        // month is validated at construction, so the date always exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// The last calendar day of the period.
    pub fn last_day(&self) -> NaiveDate {
        let next = self.next();
        next.first_day().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    /// The period immediately after this one.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                month: 1,
                year: self.year + 1,
            }
        } else {
            Self {
                month: self.month + 1,
                year: self.year,
            }
        }
    }
}

impl PartialOrd for PayrollPeriod {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PayrollPeriod {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index().cmp(&other.index())
    }
}

impl fmt::Display for PayrollPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

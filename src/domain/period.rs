use crate::error::{ErrorCode, ReportError, Result};
use chrono::NaiveDate;
use std::fmt;

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// The calendar month a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportPeriod {
    year: i32,
    month: u32,
}

impl ReportPeriod {
    /// Validate year (1900-2100) and month (1-12)
    pub fn new(year: i32, month: i32) -> Result<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ReportError::validation_with_code(
                ErrorCode::VALIDATION_OUT_OF_RANGE,
                format!("Year must be between {} and {}", MIN_YEAR, MAX_YEAR),
                Some("year".to_string()),
            ));
        }
        if !(1..=12).contains(&month) {
            return Err(ReportError::validation_with_code(
                ErrorCode::VALIDATION_OUT_OF_RANGE,
                "Month must be between 1 and 12",
                Some("month".to_string()),
            ));
        }

        Ok(Self {
            year,
            month: month as u32,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Report header line, e.g. `January 2017`
    pub fn header(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|date| date.format("%B %Y").to_string())
            .unwrap_or_else(|| format!("{}-{:02}", self.year, self.month))
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.year, self.month)
    }
}

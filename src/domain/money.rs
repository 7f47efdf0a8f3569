//! Monetary amounts in integer cents
//!
//! Salaries arrive from the salary service as decimal text and are kept as
//! whole cents so department and company totals add up exactly.

use crate::error::{ErrorCode, ReportError, Result};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Currency symbol used for every monetary line of a report
pub const CURRENCY_SYMBOL: &str = "€";

/// An amount of money with two decimal places of precision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money {
    cents: i64,
}

impl Money {
    pub const ZERO: Money = Money { cents: 0 };

    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Whole currency units, e.g. `Money::from_units(2500)` is 2500.00
    pub const fn from_units(units: i64) -> Self {
        Self { cents: units * 100 }
    }

    pub fn cents(&self) -> i64 {
        self.cents
    }

    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Parse decimal text such as `"2500"`, `"2,500.5"` or `" -12.345 "`.
    ///
    /// The integer part may use `,` thousands separators in groups of three.
    /// Digits past the second decimal place are rounded half-to-even.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let invalid = || {
            ReportError::validation_with_code(
                ErrorCode::VALIDATION_INVALID_FORMAT,
                format!("'{}' is not a decimal amount", trimmed),
                Some("amount".to_string()),
            )
        };

        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        let whole = ungroup(whole).ok_or_else(invalid)?;
        let whole = whole.as_str();

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(invalid());
        }

        let mut cents: i64 = 0;
        for digit in whole.bytes() {
            cents = cents
                .checked_mul(10)
                .and_then(|c| c.checked_add(i64::from(digit - b'0')))
                .ok_or_else(invalid)?;
        }

        let fraction = fraction.as_bytes();
        let fraction_digit = |i: usize| fraction.get(i).map_or(0, |d| i64::from(d - b'0'));
        cents = cents
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction_digit(0) * 10 + fraction_digit(1)))
            .ok_or_else(invalid)?;

        if fraction.len() > 2 {
            let deciding = fraction_digit(2);
            let rest_nonzero = fraction[3..].iter().any(|d| *d != b'0');
            let round_up = match deciding {
                6..=9 => true,
                5 => rest_nonzero || cents % 2 == 1,
                _ => false,
            };
            if round_up {
                cents = cents.checked_add(1).ok_or_else(invalid)?;
            }
        }

        Ok(Self {
            cents: if negative { -cents } else { cents },
        })
    }
}

/// Drop `,` separators from an integer part, requiring groups of three
fn ungroup(whole: &str) -> Option<String> {
    let mut groups = whole.split(',');
    let first = groups.next().unwrap_or_default();
    if !whole.contains(',') {
        return Some(first.to_string());
    }
    if first.is_empty() || first.len() > 3 {
        return None;
    }

    let mut digits = first.to_string();
    for group in groups {
        if group.len() != 3 {
            return None;
        }
        digits.push_str(group);
    }
    Some(digits)
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

/// Formats as `€2,500.00`, with a leading `-` for negative amounts
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.cents.unsigned_abs();
        let units = (magnitude / 100).to_string();
        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, digit) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        let sign = if self.cents < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}{}.{:02}",
            sign,
            CURRENCY_SYMBOL,
            grouped,
            magnitude % 100
        )
    }
}

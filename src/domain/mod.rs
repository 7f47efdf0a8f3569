//! Payroll domain values: employees, money and report periods

pub mod employee;
pub mod money;
pub mod period;

pub use employee::Employee;
pub use money::{Money, CURRENCY_SYMBOL};
pub use period::{ReportPeriod, MAX_YEAR, MIN_YEAR};

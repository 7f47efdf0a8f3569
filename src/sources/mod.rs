//! Collaborators the report engine pulls data from
//!
//! The organization source lists departments and their employees; the two
//! enrichment fetchers resolve an employee code and a salary per employee.
//! Every implementation reports failure as a [`ReportError`]; organization
//! sources use the unavailable category for outages they expect to recover
//! from, which the engine absorbs per section.
//!
//! [`ReportError`]: crate::error::ReportError

use crate::domain::{Employee, Money};
use crate::error::Result;
use async_trait::async_trait;

pub mod demo;
pub mod http;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use demo::DemoOrganization;
pub use http::{HttpCodeFetcher, HttpSalaryFetcher, UnconfiguredFetcher};
#[cfg(feature = "postgres")]
pub use postgres::PostgresOrganizationSource;

/// Departments and employees of the organization
#[async_trait]
pub trait OrganizationSource: Send + Sync {
    /// Names of all active departments, in the order they should be reported
    async fn active_departments(&self) -> Result<Vec<String>>;

    /// Employees of one department with name, INN and department populated
    async fn employees_in(&self, department: &str) -> Result<Vec<Employee>>;
}

/// Resolves the HR employee code for an INN
#[async_trait]
pub trait EmployeeCodeFetcher: Send + Sync {
    async fn fetch_code(&self, inn: &str) -> Result<String>;
}

/// Computes an employee's salary; the employee code must already be assigned
#[async_trait]
pub trait SalaryFetcher: Send + Sync {
    async fn fetch_salary(&self, employee: &Employee) -> Result<Money>;
}

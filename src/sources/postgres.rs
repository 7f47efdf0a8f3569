//! PostgreSQL organization source
//!
//! Reads the `deps` (departments) and `emps` (employees) tables.

use super::OrganizationSource;
use crate::config::DatabaseSettings;
use crate::domain::Employee;
use crate::error::{ErrorCode, ReportError, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::time::Duration;
use tracing::{error, info};

const ACTIVE_DEPARTMENTS: &str = "SELECT d.name FROM deps d WHERE d.active = true";

const EMPLOYEES_BY_DEPARTMENT: &str = "SELECT e.name, e.inn, d.name \
     FROM emps e LEFT JOIN deps d ON e.departmentid = d.id \
     WHERE d.name = $1";

pub struct PostgresOrganizationSource {
    pool: PgPool,
}

impl PostgresOrganizationSource {
    /// Create a lazily connecting pool; connection failures surface per query
    pub fn connect_lazy(settings: &DatabaseSettings) -> Result<Self> {
        let connection_string = settings.connection_string.as_deref().ok_or_else(|| {
            ReportError::config_with_code(
                ErrorCode::CONFIG_MISSING_REQUIRED,
                "database.connection_string is required",
            )
        })?;

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.connect_timeout)
            .idle_timeout(Some(Duration::from_secs(600)))
            .connect_lazy(connection_string)
            .map_err(|e| {
                ReportError::config_with_code(
                    ErrorCode::CONFIG_INVALID_VALUE,
                    "Invalid database connection string",
                )
                .with_source(e)
            })?;

        info!("PostgreSQL organization source configured");
        Ok(Self { pool })
    }
}

#[async_trait]
impl OrganizationSource for PostgresOrganizationSource {
    async fn active_departments(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(ACTIVE_DEPARTMENTS)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to retrieve active departments: {}", e);
                ReportError::from(e).with_context("listing active departments")
            })?;

        let departments = rows
            .iter()
            .map(|row| row.try_get::<String, _>(0))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        info!("Retrieved {} active departments", departments.len());
        Ok(departments)
    }

    async fn employees_in(&self, department: &str) -> Result<Vec<Employee>> {
        let rows = sqlx::query(EMPLOYEES_BY_DEPARTMENT)
            .bind(department)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Failed to retrieve employees for department {}: {}",
                    department, e
                );
                ReportError::from(e).with_context(format!("listing employees of {}", department))
            })?;

        let mut employees = Vec::with_capacity(rows.len());
        for row in &rows {
            let name: String = row.try_get(0)?;
            let inn: String = row.try_get(1)?;
            let dept: String = row.try_get(2)?;
            employees.push(Employee::new(name, inn, dept)?);
        }

        info!(
            "Retrieved {} employees for department {}",
            employees.len(),
            department
        );
        Ok(employees)
    }
}

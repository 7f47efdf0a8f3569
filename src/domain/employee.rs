//! Employee snapshots
//!
//! An `Employee` is produced by the organization source with name, INN and
//! department set. Enrichment never mutates a record in place: assigning the
//! employee code and then the salary each consume the snapshot and return the
//! next one, so concurrent fetch tasks only ever see owned copies.

use super::money::Money;
use crate::error::{ErrorCode, ReportError, Result};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    id: Uuid,
    name: String,
    inn: String,
    department: String,
    code: String,
    salary: Money,
    active: bool,
}

fn required(field: &str, value: impl Into<String>) -> Result<String> {
    let value = value.into();
    if value.trim().is_empty() {
        return Err(ReportError::validation_with_code(
            ErrorCode::VALIDATION_REQUIRED_FIELD,
            format!("Employee {} must not be empty", field),
            Some(field.to_string()),
        ));
    }
    Ok(value)
}

impl Employee {
    pub fn new(
        name: impl Into<String>,
        inn: impl Into<String>,
        department: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: required("name", name)?,
            inn: required("inn", inn)?,
            department: required("department", department)?,
            code: String::new(),
            salary: Money::ZERO,
            active: true,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inn(&self) -> &str {
        &self.inn
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    /// Normalized employee code; empty until one has been assigned
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn has_code(&self) -> bool {
        !self.code.is_empty()
    }

    pub fn salary(&self) -> Money {
        self.salary
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Assign the employee code, trimmed and upper-cased
    pub fn with_code(self, code: &str) -> Self {
        Self {
            code: code.trim().to_uppercase(),
            ..self
        }
    }

    /// Assign the salary; negative amounts are rejected, never clamped
    pub fn with_salary(self, salary: Money) -> Result<Self> {
        if salary.is_negative() {
            return Err(ReportError::validation_with_code(
                ErrorCode::VALIDATION_NEGATIVE_AMOUNT,
                format!("Salary cannot be negative (got {} for {})", salary, self.name),
                Some("salary".to_string()),
            ));
        }
        Ok(Self { salary, ..self })
    }

    pub fn transfer_to(self, department: impl Into<String>) -> Result<Self> {
        Ok(Self {
            department: required("department", department)?,
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jacob() -> Employee {
        Employee::new("Jacob Smith", "345678901", "Finance Department").unwrap()
    }

    #[test]
    fn test_new_employee_defaults() {
        let employee = jacob();
        assert_eq!(employee.name(), "Jacob Smith");
        assert_eq!(employee.inn(), "345678901");
        assert_eq!(employee.department(), "Finance Department");
        assert_eq!(employee.code(), "");
        assert!(!employee.has_code());
        assert_eq!(employee.salary(), Money::ZERO);
        assert!(employee.is_active());
    }

    #[test]
    fn test_ids_are_unique_and_survive_enrichment() {
        let a = jacob();
        let b = jacob();
        assert_ne!(a.id(), b.id());

        let id = a.id();
        let enriched = a
            .with_code("js-01")
            .with_salary(Money::from_units(10))
            .unwrap();
        assert_eq!(enriched.id(), id);
    }

    #[test]
    fn test_new_rejects_empty_fields() {
        let err = Employee::new("", "1", "IT").unwrap_err();
        assert_eq!(err.code(), ErrorCode::VALIDATION_REQUIRED_FIELD);
        assert!(Employee::new("Ann", "  ", "IT").is_err());
        assert!(Employee::new("Ann", "1", "").is_err());
    }

    #[test]
    fn test_code_is_normalized() {
        let employee = jacob().with_code("  ab-12c \n");
        assert_eq!(employee.code(), "AB-12C");
        assert!(employee.has_code());

        let cleared = employee.with_code("   ");
        assert_eq!(cleared.code(), "");
    }

    #[test]
    fn test_negative_salary_is_rejected() {
        let err = jacob().with_salary(Money::from_cents(-1)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::VALIDATION_NEGATIVE_AMOUNT);
    }

    #[test]
    fn test_zero_salary_is_accepted() {
        let employee = jacob().with_salary(Money::ZERO).unwrap();
        assert!(employee.salary().is_zero());
    }

    #[test]
    fn test_transfer_requires_department() {
        let moved = jacob().transfer_to("IT").unwrap();
        assert_eq!(moved.department(), "IT");
        assert!(jacob().transfer_to(" ").is_err());
    }
}

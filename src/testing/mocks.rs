//! Scripted collaborator mocks for report generation tests

use super::ConcurrencyProbe;
use crate::domain::{Employee, Money};
use crate::error::{ErrorCode, ReportError, Result};
use crate::sources::{EmployeeCodeFetcher, OrganizationSource, SalaryFetcher};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a scripted call misbehaves
#[derive(Debug, Clone)]
enum Failure {
    Unavailable,
    Defect(String),
    Panic,
}

impl Failure {
    fn trigger(&self, what: &str) -> ReportError {
        match self {
            Failure::Unavailable => ReportError::unavailable(format!("{} unavailable", what)),
            Failure::Defect(message) => ReportError::internal(message.clone()),
            Failure::Panic => panic!("scripted panic in {}", what),
        }
    }
}

/// Organization source with a fixed roster and scripted failures
#[derive(Debug, Clone, Default)]
pub struct MockOrganizationSource {
    departments: Vec<(String, Vec<(String, String)>)>,
    departments_failure: Option<Failure>,
    employee_failures: HashMap<String, Failure>,
    employee_requests: Arc<Mutex<Vec<String>>>,
}

impl MockOrganizationSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a department with `(name, inn)` members
    pub fn with_department(mut self, name: &str, members: &[(&str, &str)]) -> Self {
        self.departments.push((
            name.to_string(),
            members
                .iter()
                .map(|(n, inn)| (n.to_string(), inn.to_string()))
                .collect(),
        ));
        self
    }

    /// List the department but fail to list its employees
    pub fn with_unavailable_department(mut self, name: &str) -> Self {
        self.departments.push((name.to_string(), Vec::new()));
        self.employee_failures
            .insert(name.to_string(), Failure::Unavailable);
        self
    }

    pub fn with_departments_unavailable(mut self) -> Self {
        self.departments_failure = Some(Failure::Unavailable);
        self
    }

    /// Fail department listing with an error outside the unavailable category
    pub fn with_departments_defect(mut self, message: &str) -> Self {
        self.departments_failure = Some(Failure::Defect(message.to_string()));
        self
    }

    pub fn with_departments_panic(mut self) -> Self {
        self.departments_failure = Some(Failure::Panic);
        self
    }

    pub fn with_employees_defect(mut self, department: &str, message: &str) -> Self {
        self.employee_failures
            .insert(department.to_string(), Failure::Defect(message.to_string()));
        self
    }

    /// Departments whose employees were requested, in request order
    pub fn employee_requests(&self) -> Vec<String> {
        self.employee_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrganizationSource for MockOrganizationSource {
    async fn active_departments(&self) -> Result<Vec<String>> {
        if let Some(failure) = &self.departments_failure {
            return Err(failure.trigger("departments"));
        }
        Ok(self.departments.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn employees_in(&self, department: &str) -> Result<Vec<Employee>> {
        self.employee_requests
            .lock()
            .unwrap()
            .push(department.to_string());

        if let Some(failure) = self.employee_failures.get(department) {
            return Err(failure.trigger(department));
        }

        self.departments
            .iter()
            .find(|(name, _)| name == department)
            .map(|(_, members)| members.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|(name, inn)| Employee::new(name.as_str(), inn.as_str(), department))
            .collect()
    }
}

/// Code fetcher returning `EMP-<inn>` unless scripted otherwise
#[derive(Debug, Clone, Default)]
pub struct MockCodeFetcher {
    codes: HashMap<String, String>,
    failing: HashSet<String>,
    latency: Duration,
    probe: ConcurrencyProbe,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockCodeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_code(mut self, inn: &str, code: &str) -> Self {
        self.codes.insert(inn.to_string(), code.to_string());
        self
    }

    pub fn failing_for(mut self, inn: &str) -> Self {
        self.failing.insert(inn.to_string());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn probe(&self) -> ConcurrencyProbe {
        self.probe.clone()
    }

    /// INNs looked up, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmployeeCodeFetcher for MockCodeFetcher {
    async fn fetch_code(&self, inn: &str) -> Result<String> {
        let _guard = self.probe.enter();
        self.calls.lock().unwrap().push(inn.to_string());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.failing.contains(inn) {
            return Err(ReportError::fetch_with_code(
                ErrorCode::FETCH_HTTP_STATUS,
                "HR service responded with status 503",
                Some(inn.to_string()),
            ));
        }
        Ok(self
            .codes
            .get(inn)
            .cloned()
            .unwrap_or_else(|| format!("EMP-{}", inn)))
    }
}

/// Salary fetcher returning 1000.00 unless scripted otherwise.
///
/// Like the real service it refuses employees without a code.
#[derive(Debug, Clone, Default)]
pub struct MockSalaryFetcher {
    salaries: HashMap<String, Money>,
    failing: HashSet<String>,
    panicking: HashSet<String>,
    latency: Duration,
    probe: ConcurrencyProbe,
    seen_codes: Arc<Mutex<Vec<(String, String)>>>,
    code_probe: Option<ConcurrencyProbe>,
    code_snapshots: Arc<Mutex<Vec<(usize, usize)>>>,
}

impl MockSalaryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_salary(mut self, inn: &str, salary: Money) -> Self {
        self.salaries.insert(inn.to_string(), salary);
        self
    }

    pub fn failing_for(mut self, inn: &str) -> Self {
        self.failing.insert(inn.to_string());
        self
    }

    pub fn panicking_for(mut self, inn: &str) -> Self {
        self.panicking.insert(inn.to_string());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn probe(&self) -> ConcurrencyProbe {
        self.probe.clone()
    }

    /// Snapshot `code_probe` at every salary lookup
    pub fn observing_codes(mut self, code_probe: ConcurrencyProbe) -> Self {
        self.code_probe = Some(code_probe);
        self
    }

    /// `(entered, in flight)` of the observed code probe, one per salary lookup
    pub fn code_snapshots(&self) -> Vec<(usize, usize)> {
        self.code_snapshots.lock().unwrap().clone()
    }

    /// `(inn, code)` pairs as seen at salary lookup time, in call order
    pub fn seen_codes(&self) -> Vec<(String, String)> {
        self.seen_codes.lock().unwrap().clone()
    }
}

#[async_trait]
impl SalaryFetcher for MockSalaryFetcher {
    async fn fetch_salary(&self, employee: &Employee) -> Result<Money> {
        let _guard = self.probe.enter();
        if let Some(codes) = &self.code_probe {
            self.code_snapshots
                .lock()
                .unwrap()
                .push((codes.entered(), codes.current()));
        }
        self.seen_codes
            .lock()
            .unwrap()
            .push((employee.inn().to_string(), employee.code().to_string()));
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.panicking.contains(employee.inn()) {
            Failure::Panic.trigger("salary lookup");
        }
        if !employee.has_code() {
            return Err(ReportError::validation("Employee code is not set"));
        }
        if self.failing.contains(employee.inn()) {
            return Err(ReportError::fetch_with_code(
                ErrorCode::FETCH_UNPARSEABLE,
                "Failed to parse salary",
                Some(employee.inn().to_string()),
            ));
        }
        Ok(self
            .salaries
            .get(employee.inn())
            .copied()
            .unwrap_or(Money::from_units(1000)))
    }
}

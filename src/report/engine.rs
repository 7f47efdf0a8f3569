//! Report generation
//!
//! Departments are processed one after another in the order the organization
//! source returns them. Within a department, employee codes are resolved
//! first and salaries second, each as a bounded fan-out with its own
//! concurrency ceiling. Failures are absorbed at the narrowest level that can
//! represent them:
//!
//! - a single lookup failure becomes a sentinel value (`ERROR` code, zero salary)
//! - a department whose employees cannot be listed or enriched gets an error
//!   notice and contributes nothing to the company total
//! - an unavailable department list yields a minimal report
//! - anything else, including a panic, yields the system error document
//!
//! `generate` therefore never fails; callers tell the outcomes apart by the
//! document content and [`ReportFile::is_error`]. Dropping the `generate`
//! future cancels every lookup still pending.

use super::fan_out::{fan_out, ConcurrencyCeiling};
use super::file::ReportFile;
use super::model::{DepartmentSection, EmployeeLine, ReportAccumulator};
use super::render::{render_departments_unavailable, render_report, render_system_error};
use crate::config::FanOutSettings;
use crate::domain::{Employee, Money, ReportPeriod};
use crate::error::{describe_error_code, ErrorCode, ReportError, Result};
use crate::sources::{EmployeeCodeFetcher, OrganizationSource, SalaryFetcher};
use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinError};
use tracing::{debug, error, info, warn};

/// Code assigned to an employee whose code lookup failed
pub const CODE_SENTINEL: &str = "ERROR";

/// Salary assigned to an employee whose salary lookup failed
pub const SALARY_SENTINEL: Money = Money::ZERO;

#[derive(Clone)]
pub struct ReportEngine {
    organization: Arc<dyn OrganizationSource>,
    codes: Arc<dyn EmployeeCodeFetcher>,
    salaries: Arc<dyn SalaryFetcher>,
    fan_out: FanOutSettings,
}

impl ReportEngine {
    pub fn new(
        organization: Arc<dyn OrganizationSource>,
        codes: Arc<dyn EmployeeCodeFetcher>,
        salaries: Arc<dyn SalaryFetcher>,
    ) -> Self {
        Self {
            organization,
            codes,
            salaries,
            fan_out: FanOutSettings::default(),
        }
    }

    pub fn with_fan_out(mut self, settings: FanOutSettings) -> Self {
        self.fan_out = settings;
        self
    }

    /// Generate the report for `period`, stamped with the current local time
    pub async fn generate(&self, period: ReportPeriod) -> ReportFile {
        self.generate_at(period, Local::now()).await
    }

    /// Generate the report for `period`, stamped with `at`
    pub async fn generate_at(&self, period: ReportPeriod, at: DateTime<Local>) -> ReportFile {
        info!("Generating report for {}", period);

        // Composition runs in its own task so a panic lands here as a JoinError
        let engine = self.clone();
        let handle = tokio::spawn(async move { engine.compose(period).await });
        let _abort = AbortOnDrop(handle.abort_handle());
        let outcome = handle.await;

        let failure = match outcome {
            Ok(Ok(content)) => {
                info!("Report generated successfully for {}", period);
                return ReportFile::new(period, at, content);
            }
            Ok(Err(e)) => e,
            Err(join_error) => ReportError::internal_with_code(
                ErrorCode::INTERNAL_TASK_PANICKED,
                format!("Report generation aborted: {}", describe_join_error(join_error)),
            ),
        };

        error!(
            code = failure.code(),
            kind = describe_error_code(failure.code()),
            "Failed to generate report for {}: {}",
            period,
            failure
        );
        let content = render_system_error(period, &failure, at);
        ReportFile::system_error(period, at, content)
    }

    async fn compose(&self, period: ReportPeriod) -> Result<String> {
        let departments = match self.organization.active_departments().await {
            Ok(departments) => departments,
            Err(e) if e.is_unavailable() => {
                warn!("Could not retrieve departments for {}: {}", period, e);
                return Ok(render_departments_unavailable(period));
            }
            Err(e) => return Err(e.with_context("while listing active departments")),
        };
        info!("Processing {} departments for {}", departments.len(), period);

        let code_ceiling = ConcurrencyCeiling::new(self.fan_out.code_concurrency)?;
        let salary_ceiling = ConcurrencyCeiling::new(self.fan_out.salary_concurrency)?;

        let mut report = ReportAccumulator::new(period);
        for department in departments {
            let section = self
                .process_department(department, &code_ceiling, &salary_ceiling)
                .await;
            report.record(section);
        }

        info!(
            successful = report.successful(),
            failed = report.failed(),
            "Company total for {}: {}",
            period,
            report.company_total()
        );
        Ok(render_report(&report))
    }

    async fn process_department(
        &self,
        department: String,
        code_ceiling: &ConcurrencyCeiling,
        salary_ceiling: &ConcurrencyCeiling,
    ) -> DepartmentSection {
        let employees = match self.organization.employees_in(&department).await {
            Ok(employees) => employees,
            Err(e) => {
                warn!("Could not retrieve employees for {}: {}", department, e);
                return DepartmentSection::employees_unavailable(department);
            }
        };
        debug!("{}: {} employees", department, employees.len());

        match self.enrich(employees, code_ceiling, salary_ceiling).await {
            Ok(lines) => DepartmentSection::completed(department, lines),
            Err(e) => {
                warn!("Failed to process department {}: {}", department, e);
                DepartmentSection::processing_failed(department)
            }
        }
    }

    /// Resolve codes, then salaries, returning one line per employee in order
    async fn enrich(
        &self,
        employees: Vec<Employee>,
        code_ceiling: &ConcurrencyCeiling,
        salary_ceiling: &ConcurrencyCeiling,
    ) -> Result<Vec<EmployeeLine>> {
        let inns = employees.iter().map(|e| e.inn().to_string()).collect();
        let fetcher = self.codes.clone();
        let codes = fan_out(
            "code",
            inns,
            code_ceiling,
            CODE_SENTINEL.to_string(),
            move |inn: String| {
                let fetcher = fetcher.clone();
                async move { fetcher.fetch_code(&inn).await }
            },
        )
        .await?;

        let coded: Vec<Employee> = employees
            .into_iter()
            .zip(codes)
            .map(|(employee, code)| employee.with_code(&code))
            .collect();

        let fetcher = self.salaries.clone();
        let salaries = fan_out(
            "salary",
            coded.clone(),
            salary_ceiling,
            SALARY_SENTINEL,
            move |employee: Employee| {
                let fetcher = fetcher.clone();
                async move { fetcher.fetch_salary(&employee).await }
            },
        )
        .await?;

        let paid = coded
            .into_iter()
            .zip(salaries)
            .map(|(employee, salary)| employee.with_salary(salary))
            .collect::<Result<Vec<_>>>()?;

        Ok(paid.iter().map(EmployeeLine::from).collect())
    }
}

/// Aborts the composing task when the caller stops waiting for it
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn describe_join_error(join_error: JoinError) -> String {
    if join_error.is_cancelled() {
        return "task was cancelled".to_string();
    }

    let payload = join_error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panic: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panic: {}", message)
    } else {
        "panic with non-string payload".to_string()
    }
}

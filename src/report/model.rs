use crate::domain::{Employee, Money, ReportPeriod};

/// One rendered employee row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeLine {
    pub name: String,
    pub salary: Money,
}

impl EmployeeLine {
    pub fn new(name: impl Into<String>, salary: Money) -> Self {
        Self {
            name: name.into(),
            salary,
        }
    }
}

impl From<&Employee> for EmployeeLine {
    fn from(employee: &Employee) -> Self {
        Self::new(employee.name(), employee.salary())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionOutcome {
    Completed { lines: Vec<EmployeeLine> },
    /// The organization source could not list the department's employees
    EmployeesUnavailable,
    /// Enrichment of the department's employees failed as a whole
    ProcessingFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentSection {
    pub name: String,
    pub outcome: SectionOutcome,
}

impl DepartmentSection {
    pub fn completed(name: impl Into<String>, lines: Vec<EmployeeLine>) -> Self {
        Self {
            name: name.into(),
            outcome: SectionOutcome::Completed { lines },
        }
    }

    pub fn employees_unavailable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: SectionOutcome::EmployeesUnavailable,
        }
    }

    pub fn processing_failed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: SectionOutcome::ProcessingFailed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SectionOutcome::Completed { .. })
    }

    /// Sum of salaries; failed sections contribute nothing
    pub fn total(&self) -> Money {
        match &self.outcome {
            SectionOutcome::Completed { lines } => lines.iter().map(|l| l.salary).sum(),
            _ => Money::ZERO,
        }
    }
}

/// Aggregated state of one report generation.
///
/// Owned by a single invocation; sections are kept in the order they were
/// recorded and the company total only grows by successful department totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportAccumulator {
    period: ReportPeriod,
    sections: Vec<DepartmentSection>,
    company_total: Money,
    successful: usize,
    failed: usize,
}

impl ReportAccumulator {
    pub fn new(period: ReportPeriod) -> Self {
        Self {
            period,
            sections: Vec::new(),
            company_total: Money::ZERO,
            successful: 0,
            failed: 0,
        }
    }

    pub fn record(&mut self, section: DepartmentSection) {
        if section.is_success() {
            self.company_total += section.total();
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        self.sections.push(section);
    }

    pub fn period(&self) -> ReportPeriod {
        self.period
    }

    pub fn sections(&self) -> &[DepartmentSection] {
        &self.sections
    }

    pub fn company_total(&self) -> Money {
        self.company_total
    }

    pub fn successful(&self) -> usize {
        self.successful
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn attempted(&self) -> usize {
        self.successful + self.failed
    }
}

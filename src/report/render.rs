//! Text rendering of payroll reports
//!
//! All functions here are pure: the same input always yields the same text.

use super::model::{DepartmentSection, ReportAccumulator, SectionOutcome};
use crate::domain::{Money, ReportPeriod};
use crate::error::ReportError;
use chrono::{DateTime, Local, SecondsFormat};

/// Shown in place of a zero salary, whether real or a failed lookup
pub const NOT_AVAILABLE: &str = "N/A";

pub const EMPLOYEES_UNAVAILABLE_NOTICE: &str =
    "*Error: could not retrieve employees for this department*";
pub const PROCESSING_FAILED_NOTICE: &str = "*Error: failed to process this department*";
pub const DEPARTMENTS_UNAVAILABLE_NOTICE: &str = "*Error: could not retrieve departments*";
pub const PARTIAL_TOTAL_NOTE: &str =
    "*Note: Company total reflects only successfully processed departments.*";
pub const SYSTEM_ERROR_BANNER: &str = "=== SYSTEM ERROR ===";

const TROUBLESHOOTING: &[&str] = &[
    "1. Check connectivity to the organization database",
    "2. Check that the HR and salary services are reachable",
    "3. Review the service logs around the timestamp above",
    "4. Retry the request; contact support if the problem persists",
];

struct Document {
    text: String,
}

impl Document {
    fn new(period: ReportPeriod) -> Self {
        let mut doc = Self {
            text: String::new(),
        };
        doc.line(period.header());
        doc.blank();
        doc
    }

    fn line(&mut self, line: impl AsRef<str>) {
        self.text.push_str(line.as_ref());
        self.text.push('\n');
    }

    fn blank(&mut self) {
        self.text.push('\n');
    }

    fn company_total(&mut self, total: Money) {
        self.line(format!("### Company Total: **{}**", total));
    }

    fn finish(self) -> String {
        self.text
    }
}

fn salary_cell(salary: Money) -> String {
    if salary.is_zero() {
        NOT_AVAILABLE.to_string()
    } else {
        salary.to_string()
    }
}

fn render_section(doc: &mut Document, section: &DepartmentSection) {
    doc.line(format!("### {}", section.name));
    doc.blank();

    match &section.outcome {
        SectionOutcome::Completed { lines } => {
            for line in lines {
                doc.line(format!("| {} | {} |", line.name, salary_cell(line.salary)));
            }
            doc.blank();
            doc.line(format!("**Department Total: {}**", section.total()));
        }
        SectionOutcome::EmployeesUnavailable => doc.line(EMPLOYEES_UNAVAILABLE_NOTICE),
        SectionOutcome::ProcessingFailed => doc.line(PROCESSING_FAILED_NOTICE),
    }

    doc.blank();
}

/// Render the full report: sections, company total and, when any department
/// was attempted, the processing summary
pub fn render_report(report: &ReportAccumulator) -> String {
    let mut doc = Document::new(report.period());

    for section in report.sections() {
        render_section(&mut doc, section);
    }

    doc.company_total(report.company_total());

    if report.attempted() > 0 {
        doc.blank();
        doc.line("---");
        doc.line(format!(
            "Departments processed: {} successful, {} failed, {} total",
            report.successful(),
            report.failed(),
            report.attempted()
        ));
        if report.failed() > 0 {
            doc.line(PARTIAL_TOTAL_NOTE);
        }
    }

    doc.finish()
}

/// Minimal report for when the department list itself is unavailable
pub fn render_departments_unavailable(period: ReportPeriod) -> String {
    let mut doc = Document::new(period);
    doc.line(DEPARTMENTS_UNAVAILABLE_NOTICE);
    doc.blank();
    doc.company_total(Money::ZERO);
    doc.finish()
}

/// Last-resort document describing an error that escaped report generation
pub fn render_system_error(
    period: ReportPeriod,
    error: &ReportError,
    at: DateTime<Local>,
) -> String {
    let mut doc = Document::new(period);
    doc.line(SYSTEM_ERROR_BANNER);
    doc.blank();
    doc.line("The report could not be generated because of an unexpected error.");
    doc.line(format!("Error type: {}", error.category()));
    doc.line(format!("Message: {}", error.message()));
    doc.line(format!(
        "Timestamp: {}",
        at.to_rfc3339_opts(SecondsFormat::Secs, false)
    ));
    doc.blank();
    doc.line("Troubleshooting:");
    for step in TROUBLESHOOTING {
        doc.line(step);
    }
    doc.blank();
    doc.company_total(Money::ZERO);
    doc.finish()
}

//! Payroll report generation: bounded enrichment, aggregation and rendering

pub mod engine;
pub mod fan_out;
pub mod file;
pub mod model;
pub mod render;

pub use engine::{ReportEngine, CODE_SENTINEL, SALARY_SENTINEL};
pub use fan_out::{fan_out, ConcurrencyCeiling};
pub use file::{report_file_name, ReportFile};
pub use model::{DepartmentSection, EmployeeLine, ReportAccumulator, SectionOutcome};
pub use render::{
    render_departments_unavailable, render_report, render_system_error, NOT_AVAILABLE,
};

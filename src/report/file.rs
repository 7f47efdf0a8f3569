use crate::domain::ReportPeriod;
use chrono::{DateTime, Local};

pub const CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Suffix marking a file produced by the system error path
pub const ERROR_SUFFIX: &str = "_ERROR";

/// `report_<year>_<month>_<yyyyMMdd_HHmmss>[_ERROR].txt`
pub fn report_file_name(period: ReportPeriod, at: DateTime<Local>, is_error: bool) -> String {
    format!(
        "report_{}_{}_{}{}.txt",
        period.year(),
        period.month(),
        at.format("%Y%m%d_%H%M%S"),
        if is_error { ERROR_SUFFIX } else { "" }
    )
}

/// A generated report, ready to be downloaded or written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub file_name: String,
    pub content: String,
    pub is_error: bool,
}

impl ReportFile {
    pub fn new(period: ReportPeriod, at: DateTime<Local>, content: String) -> Self {
        Self {
            file_name: report_file_name(period, at, false),
            content,
            is_error: false,
        }
    }

    pub fn system_error(period: ReportPeriod, at: DateTime<Local>, content: String) -> Self {
        Self {
            file_name: report_file_name(period, at, true),
            content,
            is_error: true,
        }
    }

    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.content.into_bytes()
    }
}

//! Construction of the report engine from configuration

use crate::config::ServiceConfig;
use crate::error::Result;
use crate::report::ReportEngine;
use crate::sources::{
    DemoOrganization, EmployeeCodeFetcher, HttpCodeFetcher, HttpSalaryFetcher,
    OrganizationSource, SalaryFetcher, UnconfiguredFetcher,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Wire the organization source and both fetchers described by `config`
pub fn build_engine(config: &ServiceConfig) -> Result<ReportEngine> {
    let organization = build_organization_source(config)?;

    let timeout = config.services.request_timeout;
    let codes: Arc<dyn EmployeeCodeFetcher> = match &config.services.hr_base_url {
        Some(url) => Arc::new(HttpCodeFetcher::new(url.clone(), timeout)?),
        None => {
            warn!("HR service base URL not configured; employee codes will be unavailable");
            Arc::new(UnconfiguredFetcher::new("HR service"))
        }
    };
    let salaries: Arc<dyn SalaryFetcher> = match &config.services.salary_base_url {
        Some(url) => Arc::new(HttpSalaryFetcher::new(url.clone(), timeout)?),
        None => {
            warn!("Salary service base URL not configured; salaries will render as N/A");
            Arc::new(UnconfiguredFetcher::new("Salary service"))
        }
    };

    Ok(ReportEngine::new(organization, codes, salaries).with_fan_out(config.fan_out))
}

fn build_organization_source(config: &ServiceConfig) -> Result<Arc<dyn OrganizationSource>> {
    if config.use_mock_data {
        info!("Using built-in demo organization data");
        return Ok(Arc::new(DemoOrganization::new()));
    }
    database_source(config)
}

#[cfg(feature = "postgres")]
fn database_source(config: &ServiceConfig) -> Result<Arc<dyn OrganizationSource>> {
    let source = crate::sources::PostgresOrganizationSource::connect_lazy(&config.database)?;
    Ok(Arc::new(source))
}

#[cfg(not(feature = "postgres"))]
fn database_source(_config: &ServiceConfig) -> Result<Arc<dyn OrganizationSource>> {
    use crate::error::{ErrorCode, ReportError};

    Err(ReportError::config_with_code(
        ErrorCode::CONFIG_INVALID_VALUE,
        "Built without the `postgres` feature; enable use_mock_data or rebuild with --features postgres",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReportPeriod;

    #[tokio::test]
    async fn test_mock_data_without_services_renders_not_available() {
        let config = ServiceConfig {
            use_mock_data: true,
            ..Default::default()
        };
        let engine = build_engine(&config).unwrap();

        let file = engine.generate(ReportPeriod::new(2017, 1).unwrap()).await;
        assert!(!file.is_error);
        assert!(file.content.contains("### Finance Department"));
        assert!(file.content.contains("| Jacob Smith | N/A |"));
        assert!(file.content.contains("### Company Total: **€0.00**"));
    }

    #[cfg(not(feature = "postgres"))]
    #[test]
    fn test_database_mode_requires_feature() {
        let err = build_engine(&ServiceConfig::default()).err().unwrap();
        assert!(err.message().contains("postgres"));
    }
}

//! HTTP clients for the HR and salary services
//!
//! Both services are addressed as `<base_url><inn>` and answer with a plain
//! text body: the employee code, or the salary as a decimal number.

use super::{EmployeeCodeFetcher, SalaryFetcher};
use crate::domain::{Employee, Money};
use crate::error::{ErrorCode, ReportError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder().timeout(timeout).build().map_err(|e| {
        ReportError::config_with_code(ErrorCode::CONFIG_INVALID_VALUE, "Failed to build HTTP client")
            .with_source(e)
    })
}

async fn get_text(client: &Client, url: &str) -> Result<String> {
    debug!("GET {}", url);
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

fn missing(field: &str, message: impl Into<String>) -> ReportError {
    ReportError::validation_with_code(
        ErrorCode::VALIDATION_REQUIRED_FIELD,
        message,
        Some(field.to_string()),
    )
}

/// Employee code lookup against the HR service
#[derive(Debug, Clone)]
pub struct HttpCodeFetcher {
    client: Client,
    base_url: String,
}

impl HttpCodeFetcher {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self::with_client(build_client(timeout)?, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl EmployeeCodeFetcher for HttpCodeFetcher {
    async fn fetch_code(&self, inn: &str) -> Result<String> {
        if inn.trim().is_empty() {
            return Err(missing("inn", "INN is empty"));
        }

        let url = format!("{}{}", self.base_url, inn);
        let code = get_text(&self.client, &url).await?.trim().to_string();
        info!("Employee code retrieved for INN {}", inn);
        Ok(code)
    }
}

/// Salary computation against the salary service
#[derive(Debug, Clone)]
pub struct HttpSalaryFetcher {
    client: Client,
    base_url: String,
}

impl HttpSalaryFetcher {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self::with_client(build_client(timeout)?, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SalaryFetcher for HttpSalaryFetcher {
    async fn fetch_salary(&self, employee: &Employee) -> Result<Money> {
        if !employee.has_code() {
            return Err(missing(
                "code",
                format!("Employee {} has no employee code", employee.name()),
            ));
        }

        let url = format!("{}{}", self.base_url, employee.inn());
        let body = get_text(&self.client, &url).await?;
        let salary = Money::parse(&body).map_err(|e| {
            ReportError::fetch_with_code(
                ErrorCode::FETCH_UNPARSEABLE,
                format!("Failed to parse salary for {}", employee.name()),
                Some(url.clone()),
            )
            .with_source(e)
        })?;

        info!("Salary of {}: {}", employee.name(), salary);
        Ok(salary)
    }
}

/// Stand-in for a service whose base URL is not configured.
///
/// Every lookup fails, so the report renders sentinels for that service.
#[derive(Debug, Clone)]
pub struct UnconfiguredFetcher {
    service: &'static str,
}

impl UnconfiguredFetcher {
    pub fn new(service: &'static str) -> Self {
        Self { service }
    }

    fn error(&self) -> ReportError {
        ReportError::config_with_code(
            ErrorCode::CONFIG_MISSING_REQUIRED,
            format!("{} base URL is not configured", self.service),
        )
    }
}

#[async_trait]
impl EmployeeCodeFetcher for UnconfiguredFetcher {
    async fn fetch_code(&self, _inn: &str) -> Result<String> {
        Err(self.error())
    }
}

#[async_trait]
impl SalaryFetcher for UnconfiguredFetcher {
    async fn fetch_salary(&self, _employee: &Employee) -> Result<Money> {
        Err(self.error())
    }
}

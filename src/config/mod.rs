//! Service configuration
//!
//! Configuration is layered with increasing precedence:
//!
//! 1. Hardcoded defaults
//! 2. TOML config file (`--config <path>`, or `payroll-report.toml` when present)
//! 3. Environment variables (`PAYROLL_*` prefix)

use crate::error::{ErrorCode, ReportError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

pub mod loader;

pub use loader::{load_config, DEFAULT_CONFIG_FILE};

/// Valid log levels for configuration validation.
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Logging level; the `-v` flag is used when unset.
    #[serde(default)]
    pub log_level: Option<String>,

    /// Serve the built-in demo organization instead of querying the database.
    #[serde(default)]
    pub use_mock_data: bool,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub services: ExternalServices,

    #[serde(default)]
    pub fan_out: FanOutSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub connection_string: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(with = "humantime_serde", default = "default_connect_timeout")]
    pub connect_timeout: Duration,
}

/// Base URLs of the HR (employee code) and salary services.
///
/// The employee INN is appended verbatim to each base URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalServices {
    #[serde(default)]
    pub hr_base_url: Option<String>,

    #[serde(default)]
    pub salary_base_url: Option<String>,

    #[serde(with = "humantime_serde", default = "default_request_timeout")]
    pub request_timeout: Duration,
}

/// Concurrency ceilings for the two per-department enrichment batches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanOutSettings {
    #[serde(default = "default_concurrency")]
    pub code_concurrency: usize,

    #[serde(default = "default_concurrency")]
    pub salary_concurrency: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_concurrency() -> usize {
    5
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            connection_string: None,
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl Default for ExternalServices {
    fn default() -> Self {
        Self {
            hr_base_url: None,
            salary_base_url: None,
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for FanOutSettings {
    fn default() -> Self {
        Self {
            code_concurrency: default_concurrency(),
            salary_concurrency: default_concurrency(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            use_mock_data: false,
            server: ServerSettings::default(),
            database: DatabaseSettings::default(),
            services: ExternalServices::default(),
            fan_out: FanOutSettings::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `PAYROLL_*` overrides from the process environment
    pub fn merge_env_vars(&mut self) {
        self.merge_env_with(|key| std::env::var(key).ok());
    }

    /// Apply `PAYROLL_*` overrides using the given lookup
    pub fn merge_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("PAYROLL_LOG_LEVEL") {
            self.log_level = Some(level);
        }

        if let Some(flag) = lookup("PAYROLL_USE_MOCK_DATA") {
            if let Ok(value) = flag.trim().to_lowercase().parse::<bool>() {
                self.use_mock_data = value;
            }
        }

        if let Some(addr) = lookup("PAYROLL_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(url) = lookup("PAYROLL_DATABASE_URL") {
            self.database.connection_string = Some(url);
        }

        if let Some(url) = lookup("PAYROLL_HR_BASE_URL") {
            self.services.hr_base_url = Some(url);
        }

        if let Some(url) = lookup("PAYROLL_SALARY_BASE_URL") {
            self.services.salary_base_url = Some(url);
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind_addr.parse().map_err(|e| {
            ReportError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                format!("Invalid bind address '{}'", self.server.bind_addr),
            )
            .with_source(e)
        })
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(level) = &self.log_level {
            if !VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
                return Err(ReportError::config_with_code(
                    ErrorCode::CONFIG_INVALID_VALUE,
                    format!(
                        "Invalid log level '{}'; expected one of: {}",
                        level,
                        VALID_LOG_LEVELS.join(", ")
                    ),
                ));
            }
        }

        if self.fan_out.code_concurrency == 0 || self.fan_out.salary_concurrency == 0 {
            return Err(ReportError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                "Fan-out concurrency must be at least 1",
            ));
        }

        self.bind_addr()?;

        if !self.use_mock_data {
            let missing = [
                ("database.connection_string", &self.database.connection_string),
                ("services.hr_base_url", &self.services.hr_base_url),
                ("services.salary_base_url", &self.services.salary_base_url),
            ]
            .into_iter()
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(name, _)| name)
            .collect::<Vec<_>>();

            if !missing.is_empty() {
                return Err(ReportError::config_with_code(
                    ErrorCode::CONFIG_MISSING_REQUIRED,
                    format!(
                        "Missing required settings: {} (or enable use_mock_data)",
                        missing.join(", ")
                    ),
                ));
            }
        }

        Ok(())
    }
}

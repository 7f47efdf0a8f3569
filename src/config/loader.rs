use super::ServiceConfig;
use crate::error::{ErrorCode, ReportError, Result};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "payroll-report.toml";

/// Load configuration from file and environment.
///
/// An explicit path must exist. Without one, `payroll-report.toml` in the
/// working directory is used if present, otherwise defaults apply.
pub async fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    let mut config = match path {
        Some(path) => {
            if !fs::try_exists(path).await.unwrap_or(false) {
                return Err(ReportError::config_with_code(
                    ErrorCode::CONFIG_NOT_FOUND,
                    format!("Configuration file not found: {}", path.display()),
                ));
            }
            read_config_file(path).await?
        }
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if fs::try_exists(default_path).await.unwrap_or(false) {
                read_config_file(default_path).await?
            } else {
                debug!("No config file found, using defaults");
                ServiceConfig::default()
            }
        }
    };

    config.merge_env_vars();
    config.validate()?;
    Ok(config)
}

async fn read_config_file(path: &Path) -> Result<ServiceConfig> {
    debug!("Loading configuration from {}", path.display());
    let content = fs::read_to_string(path).await?;
    ServiceConfig::from_toml_str(&content)
        .map_err(|e| e.with_context(format!("in {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_explicit_missing_file_is_error() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml")))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reads_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "use_mock_data = true\n[fan_out]\ncode_concurrency = 3\nsalary_concurrency = 4"
        )
        .unwrap();

        let config = load_config(Some(file.path())).await.unwrap();
        assert!(config.use_mock_data);
        assert_eq!(config.fan_out.code_concurrency, 3);
        assert_eq!(config.fan_out.salary_concurrency, 4);
    }

    #[tokio::test]
    async fn test_invalid_file_names_path_in_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[fan_out\n").unwrap();

        let err = load_config(Some(file.path())).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_TOML);
        assert!(err
            .message()
            .contains(&file.path().display().to_string()));
    }
}

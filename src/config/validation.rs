use super::Config;
use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - Endpoint cannot be empty and must be an http:// or https:// URL
/// - HTTP timeout must be at least one second
/// - User agent cannot be empty
/// - If a cookie file or log file path is provided, it cannot be empty
/// - Log file path parent directory must exist or be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    let endpoint = config.endpoint.trim();
    if endpoint.is_empty() {
        return Err(AppError::config_error("Endpoint cannot be empty"));
    }

    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(AppError::config_error(format!(
            "Endpoint '{endpoint}' must start with http:// or https://"
        )));
    }

    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error(
            "HTTP timeout must be at least one second",
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(AppError::config_error("User agent cannot be empty"));
    }

    if let Some(cookie_file) = &config.cookie_file
        && cookie_file.trim().is_empty()
    {
        return Err(AppError::config_error("Cookie file path cannot be empty"));
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        // Check if parent directory exists or can be created
        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

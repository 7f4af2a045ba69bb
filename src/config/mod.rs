use crate::constants::{
    DEFAULT_ENDPOINT, DEFAULT_HTTP_TIMEOUT_SECONDS, DEFAULT_USER_AGENT, LOG_FILE_NAME, env_vars,
};
use crate::dna_api::cookies::{CookieFile, CookieHeader, CookieSource};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Site the browser session belongs to, including the scheme.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Netscape cookies.txt exported from a logged-in browser.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_file: Option<String>,
    /// Raw `Cookie` header copied from browser developer tools. Takes precedence over `cookie_file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_header: Option<String>,
    /// Browser user agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// HTTP timeout in seconds for API requests. Defaults to 30 seconds if not specified.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: default_endpoint(),
            cookie_file: None,
            cookie_header: None,
            user_agent: default_user_agent(),
            http_timeout_seconds: default_http_timeout(),
            log_file_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// Environment variables can override config file values.
    ///
    /// # Environment Variables
    /// - `ANCESTRY_DNA_ENDPOINT` - Override the site endpoint
    /// - `ANCESTRY_DNA_COOKIE_FILE` - Override the cookies.txt path
    /// - `ANCESTRY_DNA_COOKIES` - Raw cookie header, wins over any cookie file
    /// - `ANCESTRY_DNA_USER_AGENT` - Override the browser user agent
    /// - `ANCESTRY_DNA_HTTP_TIMEOUT` - Override HTTP timeout in seconds (default: 30)
    /// - `ANCESTRY_DNA_LOG_FILE` - Override log file path
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(AppError)` - Error occurred during load or validation
    ///
    /// # Notes
    /// - A missing config file is not an error, defaults are used instead
    /// - Environment variables take precedence over config file
    pub async fn load() -> Result<Self, AppError> {
        Self::load_with_overrides(&get_config_path()).await
    }

    /// Loads configuration from `path` if it exists, applies environment
    /// overrides and validates the result.
    pub async fn load_with_overrides(path: &str) -> Result<Self, AppError> {
        let mut config = if Path::new(path).exists() {
            Self::load_from_path(path).await?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var(env_vars::ENDPOINT) {
            self.endpoint = endpoint;
        }

        if let Ok(cookie_file) = std::env::var(env_vars::COOKIE_FILE) {
            self.cookie_file = Some(cookie_file);
        }

        if let Ok(cookies) = std::env::var(env_vars::COOKIES) {
            self.cookie_header = Some(cookies);
        }

        if let Ok(user_agent) = std::env::var(env_vars::USER_AGENT) {
            self.user_agent = user_agent;
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }
    }

    /// Validates the configuration settings
    ///
    /// # Returns
    /// * `Ok(())` - Configuration is valid
    /// * `Err(AppError)` - Configuration validation failed
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Picks the cookie source for the browser session.
    /// A raw cookie header wins over a cookie file.
    ///
    /// # Errors
    /// * `AppError::CookieAccess` - Neither a cookie header nor a cookie file is configured
    pub fn cookie_source(&self) -> Result<Box<dyn CookieSource>, AppError> {
        if let Some(header) = &self.cookie_header {
            return Ok(Box::new(CookieHeader::new(header.clone())));
        }

        if let Some(path) = &self.cookie_file {
            return Ok(Box::new(CookieFile::new(path)));
        }

        Err(AppError::cookie_access(
            "configuration",
            format!(
                "no cookie source configured, set cookie_file or cookie_header in {} or export {}",
                get_config_path(),
                env_vars::COOKIE_FILE
            ),
        ))
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    ///
    /// # Notes
    /// - Shows config file location and current settings
    /// - The cookie header is never printed, only whether one is set
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        if !Path::new(&config_path).exists() {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
            println!("(Defaults and environment variables are in use)");
        }

        let config = Config::load().await?;
        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        println!("{config_path}");
        println!("────────────────────────────────────");
        println!("Endpoint:");
        println!("{}", config.endpoint);
        println!("────────────────────────────────────");
        println!("Cookies:");
        match (&config.cookie_header, &config.cookie_file) {
            (Some(_), _) => println!("Cookie header (hidden)"),
            (None, Some(path)) => println!("{path}"),
            (None, None) => println!("(Not configured)"),
        }
        println!("────────────────────────────────────");
        println!("User Agent:");
        println!("{}", config.user_agent);
        println!("────────────────────────────────────");
        println!("HTTP Timeout:");
        println!("{} seconds", config.http_timeout_seconds);
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/{LOG_FILE_NAME}");
            println!("(Default location)");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist and strips trailing
    /// slashes from the endpoint so URLs can be joined with `/`.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }

        let content = toml::to_string_pretty(&Config {
            endpoint: self.endpoint.trim_end_matches('/').to_string(),
            ..self.clone()
        })?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path without environment overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

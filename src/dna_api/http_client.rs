//! HTTP client creation and configuration utilities

use reqwest::Client;
use reqwest::cookie::Jar;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::AppError;

/// Creates the HTTP client for a browser session.
///
/// # Features
/// * Cookie jar holding the cookies taken from the browser
/// * `Content-Type: application/json` and the configured browser user agent on every request
/// * Configurable timeout (default: 30 seconds, configurable via config/env)
/// * Connection pooling with centralized pool size configuration
pub fn create_http_client(config: &Config, cookies: Arc<Jar>) -> Result<Client, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|e| {
        AppError::config_error(format!("User agent is not a valid header value: {e}"))
    })?;
    headers.insert(USER_AGENT, user_agent);

    Client::builder()
        .default_headers(headers)
        .cookie_provider(cookies)
        .timeout(Duration::from_secs(config.http_timeout_seconds))
        .pool_max_idle_per_host(crate::constants::HTTP_POOL_MAX_IDLE_PER_HOST)
        .build()
        .map_err(AppError::ApiFetch)
}

//! HTTP transport used by the session.
//!
//! The [`Transport`] trait is the seam where tests swap the network for a
//! scripted fake. [`ReqwestTransport`] is the real implementation: one
//! request per call, no retries.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use tracing::{debug, error};

use crate::error::AppError;

/// HTTP verbs used by the match service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Sends one request and returns the parsed JSON body.
pub trait Transport {
    fn request(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Option<&Value>,
        query: &[(String, String)],
    ) -> impl Future<Output = Result<Value, AppError>> + Send;
}

/// Transport backed by a reqwest client that already holds the session cookies
/// and default headers.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Option<&Value>,
        query: &[(String, String)],
    ) -> Result<Value, AppError> {
        let mut builder = self.client.request(method.into(), url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = payload {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!("Request failed for URL {}: {}", url, e);
            if e.is_timeout() {
                AppError::network_timeout(url)
            } else if e.is_connect() {
                AppError::network_connection(url, e.to_string())
            } else {
                AppError::ApiFetch(e)
            }
        })?;

        let status = response.status();
        debug!("Response status: {status}");

        if !status.is_success() {
            error!(
                "HTTP {} - {} (URL: {})",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error"),
                url
            );
            return Err(status_error(status, url));
        }

        let response_text = response.text().await?;
        debug!("Response length: {} bytes", response_text.len());

        parse_body(&response_text, url)
    }
}

/// Maps a non-success status code to the matching error.
pub fn status_error(status: StatusCode, url: &str) -> AppError {
    let status_code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Unknown error");

    match status_code {
        401 | 403 => AppError::api_unauthorized(status_code, url),
        404 => AppError::api_not_found(url),
        429 => AppError::api_rate_limit(reason, url),
        502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
        400..=499 => AppError::api_client_error(status_code, reason, url),
        _ => AppError::api_server_error(status_code, reason, url),
    }
}

/// Parses a successful response body. Some write endpoints answer with an
/// empty body, which comes back as `Value::Null`.
pub fn parse_body(text: &str, url: &str) -> Result<Value, AppError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(text).map_err(|e| {
        let preview: String = text.chars().take(200).collect();
        error!("Failed to parse API response: {} (URL: {})", e, url);
        debug!("Response text (first 200 chars): {preview}");
        AppError::api_malformed_json(e.to_string(), url)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_error_mapping() {
        let url = "https://www.ancestry.com/dna/secure/tests";
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, url),
            AppError::ApiUnauthorized { status: 401, .. }
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, url),
            AppError::ApiUnauthorized { status: 403, .. }
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, url),
            AppError::ApiNotFound { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, url),
            AppError::ApiRateLimit { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, url),
            AppError::ApiClientError { status: 400, .. }
        ));
        assert!(matches!(
            status_error(StatusCode::SERVICE_UNAVAILABLE, url),
            AppError::ApiServiceUnavailable { status: 503, .. }
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, url),
            AppError::ApiServerError { status: 500, .. }
        ));
    }

    #[test]
    fn test_parse_body() {
        let url = "https://www.ancestry.com/x";
        assert_eq!(parse_body("", url).unwrap(), Value::Null);
        assert_eq!(parse_body("  \n", url).unwrap(), Value::Null);
        assert_eq!(parse_body(r#"{"a": 1}"#, url).unwrap(), json!({"a": 1}));
        assert!(matches!(
            parse_body("<html>login</html>", url),
            Err(AppError::ApiMalformedJson { .. })
        ));
    }

    #[test]
    fn test_http_method_conversion() {
        assert_eq!(reqwest::Method::from(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(reqwest::Method::from(HttpMethod::Post), reqwest::Method::POST);
        assert_eq!(
            reqwest::Method::from(HttpMethod::Delete),
            reqwest::Method::DELETE
        );
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to fetch data from API: {0}")]
    ApiFetch(#[from] reqwest::Error),

    #[error("Failed to parse API response: {0}")]
    ApiParse(#[from] serde_json::Error),

    // Browser session reuse
    #[error("Could not read browser cookies from {source_name}: {message}")]
    CookieAccess {
        source_name: String,
        message: String,
    },

    // Specific HTTP status code errors
    #[error("API rejected the browser session ({status}): log in again and re-export cookies (URL: {url})")]
    ApiUnauthorized { status: u16, url: String },

    #[error("API request not found (404): {url}")]
    ApiNotFound { url: String },

    #[error("API server error ({status}): {message} (URL: {url})")]
    ApiServerError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API client error ({status}): {message} (URL: {url})")]
    ApiClientError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API rate limit exceeded (429): {message} (URL: {url})")]
    ApiRateLimit { message: String, url: String },

    #[error("API service unavailable ({status}): {message} (URL: {url})")]
    ApiServiceUnavailable {
        status: u16,
        message: String,
        url: String,
    },

    // Network-specific errors
    #[error("Network timeout while fetching data from: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    // Data parsing errors
    #[error("API returned malformed JSON: {message} (URL: {url})")]
    ApiMalformedJson { message: String, url: String },

    #[error("API returned unexpected data structure: {message} (URL: {url})")]
    ApiUnexpectedStructure { message: String, url: String },

    // Request validation, raised before anything is sent
    #[error("sort type '{value}' not accepted, must be 'DATE' or 'RELATIONSHIP'")]
    InvalidSortType { value: String },

    #[error("filters {} not accepted", .filters.join(", "))]
    InvalidFilters { filters: Vec<String> },

    #[error("filters {} cannot be combined, pick one", .filters.join(", "))]
    ConflictingFilters { filters: Vec<String> },

    #[error("group action '{action}' not accepted, must be 'add' or 'remove'")]
    InvalidGroupAction { action: String },

    #[error("No test selected: call use_test with a test id first")]
    NoCurrentTest,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create a cookie access error for the named cookie source
    pub fn cookie_access(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CookieAccess {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create an unauthorized error (401/403 status codes)
    pub fn api_unauthorized(status: u16, url: impl Into<String>) -> Self {
        Self::ApiUnauthorized {
            status,
            url: url.into(),
        }
    }

    /// Create an API not found error
    pub fn api_not_found(url: impl Into<String>) -> Self {
        Self::ApiNotFound { url: url.into() }
    }

    /// Create an API server error (5xx status codes)
    pub fn api_server_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServerError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API client error (4xx status codes not covered elsewhere)
    pub fn api_client_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiClientError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API rate limit error
    pub fn api_rate_limit(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiRateLimit {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API service unavailable error
    pub fn api_service_unavailable(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServiceUnavailable {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a network timeout error
    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    /// Create a network connection error
    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a malformed JSON error
    pub fn api_malformed_json(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiMalformedJson {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an unexpected data structure error
    pub fn api_unexpected_structure(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiUnexpectedStructure {
            message: message.into(),
            url: url.into(),
        }
    }

    pub fn invalid_sort_type(value: impl Into<String>) -> Self {
        Self::InvalidSortType {
            value: value.into(),
        }
    }

    pub fn invalid_filters(filters: Vec<String>) -> Self {
        Self::InvalidFilters { filters }
    }

    pub fn conflicting_filters(filters: Vec<String>) -> Self {
        Self::ConflictingFilters { filters }
    }

    pub fn invalid_group_action(action: impl Into<String>) -> Self {
        Self::InvalidGroupAction {
            action: action.into(),
        }
    }

    /// Check if the error was raised while validating a request, before any network call
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidSortType { .. }
                | AppError::InvalidFilters { .. }
                | AppError::ConflictingFilters { .. }
                | AppError::InvalidGroupAction { .. }
                | AppError::NoCurrentTest
        )
    }

    /// Check if error means the browser session has to be refreshed
    pub fn is_session_error(&self) -> bool {
        matches!(
            self,
            AppError::CookieAccess { .. } | AppError::ApiUnauthorized { .. }
        )
    }
}

//! Application-wide constants
//!
//! Endpoint paths, provider quirks and default settings live here so the
//! request-building code reads as plain parameter mapping.

/// Default site the browser session belongs to
pub const DEFAULT_ENDPOINT: &str = "https://www.ancestry.com";

/// Path of the match service below the site endpoint
pub const MATCHES_SERVICE_PATH: &str = "/discoveryui-matchesservice/api";

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of idle connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Browser user agent sent with every request.
/// If match listing starts failing, replace this with the value from a current browser.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// Test category returned by default when listing test kits
pub const DEFAULT_TEST_CATEGORY: &str = "completeTests";

/// Match list paging
pub mod paging {
    /// The service returns up to 200 matches per call, 50 per page, so page
    /// requests after the first must land on a multiple of this stride.
    pub const PAGE_STRIDE: u32 = 5;

    /// Page requested first
    pub const FIRST_PAGE: u32 = 1;
}

/// Number of generations requested for tree comparisons
pub const TREE_GENERATIONS: u32 = 10;

/// Match list filter names accepted by the service
pub mod filters {
    /// Filters that can be combined freely
    pub const INCLUSIVE: &[&str] = &[
        "commonancestors",
        "messaged",
        "newmatches",
        "notviewed",
        "notes",
        "searchlocation",
        "searchname",
        "searchsurname",
        "searchsimilarsurname",
        "starredmatches",
    ];

    pub const MIN_SHARED_DNA: &str = "minshareddna";
    pub const MAX_SHARED_DNA: &str = "maxshareddna";

    /// Groups where at most one filter may be selected. The shared DNA range
    /// bounds are the one pair allowed together.
    pub const EXCLUSIVE_GROUPS: &[&[&str]] = &[
        &["publictrees", "privatetrees", "unlinkedtrees"],
        &["closematches", "distantmatches", MIN_SHARED_DNA, MAX_SHARED_DNA],
        &["maternalid", "paternalid"],
    ];
}

/// Environment variables that override config file values
pub mod env_vars {
    pub const ENDPOINT: &str = "ANCESTRY_DNA_ENDPOINT";
    pub const COOKIE_FILE: &str = "ANCESTRY_DNA_COOKIE_FILE";
    pub const COOKIES: &str = "ANCESTRY_DNA_COOKIES";
    pub const USER_AGENT: &str = "ANCESTRY_DNA_USER_AGENT";
    pub const HTTP_TIMEOUT: &str = "ANCESTRY_DNA_HTTP_TIMEOUT";
    pub const LOG_FILE: &str = "ANCESTRY_DNA_LOG_FILE";
}

/// Default log file name inside the log directory
pub const LOG_FILE_NAME: &str = "ancestry_dna.log";

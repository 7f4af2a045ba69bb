use reqwest::Url;
use reqwest::cookie::Jar;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::cookies::{BrowserCookie, CookieSource};
use super::http_client::create_http_client;
use super::transport::{HttpMethod, ReqwestTransport, Transport};
use crate::config::Config;
use crate::error::AppError;

/// Authenticated connection to the site: endpoint plus a transport carrying
/// the browser cookies and fixed headers.
#[derive(Debug)]
pub struct Session<T: Transport = ReqwestTransport> {
    endpoint: String,
    transport: T,
}

impl Session<ReqwestTransport> {
    /// Builds a session from the cookies of a logged-in browser.
    ///
    /// Only cookies belonging to the endpoint's host are kept. There is no
    /// other way to log in, so failing to obtain cookies is reported as
    /// `AppError::CookieAccess` and callers should stop.
    pub fn authenticate(config: &Config, source: &dyn CookieSource) -> Result<Self, AppError> {
        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        let url = Url::parse(&endpoint).map_err(|e| {
            AppError::config_error(format!("Endpoint '{endpoint}' is not a valid URL: {e}"))
        })?;
        let host = url
            .host_str()
            .ok_or_else(|| AppError::config_error(format!("Endpoint '{endpoint}' has no host")))?;

        let cookies = source.load_cookies()?;
        let total = cookies.len();
        let (jar, kept) = cookie_jar(&cookies, &url, host);

        if kept == 0 {
            return Err(AppError::cookie_access(
                source.describe(),
                format!("none of the {total} cookies belong to {host}, log in to {endpoint} in the browser first"),
            ));
        }
        if kept < total {
            warn!(
                "Ignored {} cookies that do not belong to {}",
                total - kept,
                host
            );
        }
        info!("Using {} cookies for {} from {}", kept, host, source.describe());

        let client = create_http_client(config, Arc::new(jar))?;
        Ok(Self::with_transport(endpoint, ReqwestTransport::new(client)))
    }
}

/// Puts every cookie the browser would send to `host` into a jar, keeping
/// domain and host-only cookies of the same name apart. Returns the jar and
/// the number of cookies kept.
fn cookie_jar(cookies: &[BrowserCookie], url: &Url, host: &str) -> (Jar, usize) {
    let jar = Jar::default();
    let mut kept = 0;
    for cookie in cookies.iter().filter(|c| c.matches_host(host)) {
        jar.add_cookie_str(&cookie.to_cookie().to_string(), url);
        kept += 1;
    }
    (jar, kept)
}

impl<T: Transport> Session<T> {
    pub fn with_transport(endpoint: impl Into<String>, transport: T) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Site endpoint without a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issues a single request and returns the parsed JSON response.
    #[instrument(skip(self, payload, query))]
    pub async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Option<&Value>,
        query: &[(String, String)],
    ) -> Result<Value, AppError> {
        debug!("{} {} ({} query parameters)", method, url, query.len());
        self.transport.request(method, url, payload, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dna_api::cookies::{CookieHeader, parse_netscape_cookies};
    use crate::testing_utils::MockTransport;
    use reqwest::cookie::CookieStore;
    use serde_json::json;

    struct FixedCookies(Vec<BrowserCookie>);

    impl CookieSource for FixedCookies {
        fn describe(&self) -> String {
            "fixed".to_string()
        }

        fn load_cookies(&self) -> Result<Vec<BrowserCookie>, AppError> {
            Ok(self.0.clone())
        }
    }

    struct LockedCookies;

    impl CookieSource for LockedCookies {
        fn describe(&self) -> String {
            "locked browser".to_string()
        }

        fn load_cookies(&self) -> Result<Vec<BrowserCookie>, AppError> {
            Err(AppError::cookie_access(self.describe(), "permission denied"))
        }
    }

    #[test]
    fn test_authenticate_with_cookie_header() {
        let session =
            Session::authenticate(&Config::default(), &CookieHeader::new("ANCSESSIONID=abc"));
        assert!(session.is_ok());
        assert_eq!(session.unwrap().endpoint(), "https://www.ancestry.com");
    }

    #[test]
    fn test_authenticate_propagates_cookie_failure() {
        let err = Session::authenticate(&Config::default(), &LockedCookies).unwrap_err();
        assert!(matches!(err, AppError::CookieAccess { .. }));
        assert!(err.to_string().contains("locked browser"));
    }

    #[test]
    fn test_authenticate_rejects_cookies_for_other_sites() {
        let source = FixedCookies(vec![
            BrowserCookie::new("session", "1").with_domain(".example.org"),
        ]);
        let err = Session::authenticate(&Config::default(), &source).unwrap_err();
        assert!(matches!(err, AppError::CookieAccess { .. }));
    }

    #[test]
    fn test_jar_keeps_same_name_cookies_from_parent_and_host() {
        let cookies = parse_netscape_cookies(
            ".ancestry.com\tTRUE\t/\tTRUE\t0\tSID\tparent\n\
             www.ancestry.com\tFALSE\t/\tTRUE\t0\tSID\tchild\n\
             dna.ancestry.com\tFALSE\t/\tTRUE\t0\tOTHER\tskipped\n",
            0,
        );
        let url = Url::parse("https://www.ancestry.com").unwrap();

        let (jar, kept) = cookie_jar(&cookies, &url, "www.ancestry.com");
        assert_eq!(kept, 2);

        let header = jar.cookies(&url).unwrap();
        let header = header.to_str().unwrap();
        assert!(header.contains("SID=parent"));
        assert!(header.contains("SID=child"));
        assert!(!header.contains("OTHER"));

        let plain = Url::parse("http://www.ancestry.com").unwrap();
        assert!(jar.cookies(&plain).is_none());
    }

    #[test]
    fn test_jar_shares_domain_cookies_with_subdomains() {
        let cookies = vec![
            BrowserCookie::new("ATT", "1").with_domain(".ancestry.com"),
            BrowserCookie::new("HOST", "2").with_domain("www.ancestry.com"),
        ];
        let url = Url::parse("https://www.ancestry.com").unwrap();
        let (jar, _) = cookie_jar(&cookies, &url, "www.ancestry.com");

        let sibling = Url::parse("https://dna.ancestry.com").unwrap();
        let header = jar.cookies(&sibling).unwrap();
        assert_eq!(header.to_str().unwrap(), "ATT=1");
    }

    #[test]
    fn test_authenticate_rejects_invalid_endpoint() {
        let config = Config {
            endpoint: "https://".to_string(),
            ..Config::default()
        };
        let result = Session::authenticate(&config, &CookieHeader::new("a=1"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_request_goes_through_transport() {
        let transport = MockTransport::with_responses(vec![json!({"ok": true})]);
        let session = Session::with_transport("https://www.ancestry.com/", transport);
        assert_eq!(session.endpoint(), "https://www.ancestry.com");

        let payload = json!({"starred": true});
        let query = vec![("page".to_string(), "1".to_string())];
        let result = session
            .request(HttpMethod::Post, "https://www.ancestry.com/x", Some(&payload), &query)
            .await
            .unwrap();
        assert_eq!(result, json!({"ok": true}));

        let requests = session.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].payload, Some(payload));
        assert_eq!(requests[0].query_value("page"), Some("1"));
    }
}

//! Cookie sources for reusing an existing browser login.
//!
//! The service has no usable login API, so the session borrows the cookies of
//! a browser that is already signed in. They can come from a Netscape
//! `cookies.txt` export or from a raw `Cookie` header copied out of the
//! browser's developer tools.

use cookie::Cookie;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::error::AppError;

const LOCKED_FILE_HINT: &str = "the browser may still hold a lock on it. Close the browser, or log in with a browser you do not otherwise use, and export the cookies again";

/// A single cookie taken from the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserCookie {
    pub name: String,
    pub value: String,
    /// Cookie domain, `None` when the cookie applies to whatever host the session talks to.
    pub domain: Option<String>,
    /// Also sent to subdomains of `domain`. Otherwise the cookie is host-only.
    pub include_subdomains: bool,
    pub path: String,
    pub secure: bool,
}

impl BrowserCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            include_subdomains: false,
            path: "/".to_string(),
            secure: false,
        }
    }

    /// Sets the domain. A leading dot makes it a domain cookie, as browsers write them.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        let domain = domain.into();
        self.include_subdomains = domain.starts_with('.');
        self.domain = Some(domain);
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// True if the cookie would be sent to `host`.
    pub fn matches_host(&self, host: &str) -> bool {
        let Some(domain) = &self.domain else {
            return true;
        };
        let domain = domain.trim_start_matches('.').to_ascii_lowercase();
        let host = host.to_ascii_lowercase();
        if host == domain {
            return true;
        }
        self.include_subdomains && host.ends_with(&format!(".{domain}"))
    }

    /// Builds the cookie for the session's jar. Domain cookies carry their
    /// `Domain` attribute; host-only cookies stay bound to the request host.
    pub fn to_cookie(&self) -> Cookie<'static> {
        let mut builder = Cookie::build((self.name.clone(), self.value.clone()))
            .path(self.path.clone())
            .secure(self.secure);
        if let Some(domain) = self.domain.as_ref().filter(|_| self.include_subdomains) {
            builder = builder.domain(domain.trim_start_matches('.').to_string());
        }
        builder.build()
    }
}

/// Something that can hand over the cookies of a logged-in browser session.
pub trait CookieSource {
    /// Human readable name used in diagnostics.
    fn describe(&self) -> String;

    /// Loads the cookies. This may block on file I/O; sessions are built once
    /// at startup, before any request is in flight.
    fn load_cookies(&self) -> Result<Vec<BrowserCookie>, AppError>;
}

/// Cookies exported to a Netscape `cookies.txt` file.
#[derive(Debug, Clone)]
pub struct CookieFile {
    path: PathBuf,
}

impl CookieFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CookieSource for CookieFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load_cookies(&self) -> Result<Vec<BrowserCookie>, AppError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            let message = match e.kind() {
                ErrorKind::PermissionDenied => format!("{e}, {LOCKED_FILE_HINT}"),
                ErrorKind::NotFound => {
                    format!("{e}, export the cookies of a logged-in browser to this file")
                }
                _ => e.to_string(),
            };
            AppError::cookie_access(self.describe(), message)
        })?;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let cookies = parse_netscape_cookies(&content, now);
        if cookies.is_empty() {
            return Err(AppError::cookie_access(
                self.describe(),
                "file contains no unexpired cookies",
            ));
        }

        debug!("Read {} cookies from {}", cookies.len(), self.describe());
        Ok(cookies)
    }
}

/// Cookies given as a raw `Cookie` header, e.g. `name=value; other=value`.
#[derive(Debug, Clone)]
pub struct CookieHeader {
    header: String,
}

impl CookieHeader {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }
}

impl CookieSource for CookieHeader {
    fn describe(&self) -> String {
        "cookie header".to_string()
    }

    fn load_cookies(&self) -> Result<Vec<BrowserCookie>, AppError> {
        let header = self.header.trim();
        let header = header.strip_prefix("Cookie:").unwrap_or(header);

        let cookies: Vec<BrowserCookie> = Cookie::split_parse(header)
            .filter_map(|parsed| match parsed {
                Ok(cookie) => Some(BrowserCookie::new(cookie.name(), cookie.value())),
                Err(e) => {
                    debug!("Skipping cookie pair: {e}");
                    None
                }
            })
            .collect();

        if cookies.is_empty() {
            return Err(AppError::cookie_access(
                self.describe(),
                "no name=value pairs found",
            ));
        }
        Ok(cookies)
    }
}

/// Parses a Netscape `cookies.txt` file, skipping cookies that expired before `now`.
///
/// Each line holds seven tab separated fields: domain, include-subdomains flag,
/// path, secure flag, expiry (unix seconds, 0 for session cookies), name and value.
pub fn parse_netscape_cookies(content: &str, now: u64) -> Vec<BrowserCookie> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.strip_prefix("#HttpOnly_").unwrap_or(line);
            if line.trim().is_empty() || line.starts_with('#') {
                return None;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 7 {
                debug!("Skipping malformed cookie line with {} fields", fields.len());
                return None;
            }

            let expires = fields[4].trim().parse::<u64>().unwrap_or(0);
            if expires != 0 && expires < now {
                debug!("Skipping expired cookie {}", fields[5]);
                return None;
            }

            Some(BrowserCookie {
                name: fields[5].to_string(),
                value: fields[6].trim_end_matches('\r').to_string(),
                domain: Some(fields[0].to_string()),
                include_subdomains: fields[1].eq_ignore_ascii_case("TRUE"),
                path: fields[2].to_string(),
                secure: fields[3].eq_ignore_ascii_case("TRUE"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const COOKIES_TXT: &str = "# Netscape HTTP Cookie File\n\
        # This is a generated file! Do not edit.\n\
        \n\
        .ancestry.com\tTRUE\t/\tTRUE\t0\tANCSESSIONID\tabc123\n\
        #HttpOnly_.ancestry.com\tTRUE\t/\tTRUE\t4102444800\tSecureATT\txyz\n\
        www.ancestry.com\tFALSE\t/dna\tFALSE\t1000\tOLD\tgone\n\
        .example.org\tTRUE\t/\tFALSE\t0\tOTHER\tvalue\n\
        broken line without tabs\n";

    #[test]
    fn test_parse_netscape_cookies() {
        let cookies = parse_netscape_cookies(COOKIES_TXT, 2_000_000_000);

        assert_eq!(cookies.len(), 3);
        assert_eq!(cookies[0].name, "ANCSESSIONID");
        assert_eq!(cookies[0].value, "abc123");
        assert_eq!(cookies[0].domain.as_deref(), Some(".ancestry.com"));
        assert!(cookies[0].include_subdomains);
        assert!(cookies[0].secure);
        assert_eq!(cookies[1].name, "SecureATT");
        assert_eq!(cookies[2].name, "OTHER");
    }

    #[test]
    fn test_matches_host() {
        let cookie = BrowserCookie::new("a", "1").with_domain(".ancestry.com");
        assert!(cookie.matches_host("www.ancestry.com"));
        assert!(cookie.matches_host("ancestry.com"));
        assert!(!cookie.matches_host("notancestry.com"));
        assert!(!cookie.matches_host("example.org"));

        assert!(BrowserCookie::new("a", "1").matches_host("127.0.0.1"));

        let host_only = BrowserCookie::new("a", "1").with_domain("www.ancestry.com");
        assert!(host_only.matches_host("www.ancestry.com"));
        assert!(!host_only.matches_host("dna.www.ancestry.com"));
    }

    #[test]
    fn test_jar_cookie_attributes() {
        let domain_cookie = BrowserCookie::new("SID", "parent")
            .with_domain(".ancestry.com")
            .with_secure(true)
            .to_cookie();
        assert_eq!(domain_cookie.name_value(), ("SID", "parent"));
        assert_eq!(domain_cookie.domain(), Some("ancestry.com"));
        assert_eq!(domain_cookie.path(), Some("/"));
        assert_eq!(domain_cookie.secure(), Some(true));

        let host_only = BrowserCookie::new("SID", "child")
            .with_domain("www.ancestry.com")
            .to_cookie();
        assert_eq!(host_only.domain(), None);
        assert_eq!(host_only.secure(), Some(false));
    }

    #[test]
    fn test_cookie_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(COOKIES_TXT.as_bytes()).unwrap();

        let source = CookieFile::new(file.path());
        let cookies = source.load_cookies().unwrap();
        assert!(cookies.iter().any(|c| c.name == "ANCSESSIONID"));
        assert!(cookies.iter().all(|c| c.name != "OLD"));
    }

    #[test]
    fn test_missing_cookie_file_is_cookie_access_error() {
        let source = CookieFile::new("/nonexistent/cookies.txt");
        let err = source.load_cookies().unwrap_err();
        assert!(matches!(err, AppError::CookieAccess { .. }));
        assert!(err.to_string().contains("/nonexistent/cookies.txt"));
    }

    #[test]
    fn test_cookie_file_without_cookies() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"# Netscape HTTP Cookie File\n").unwrap();

        let err = CookieFile::new(file.path()).load_cookies().unwrap_err();
        assert!(matches!(err, AppError::CookieAccess { .. }));
    }

    #[test]
    fn test_cookie_header() {
        let cookies = CookieHeader::new("Cookie: ANCSESSIONID=abc; SecureATT=x=y ; =skip")
            .load_cookies()
            .unwrap();

        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0], BrowserCookie::new("ANCSESSIONID", "abc"));
        assert_eq!(cookies[1].value, "x=y");

        assert!(CookieHeader::new("   ").load_cookies().is_err());
    }
}

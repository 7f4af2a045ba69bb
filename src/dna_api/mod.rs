//! Client for the DNA match service.
//!
//! Requests go through a [`Session`] that carries the browser cookies and
//! fixed headers. [`DnaClient`] maps each operation onto the service URLs
//! and walks the paged match list.

pub mod client;
pub mod cookies;
pub mod filters;
pub mod http_client;
pub mod matches;
pub mod models;
pub mod session;
pub mod transport;
pub mod urls;

pub use client::DnaClient;
pub use cookies::{BrowserCookie, CookieFile, CookieHeader, CookieSource};
pub use filters::{FilterSet, SortType, validate_filters};
pub use matches::{MatchListQuery, next_page};
pub use models::{BookmarkData, GroupAction, MatchGroup, MatchGroups, MatchListResponse};
pub use session::Session;
pub use transport::{HttpMethod, ReqwestTransport, Transport};

//! Paged match list retrieval.
//!
//! The first request asks for page 1. While the service reports more matches,
//! the next request asks for the next multiple of five after the previous page
//! and echoes a bookmark naming that previous page. Each call returns up to
//! 200 matches, 50 per page, which is why pages advance in steps of five.

use serde_json::Value;
use tracing::{debug, info};

use super::filters::{FilterSet, SortType};
use super::models::{BookmarkData, MatchGroups, MatchListResponse};
use super::session::Session;
use super::transport::{HttpMethod, Transport};
use crate::constants::paging::{FIRST_PAGE, PAGE_STRIDE};
use crate::error::AppError;

/// Page to request after `previous`: the next multiple of five strictly greater than it.
/// `None` once that page no longer fits in a `u32`.
///
/// # Example
/// ```
/// use ancestry_dna::dna_api::next_page;
///
/// assert_eq!(next_page(1), Some(5));
/// assert_eq!(next_page(5), Some(10));
/// assert_eq!(next_page(7), Some(10));
/// assert_eq!(next_page(u32::MAX), None);
/// ```
pub fn next_page(previous: u32) -> Option<u32> {
    previous.checked_add(PAGE_STRIDE - previous % PAGE_STRIDE)
}

/// Query state of one match list walk. Built fresh for every call.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchListQuery {
    filters: FilterSet,
    sort: SortType,
    relation_guid: Option<String>,
    page: u32,
    bookmark: Option<BookmarkData>,
}

impl MatchListQuery {
    pub fn new(filters: &FilterSet, sort: SortType, relation_guid: Option<&str>) -> Self {
        Self {
            filters: filters.clone(),
            sort,
            relation_guid: relation_guid.map(str::to_string),
            page: FIRST_PAGE,
            bookmark: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn bookmark(&self) -> Option<&BookmarkData> {
        self.bookmark.as_ref()
    }

    /// Moves to the next page and records the bookmark the service expects.
    /// Returns the new page, or `None` without changing anything when the
    /// page index would overflow.
    pub fn advance(&mut self) -> Option<u32> {
        let previous = self.page;
        self.page = next_page(previous)?;
        self.bookmark = Some(BookmarkData {
            more_matches_available: true,
            last_matches_service_page_idx: previous,
        });
        Some(self.page)
    }

    /// Query parameters for the current page.
    pub fn to_pairs(&self) -> Result<Vec<(String, String)>, AppError> {
        let mut pairs: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("sortby".to_string(), self.sort.as_str().to_string()));

        if let Some(guid) = &self.relation_guid {
            pairs.push(("relationguid".to_string(), guid.clone()));
        }

        if let Some(bookmark) = &self.bookmark {
            pairs.push(("bookmarkData".to_string(), serde_json::to_string(bookmark)?));
        }

        Ok(pairs)
    }
}

/// Requests pages until the service reports no more matches and merges them.
///
/// There is no page limit besides the service's own flag.
pub async fn fetch_all_matches<T: Transport>(
    session: &Session<T>,
    url: &str,
    mut query: MatchListQuery,
) -> Result<MatchGroups, AppError> {
    let mut groups = MatchGroups::new();
    let mut pages = 0u32;

    loop {
        let response = fetch_match_page(session, url, &query).await?;
        pages += 1;
        debug!(
            "Match page {} returned {} matches",
            query.page(),
            response.match_count()
        );

        let more = response.bookmark_data.more_matches_available;
        groups.append_groups(response.match_groups);
        if !more {
            break;
        }
        query.advance().ok_or_else(|| {
            AppError::api_unexpected_structure(
                format!("more matches reported after page {}", query.page()),
                url,
            )
        })?;
    }

    info!(
        "Fetched {} matches in {} groups over {} requests",
        groups.total_matches(),
        groups.len(),
        pages
    );
    Ok(groups)
}

async fn fetch_match_page<T: Transport>(
    session: &Session<T>,
    url: &str,
    query: &MatchListQuery,
) -> Result<MatchListResponse, AppError> {
    let value: Value = session
        .request(HttpMethod::Get, url, None, &query.to_pairs()?)
        .await?;

    serde_json::from_value(value).map_err(|e| AppError::api_unexpected_structure(e.to_string(), url))
}

//! Test doubles for exercising the client without a network.

use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::dna_api::client::DnaClient;
use crate::dna_api::session::Session;
use crate::dna_api::transport::{HttpMethod, Transport};
use crate::error::AppError;

/// A request as seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub payload: Option<Value>,
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Value of the first query parameter called `name`
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Transport that records every request and answers from a script.
/// Requests beyond the script fail with a not-found error.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Value, AppError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: impl IntoIterator<Item = Value>) -> Self {
        let transport = Self::new();
        for response in responses {
            transport.push_response(response);
        }
        transport
    }

    pub fn push_response(&self, response: Value) {
        self.responses
            .lock()
            .expect("mock transport lock poisoned")
            .push_back(Ok(response));
    }

    pub fn push_error(&self, error: AppError) {
        self.responses
            .lock()
            .expect("mock transport lock poisoned")
            .push_back(Err(error));
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("mock transport lock poisoned")
            .clone()
    }
}

impl Transport for MockTransport {
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Option<&Value>,
        query: &[(String, String)],
    ) -> Result<Value, AppError> {
        self.requests
            .lock()
            .expect("mock transport lock poisoned")
            .push(RecordedRequest {
                method,
                url: url.to_string(),
                payload: payload.cloned(),
                query: query.to_vec(),
            });

        self.responses
            .lock()
            .expect("mock transport lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(AppError::api_not_found(url)))
    }
}

/// Client on the default endpoint backed by a [`MockTransport`] with the given responses.
pub fn mock_client(responses: Vec<Value>) -> DnaClient<MockTransport> {
    DnaClient::new(Session::with_transport(
        crate::constants::DEFAULT_ENDPOINT,
        MockTransport::with_responses(responses),
    ))
}

/// Builds a match list page from explicit records per group.
pub fn match_page_with(groups: Vec<(&str, Vec<Value>)>, more_matches_available: bool) -> Value {
    let match_groups: Vec<Value> = groups
        .into_iter()
        .map(|(key, matches)| json!({"name": {"key": key}, "matches": matches}))
        .collect();

    json!({
        "matchGroups": match_groups,
        "bookmarkData": {
            "moreMatchesAvailable": more_matches_available,
            "lastMatchesServicePageIdx": 0
        }
    })
}

/// Builds a match list page with `count` generated records per group.
pub fn match_page(groups: &[(&str, usize)], more_matches_available: bool) -> Value {
    match_page_with(
        groups
            .iter()
            .map(|(key, count)| (*key, match_records(key, 0..*count)))
            .collect(),
        more_matches_available,
    )
}

/// Generated match records `{"testGuid": "<prefix>-<n>"}` for each `n` in `range`.
pub fn match_records(prefix: &str, range: std::ops::Range<usize>) -> Vec<Value> {
    range
        .map(|n| json!({"testGuid": format!("{prefix}-{n}"), "sharedCentimorgans": 100 + n}))
        .collect()
}

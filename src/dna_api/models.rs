//! Data types exchanged with the match service.
//!
//! Match records themselves stay opaque JSON values; only the grouping and
//! paging envelope of the match list is typed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Paging cursor of the match list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkData {
    pub more_matches_available: bool,
    #[serde(default)]
    pub last_matches_service_page_idx: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupName {
    pub key: String,
}

/// One group of matches in a match list response, e.g. "Close Matches".
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MatchGroup {
    pub name: GroupName,
    #[serde(default)]
    pub matches: Vec<Value>,
}

/// One page of the match list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchListResponse {
    #[serde(default)]
    pub match_groups: Vec<MatchGroup>,
    pub bookmark_data: BookmarkData,
}

impl MatchListResponse {
    pub fn match_count(&self) -> usize {
        self.match_groups.iter().map(|g| g.matches.len()).sum()
    }
}

/// Matches collected across pages, keyed by group name.
///
/// Groups keep the order they first appeared in and records keep the order the
/// service returned them in. Nothing is de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MatchGroups {
    groups: IndexMap<String, Vec<Value>>,
}

impl MatchGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every group of a response page.
    pub fn append_groups(&mut self, groups: Vec<MatchGroup>) {
        for group in groups {
            self.extend_group(group.name.key, group.matches);
        }
    }

    pub fn extend_group(&mut self, key: impl Into<String>, matches: Vec<Value>) {
        self.groups.entry(key.into()).or_default().extend(matches);
    }

    pub fn get(&self, key: &str) -> Option<&[Value]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_matches(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.groups
            .iter()
            .map(|(key, matches)| (key.as_str(), matches.as_slice()))
    }
}

/// Change applied to a match's membership in a custom group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAction {
    Add,
    Remove,
}

impl GroupAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupAction::Add => "add",
            GroupAction::Remove => "remove",
        }
    }
}

impl fmt::Display for GroupAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" => Ok(GroupAction::Add),
            "remove" => Ok(GroupAction::Remove),
            _ => Err(AppError::invalid_group_action(s)),
        }
    }
}

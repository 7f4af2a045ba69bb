//! Match list sorting and filter validation.
//!
//! The service silently misbehaves on filter combinations it does not
//! support, so every request is checked here before it is sent.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::constants::filters::{EXCLUSIVE_GROUPS, INCLUSIVE, MAX_SHARED_DNA, MIN_SHARED_DNA};
use crate::error::AppError;

/// Sort order of the match list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortType {
    Date,
    #[default]
    Relationship,
}

impl SortType {
    /// Value sent in the `sortby` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortType::Date => "DATE",
            SortType::Relationship => "RELATIONSHIP",
        }
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DATE" => Ok(SortType::Date),
            "RELATIONSHIP" => Ok(SortType::Relationship),
            _ => Err(AppError::invalid_sort_type(s)),
        }
    }
}

/// Match list filters, name to value, sent as query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    filters: BTreeMap<String, String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.filters.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = FilterSet::new();
        for (name, value) in iter {
            filters.insert(name, value);
        }
        filters
    }
}

fn is_shared_dna_range(selection: &[&str]) -> bool {
    matches!(selection, [a, b] if *a == MIN_SHARED_DNA && *b == MAX_SHARED_DNA)
}

/// Checks a sort type and filter combination the match list accepts.
///
/// Inclusive filters combine freely. From each exclusive group at most one
/// filter may be chosen, except that `minshareddna` and `maxshareddna` may be
/// used together. Anything left over is an unknown filter.
///
/// # Errors
/// * `AppError::InvalidSortType` - sort type is not `DATE` or `RELATIONSHIP` (any case)
/// * `AppError::ConflictingFilters` - more than one filter from an exclusive group
/// * `AppError::InvalidFilters` - filter names the service does not know
///
/// # Example
/// ```
/// use ancestry_dna::dna_api::filters::{FilterSet, SortType, validate_filters};
///
/// let filters = FilterSet::new()
///     .with("minshareddna", "20")
///     .with("maxshareddna", "400")
///     .with("searchsurname", "Smith");
/// assert_eq!(validate_filters("date", &filters).unwrap(), SortType::Date);
///
/// let conflicting = FilterSet::new().with("maternalid", "x").with("paternalid", "y");
/// assert!(validate_filters("DATE", &conflicting).is_err());
/// ```
pub fn validate_filters(sort_type: &str, filters: &FilterSet) -> Result<SortType, AppError> {
    let sort = sort_type.parse::<SortType>()?;

    let mut selected: BTreeSet<&str> = filters
        .names()
        .filter(|name| !INCLUSIVE.contains(name))
        .collect();

    for group in EXCLUSIVE_GROUPS {
        let chosen: Vec<&str> = group
            .iter()
            .copied()
            .filter(|name| selected.contains(name))
            .collect();

        if chosen.len() > 1 && !is_shared_dna_range(&chosen) {
            return Err(AppError::conflicting_filters(
                chosen.iter().map(|name| name.to_string()).collect(),
            ));
        }

        for name in chosen {
            selected.remove(name);
        }
    }

    if !selected.is_empty() {
        return Err(AppError::invalid_filters(
            selected.into_iter().map(str::to_string).collect(),
        ));
    }

    Ok(sort)
}

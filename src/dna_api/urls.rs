//! URL building utilities for the DNA endpoints.
//!
//! `endpoint` is the site root without a trailing slash. Test ids are passed
//! explicitly so every URL can be checked without a session.

use super::models::GroupAction;
use crate::constants::MATCHES_SERVICE_PATH;

/// Builds the base URL of the match service.
///
/// # Example
/// ```
/// use ancestry_dna::dna_api::urls::matches_service_url;
///
/// let url = matches_service_url("https://www.ancestry.com");
/// assert_eq!(url, "https://www.ancestry.com/discoveryui-matchesservice/api");
/// ```
pub fn matches_service_url(endpoint: &str) -> String {
    format!("{endpoint}{MATCHES_SERVICE_PATH}")
}

/// Builds the URL listing the account's test kits.
pub fn tests_url(endpoint: &str) -> String {
    format!("{endpoint}/dna/secure/tests")
}

/// Builds the ethnicity URL for a single test.
pub fn ethnicity_url(endpoint: &str, test_id: &str) -> String {
    format!("{endpoint}/dna/secure/tests/{test_id}/ethnicity")
}

/// Builds the URL comparing the ethnicity of two tests.
pub fn compare_ethnicity_url(endpoint: &str, test_id: &str, match_test_id: &str) -> String {
    format!(
        "{}/compare/{test_id}/with/{match_test_id}/ethnicity",
        matches_service_url(endpoint)
    )
}

/// Picks the ethnicity URL: the test alone, or compared against a match.
///
/// # Example
/// ```
/// use ancestry_dna::dna_api::urls::admixture_url;
///
/// assert_eq!(
///     admixture_url("https://www.ancestry.com", "T1", None),
///     "https://www.ancestry.com/dna/secure/tests/T1/ethnicity"
/// );
/// assert_eq!(
///     admixture_url("https://www.ancestry.com", "T1", Some("M2")),
///     "https://www.ancestry.com/discoveryui-matchesservice/api/compare/T1/with/M2/ethnicity"
/// );
/// ```
pub fn admixture_url(endpoint: &str, test_id: &str, match_test_id: Option<&str>) -> String {
    match match_test_id {
        Some(match_test_id) => compare_ethnicity_url(endpoint, test_id, match_test_id),
        None => ethnicity_url(endpoint, test_id),
    }
}

/// Builds the common ancestors URL for a pair of tests. The trailing slash is expected by the service.
pub fn common_ancestors_url(endpoint: &str, test_id: &str, match_test_id: &str) -> String {
    format!(
        "{}/compare/{test_id}/with/{match_test_id}/commonancestors/",
        matches_service_url(endpoint)
    )
}

/// Builds the tree comparison URL for a pair of tests. The generation count goes in the query.
pub fn tree_data_url(endpoint: &str, test_id: &str, match_test_id: &str) -> String {
    format!(
        "{}/compare/{test_id}/with/{match_test_id}/treedata",
        matches_service_url(endpoint)
    )
}

/// Builds the paged match list URL.
pub fn match_list_url(endpoint: &str, test_id: &str) -> String {
    format!(
        "{}/samples/{test_id}/matches/list",
        matches_service_url(endpoint)
    )
}

/// Builds the URL of a single match, used for starring.
pub fn match_url(endpoint: &str, test_id: &str, match_test_id: &str) -> String {
    format!(
        "{}/samples/{test_id}/matches/{match_test_id}",
        matches_service_url(endpoint)
    )
}

/// Builds the URL of the test's custom groups.
pub fn tags_url(endpoint: &str, test_id: &str) -> String {
    format!("{}/samples/{test_id}/tags", matches_service_url(endpoint))
}

/// Builds the URL of one custom group.
pub fn tag_url(endpoint: &str, test_id: &str, group_id: &str) -> String {
    format!("{}/{group_id}", tags_url(endpoint, test_id))
}

/// Builds the URL that adds a match to, or removes it from, a custom group.
///
/// # Example
/// ```
/// use ancestry_dna::dna_api::models::GroupAction;
/// use ancestry_dna::dna_api::urls::group_membership_url;
///
/// let add = group_membership_url("https://www.ancestry.com", "T1", GroupAction::Add, "G9");
/// assert_eq!(add, "https://www.ancestry.com/discoveryui-matchesservice/api/samples/T1/G9");
///
/// let remove = group_membership_url("https://www.ancestry.com", "T1", GroupAction::Remove, "G9");
/// assert_eq!(
///     remove,
///     "https://www.ancestry.com/discoveryui-matchesservice/api/samples/T1/matches/tags/G9/remove"
/// );
/// ```
pub fn group_membership_url(
    endpoint: &str,
    test_id: &str,
    action: GroupAction,
    group_id: &str,
) -> String {
    let service = matches_service_url(endpoint);
    match action {
        GroupAction::Add => format!("{service}/samples/{test_id}/{group_id}"),
        GroupAction::Remove => format!("{service}/samples/{test_id}/matches/tags/{group_id}/remove"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "https://www.ancestry.com";

    #[test]
    fn test_site_urls() {
        assert_eq!(tests_url(ENDPOINT), "https://www.ancestry.com/dna/secure/tests");
        assert_eq!(
            ethnicity_url(ENDPOINT, "T1"),
            "https://www.ancestry.com/dna/secure/tests/T1/ethnicity"
        );
    }

    #[test]
    fn test_compare_urls() {
        let service = "https://www.ancestry.com/discoveryui-matchesservice/api";
        assert_eq!(
            compare_ethnicity_url(ENDPOINT, "T1", "M2"),
            format!("{service}/compare/T1/with/M2/ethnicity")
        );
        assert_eq!(
            common_ancestors_url(ENDPOINT, "T1", "M2"),
            format!("{service}/compare/T1/with/M2/commonancestors/")
        );
        assert_eq!(
            tree_data_url(ENDPOINT, "T1", "M2"),
            format!("{service}/compare/T1/with/M2/treedata")
        );
    }

    #[test]
    fn test_sample_urls() {
        let service = "https://www.ancestry.com/discoveryui-matchesservice/api";
        assert_eq!(
            match_list_url(ENDPOINT, "T1"),
            format!("{service}/samples/T1/matches/list")
        );
        assert_eq!(
            match_url(ENDPOINT, "T1", "M2"),
            format!("{service}/samples/T1/matches/M2")
        );
        assert_eq!(tags_url(ENDPOINT, "T1"), format!("{service}/samples/T1/tags"));
        assert_eq!(
            tag_url(ENDPOINT, "T1", "G9"),
            format!("{service}/samples/T1/tags/G9")
        );
    }

    #[test]
    fn test_group_membership_urls_differ() {
        let add = group_membership_url(ENDPOINT, "T1", GroupAction::Add, "G9");
        let remove = group_membership_url(ENDPOINT, "T1", GroupAction::Remove, "G9");
        assert_ne!(add, remove);
        assert!(remove.ends_with("/remove"));
    }
}

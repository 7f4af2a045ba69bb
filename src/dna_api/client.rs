use serde_json::{Value, json};
use tracing::{info, instrument};

use super::filters::{FilterSet, validate_filters};
use super::matches::{MatchListQuery, fetch_all_matches};
use super::models::{GroupAction, MatchGroups};
use super::session::Session;
use super::transport::{HttpMethod, ReqwestTransport, Transport};
use super::urls;
use crate::config::Config;
use crate::constants::TREE_GENERATIONS;
use crate::error::AppError;

/// Client for the DNA match service.
///
/// Most operations act on the test selected with [`DnaClient::use_test`] and
/// fail with `AppError::NoCurrentTest` before sending anything when none is
/// selected.
#[derive(Debug)]
pub struct DnaClient<T: Transport = ReqwestTransport> {
    session: Session<T>,
    current_test: Option<String>,
}

impl DnaClient<ReqwestTransport> {
    /// Authenticates with the cookie source named in the configuration.
    pub fn connect(config: &Config) -> Result<Self, AppError> {
        let source = config.cookie_source()?;
        let session = Session::authenticate(config, source.as_ref())?;
        Ok(Self::new(session))
    }
}

impl<T: Transport> DnaClient<T> {
    pub fn new(session: Session<T>) -> Self {
        Self {
            session,
            current_test: None,
        }
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    /// Selects the test kit later operations act on.
    pub fn use_test(&mut self, test_id: impl Into<String>) {
        self.current_test = Some(test_id.into());
    }

    pub fn current_test(&self) -> Option<&str> {
        self.current_test.as_deref()
    }

    fn require_test(&self) -> Result<&str, AppError> {
        self.current_test().ok_or(AppError::NoCurrentTest)
    }

    fn endpoint(&self) -> &str {
        self.session.endpoint()
    }

    async fn get(&self, url: &str) -> Result<Value, AppError> {
        self.session.request(HttpMethod::Get, url, None, &[]).await
    }

    /// Lists the account's test kits in one category, e.g. `completeTests`.
    #[instrument(skip(self))]
    pub async fn get_tests(&self, category: &str) -> Result<Vec<Value>, AppError> {
        let url = urls::tests_url(self.endpoint());
        let response = self.get(&url).await?;

        match response.get("data").and_then(|data| data.get(category)) {
            Some(Value::Array(tests)) => {
                info!("Found {} tests in {}", tests.len(), category);
                Ok(tests.clone())
            }
            _ => Err(AppError::api_unexpected_structure(
                format!("no test list under data.{category}"),
                url,
            )),
        }
    }

    /// Ethnicity estimate of the current test, or its comparison with a match.
    #[instrument(skip(self))]
    pub async fn get_admixture(&self, match_test_id: Option<&str>) -> Result<Value, AppError> {
        let test_id = self.require_test()?;
        let url = urls::admixture_url(self.endpoint(), test_id, match_test_id);
        self.get(&url).await
    }

    /// Walks the whole match list of the current test.
    ///
    /// `sort_type` and `filters` are validated before anything is sent. With
    /// `match_test_id`, only matches shared with that test are listed.
    #[instrument(skip(self, filters))]
    pub async fn get_dna_matches(
        &self,
        sort_type: &str,
        filters: &FilterSet,
        match_test_id: Option<&str>,
    ) -> Result<MatchGroups, AppError> {
        let sort = validate_filters(sort_type, filters)?;
        let test_id = self.require_test()?;

        info!(
            "Fetching matches for {} sorted by {} with {} filters",
            test_id,
            sort,
            filters.len()
        );
        let url = urls::match_list_url(self.endpoint(), test_id);
        let query = MatchListQuery::new(filters, sort, match_test_id);
        fetch_all_matches(&self.session, &url, query).await
    }

    #[instrument(skip(self))]
    pub async fn get_common_ancestors(&self, match_test_id: &str) -> Result<Value, AppError> {
        let test_id = self.require_test()?;
        let url = urls::common_ancestors_url(self.endpoint(), test_id, match_test_id);
        self.get(&url).await
    }

    /// Tree comparison with a match, ten generations deep.
    #[instrument(skip(self))]
    pub async fn get_tree_data(&self, match_test_id: &str) -> Result<Value, AppError> {
        let test_id = self.require_test()?;
        let url = urls::tree_data_url(self.endpoint(), test_id, match_test_id);
        let query = [("generations".to_string(), TREE_GENERATIONS.to_string())];
        self.session
            .request(HttpMethod::Get, &url, None, &query)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_custom_groups(&self) -> Result<Value, AppError> {
        let test_id = self.require_test()?;
        let url = urls::tags_url(self.endpoint(), test_id);
        self.get(&url).await
    }

    /// Creates a custom group. `color` is a hex color such as `#ff0000`.
    #[instrument(skip(self))]
    pub async fn create_custom_group(&self, name: &str, color: &str) -> Result<Value, AppError> {
        let test_id = self.require_test()?;
        let url = urls::tags_url(self.endpoint(), test_id);
        let payload = json!({"tagName": name, "tagColor": color});
        self.session
            .request(HttpMethod::Post, &url, Some(&payload), &[])
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_custom_group(&self, group_id: &str) -> Result<Value, AppError> {
        let test_id = self.require_test()?;
        let url = urls::tag_url(self.endpoint(), test_id, group_id);
        // The service rejects the delete without these two empty fields.
        let payload = json!({"removeTagFromAllMatchesResult": "", "deleteTagResult": ""});
        self.session
            .request(HttpMethod::Delete, &url, Some(&payload), &[])
            .await
    }

    /// Adds a match to, or removes it from, a custom group.
    #[instrument(skip(self))]
    pub async fn modify_group_membership(
        &self,
        action: GroupAction,
        group_id: &str,
        match_test_id: &str,
    ) -> Result<Value, AppError> {
        let test_id = self.require_test()?;
        let url = urls::group_membership_url(self.endpoint(), test_id, action, group_id);
        let payload = json!({"matchSampleIds": [match_test_id]});
        self.session
            .request(HttpMethod::Post, &url, Some(&payload), &[])
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_starred(&self, match_test_id: &str, starred: bool) -> Result<Value, AppError> {
        let test_id = self.require_test()?;
        let url = urls::match_url(self.endpoint(), test_id, match_test_id);
        let payload = json!({"starred": starred});
        self.session
            .request(HttpMethod::Post, &url, Some(&payload), &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::{MockTransport, match_page, mock_client};

    const SERVICE: &str = "https://www.ancestry.com/discoveryui-matchesservice/api";

    #[tokio::test]
    async fn test_operations_require_current_test() {
        let client = mock_client(vec![]);

        assert!(matches!(
            client.get_admixture(None).await,
            Err(AppError::NoCurrentTest)
        ));
        assert!(matches!(
            client.get_custom_groups().await,
            Err(AppError::NoCurrentTest)
        ));
        assert!(matches!(
            client.set_starred("M2", true).await,
            Err(AppError::NoCurrentTest)
        ));
        assert!(matches!(
            client
                .get_dna_matches("DATE", &FilterSet::new(), None)
                .await,
            Err(AppError::NoCurrentTest)
        ));
        assert!(matches!(
            client.get_common_ancestors("M2").await,
            Err(AppError::NoCurrentTest)
        ));
        assert!(matches!(
            client.get_tree_data("M2").await,
            Err(AppError::NoCurrentTest)
        ));
        assert!(matches!(
            client.create_custom_group("Paternal", "#3366ff").await,
            Err(AppError::NoCurrentTest)
        ));
        assert!(matches!(
            client.delete_custom_group("G1").await,
            Err(AppError::NoCurrentTest)
        ));
        assert!(matches!(
            client
                .modify_group_membership(GroupAction::Add, "G1", "M2")
                .await,
            Err(AppError::NoCurrentTest)
        ));
        assert!(matches!(
            client
                .modify_group_membership(GroupAction::Remove, "G1", "M2")
                .await,
            Err(AppError::NoCurrentTest)
        ));
        assert!(client.session().transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_get_tests_returns_category() {
        let client = mock_client(vec![json!({
            "data": {
                "completeTests": [{"guid": "T1"}, {"guid": "T2"}],
                "pendingTests": []
            }
        })]);

        let tests = client.get_tests("completeTests").await.unwrap();
        assert_eq!(tests.len(), 2);
        assert_eq!(tests[0]["guid"], "T1");

        let requests = client.session().transport().requests();
        assert_eq!(requests[0].url, "https://www.ancestry.com/dna/secure/tests");
    }

    #[tokio::test]
    async fn test_get_tests_missing_category() {
        let client = mock_client(vec![json!({"data": {"completeTests": []}})]);
        let result = client.get_tests("sharedTests").await;
        assert!(matches!(
            result,
            Err(AppError::ApiUnexpectedStructure { .. })
        ));
    }

    #[tokio::test]
    async fn test_admixture_endpoint_selection() {
        let mut client = mock_client(vec![json!({"ethnicity": []}), json!({"comparison": []})]);
        client.use_test("T1");

        client.get_admixture(None).await.unwrap();
        client.get_admixture(Some("M2")).await.unwrap();

        let requests = client.session().transport().requests();
        assert_eq!(
            requests[0].url,
            "https://www.ancestry.com/dna/secure/tests/T1/ethnicity"
        );
        assert_eq!(
            requests[1].url,
            format!("{SERVICE}/compare/T1/with/M2/ethnicity")
        );
    }

    #[tokio::test]
    async fn test_invalid_filters_never_reach_the_network() {
        let mut client = mock_client(vec![]);
        client.use_test("T1");

        let conflicting = FilterSet::new()
            .with("publictrees", "true")
            .with("unlinkedtrees", "true");
        let result = client.get_dna_matches("DATE", &conflicting, None).await;
        assert!(matches!(result, Err(AppError::ConflictingFilters { .. })));

        let result = client
            .get_dna_matches("newest", &FilterSet::new(), None)
            .await;
        assert!(matches!(result, Err(AppError::InvalidSortType { .. })));

        assert!(client.session().transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_get_dna_matches_with_shared_match() {
        let mut client = mock_client(vec![
            match_page(&[("Close Matches", 2)], true),
            match_page(&[("Close Matches", 3)], false),
        ]);
        client.use_test("T1");

        let filters = FilterSet::new().with("starredmatches", "true");
        let groups = client
            .get_dna_matches("relationship", &filters, Some("M2"))
            .await
            .unwrap();
        assert_eq!(groups.get("Close Matches").unwrap().len(), 5);

        let requests = client.session().transport().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].url, format!("{SERVICE}/samples/T1/matches/list"));
        assert_eq!(requests[0].query_value("sortby"), Some("RELATIONSHIP"));
        assert_eq!(requests[0].query_value("relationguid"), Some("M2"));
        assert_eq!(requests[0].query_value("starredmatches"), Some("true"));
        assert_eq!(requests[1].query_value("page"), Some("5"));
        assert_eq!(requests[1].query_value("relationguid"), Some("M2"));
    }

    #[tokio::test]
    async fn test_compare_operations() {
        let mut client = mock_client(vec![json!({}), json!({})]);
        client.use_test("T1");

        client.get_common_ancestors("M2").await.unwrap();
        client.get_tree_data("M2").await.unwrap();

        let requests = client.session().transport().requests();
        assert_eq!(
            requests[0].url,
            format!("{SERVICE}/compare/T1/with/M2/commonancestors/")
        );
        assert_eq!(
            requests[1].url,
            format!("{SERVICE}/compare/T1/with/M2/treedata")
        );
        assert_eq!(requests[1].query_value("generations"), Some("10"));
    }

    #[tokio::test]
    async fn test_custom_group_lifecycle() {
        let mut client = mock_client(vec![
            json!({"tags": []}),
            json!({"tagId": "G9"}),
            json!(null),
        ]);
        client.use_test("T1");

        client.get_custom_groups().await.unwrap();
        let created = client.create_custom_group("Paternal", "#3366ff").await.unwrap();
        assert_eq!(created["tagId"], "G9");
        client.delete_custom_group("G9").await.unwrap();

        let requests = client.session().transport().requests();
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].url, format!("{SERVICE}/samples/T1/tags"));

        assert_eq!(requests[1].method, HttpMethod::Post);
        assert_eq!(
            requests[1].payload,
            Some(json!({"tagName": "Paternal", "tagColor": "#3366ff"}))
        );

        assert_eq!(requests[2].method, HttpMethod::Delete);
        assert_eq!(requests[2].url, format!("{SERVICE}/samples/T1/tags/G9"));
        assert_eq!(
            requests[2].payload,
            Some(json!({"removeTagFromAllMatchesResult": "", "deleteTagResult": ""}))
        );
    }

    #[tokio::test]
    async fn test_group_membership_routes_by_action() {
        let mut client = mock_client(vec![json!({}), json!({})]);
        client.use_test("T1");

        let add: GroupAction = " ADD ".parse().unwrap();
        client.modify_group_membership(add, "G9", "M2").await.unwrap();
        client
            .modify_group_membership(GroupAction::Remove, "G9", "M2")
            .await
            .unwrap();

        let requests = client.session().transport().requests();
        assert_eq!(requests[0].url, format!("{SERVICE}/samples/T1/G9"));
        assert_eq!(
            requests[1].url,
            format!("{SERVICE}/samples/T1/matches/tags/G9/remove")
        );
        for request in &requests {
            assert_eq!(request.method, HttpMethod::Post);
            assert_eq!(request.payload, Some(json!({"matchSampleIds": ["M2"]})));
        }
    }

    #[tokio::test]
    async fn test_star_and_unstar() {
        let mut client = mock_client(vec![json!({}), json!({})]);
        client.use_test("T1");

        client.set_starred("M2", true).await.unwrap();
        client.set_starred("M2", false).await.unwrap();

        let requests = client.session().transport().requests();
        assert_eq!(requests[0].url, format!("{SERVICE}/samples/T1/matches/M2"));
        assert_eq!(requests[0].payload, Some(json!({"starred": true})));
        assert_eq!(requests[1].payload, Some(json!({"starred": false})));
    }

    #[tokio::test]
    async fn test_use_test_switches_target() {
        let mut client = DnaClient::new(Session::with_transport(
            "https://www.ancestry.com",
            MockTransport::with_responses(vec![json!({}), json!({})]),
        ));
        assert_eq!(client.current_test(), None);

        client.use_test("T1");
        client.get_custom_groups().await.unwrap();
        client.use_test("T2");
        client.get_custom_groups().await.unwrap();

        assert_eq!(client.current_test(), Some("T2"));
        let requests = client.session().transport().requests();
        assert!(requests[0].url.contains("/samples/T1/"));
        assert!(requests[1].url.contains("/samples/T2/"));
    }
}

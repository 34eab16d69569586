use serde::Deserialize;

pub mod page;
pub use page::HeaderLinks;

// -------------------------------------------------------------------------------------------------
// ClientError
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Deserialize)]
pub struct ClientError {
    pub message: String,
    pub documentation_url: Option<String>,
    #[serde(default)]
    pub errors: Vec<Error>,
}

// -------------------------------------------------------------------------------------------------
// Error
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Deserialize)]
pub struct Error {
    pub resource: Option<String>,
    pub field: Option<String>,
    pub code: String,
}

// -------------------------------------------------------------------------------------------------
// SimpleUser
// -------------------------------------------------------------------------------------------------
/// The subset of a GitHub user object that is needed to request a review
#[derive(Debug, Clone, Deserialize)]
pub struct SimpleUser {
    pub login: String,
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub user_type: Option<String>,
}

// -------------------------------------------------------------------------------------------------
// CommitComparison
// Defined as in: https://docs.github.com/en/rest/commits/commits?apiVersion=2022-11-28#compare-two-commits
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Deserialize)]
pub struct CommitComparison {
    pub status: Option<String>,
    pub ahead_by: Option<i64>,
    pub behind_by: Option<i64>,
    pub total_commits: Option<i64>,
    pub commits: Vec<ComparedCommit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComparedCommit {
    pub sha: String,

    /// The GitHub account linked to the commit's author email.
    ///
    /// This is `null` when the email is not associated with any account.
    pub author: Option<SimpleUser>,
}

// -------------------------------------------------------------------------------------------------
// UserSearchResults
// Defined as in: https://docs.github.com/en/rest/search/search?apiVersion=2022-11-28#search-users
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Deserialize)]
pub struct UserSearchResults {
    pub total_count: i64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<SimpleUser>,
}

#[cfg(test)]
mod test {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn comparison_with_null_author() {
        let body = indoc! {r#"
            {
              "status": "ahead",
              "ahead_by": 2,
              "behind_by": 0,
              "total_commits": 2,
              "commits": [
                { "sha": "6dcb09b5b57875f334f61aebed695e2e4193db5e", "author": { "login": "octocat", "id": 1, "type": "User" } },
                { "sha": "a1b2c3d4e5f60718293a4b5c6d7e8f9012345678", "author": null }
              ]
            }
        "#};
        let cmp: CommitComparison = serde_json::from_str(body).unwrap();
        assert_eq!(cmp.total_commits, Some(2));
        assert_eq!(cmp.commits.len(), 2);
        assert_eq!(cmp.commits[0].author.as_ref().map(|a| a.login.as_str()), Some("octocat"));
        assert!(cmp.commits[1].author.is_none());
    }

    #[test]
    fn user_search_results() {
        let body = r#"{"total_count": 1, "incomplete_results": false, "items": [{"login": "dave"}]}"#;
        let results: UserSearchResults = serde_json::from_str(body).unwrap();
        assert_eq!(results.total_count, 1);
        assert_eq!(results.items[0].login, "dave");
    }

    #[test]
    fn client_error_without_errors_list() {
        let body = r#"{"message": "Bad credentials", "documentation_url": "https://docs.github.com/rest"}"#;
        let err: ClientError = serde_json::from_str(body).unwrap();
        assert_eq!(err.message, "Bad credentials");
        assert!(err.errors.is_empty());
    }
}

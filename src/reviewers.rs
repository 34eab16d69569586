use std::collections::BTreeSet;

use crate::github::models::UserSearchResults;

// -------------------------------------------------------------------------------------------------
// ReviewerSet
// -------------------------------------------------------------------------------------------------
/// A deduplicated set of GitHub logins to request as reviewers.
///
/// Iteration and output are in sorted order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReviewerSet(BTreeSet<String>);

impl ReviewerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reviewer, ignoring blank logins. Returns `true` if the login was newly added.
    pub fn insert<S: Into<String>>(&mut self, login: S) -> bool {
        let login = login.into();
        let login = login.trim();
        if login.is_empty() {
            return false;
        }
        self.0.insert(login.to_string())
    }

    /// Add every entry of a comma-separated list of logins.
    pub fn extend_from_comma_list(&mut self, list: &str) {
        for login in list.split(',') {
            self.insert(login);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl std::fmt::Display for ReviewerSet {
    /// Formats the set as a single comma-joined line, with no trailing delimiter.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, login) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(login)?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for ReviewerSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ReviewerSet::new();
        for login in iter {
            set.insert(login);
        }
        set
    }
}

impl<S: Into<String>> Extend<S> for ReviewerSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for login in iter {
            self.insert(login);
        }
    }
}

// -------------------------------------------------------------------------------------------------
// AuthorResolution
// -------------------------------------------------------------------------------------------------
/// The outcome of mapping a commit author's email to a GitHub login
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorResolution {
    /// Exactly one user matched
    Resolved(String),

    /// No user matched
    NotFound,

    /// More than one user matched; holds the number of matches
    Ambiguous(i64),
}

impl AuthorResolution {
    /// Interpret the results of a user search.
    pub fn from_search_results(results: &UserSearchResults) -> Self {
        match results.total_count {
            1 => match results.items.first() {
                Some(user) if !user.login.trim().is_empty() => {
                    AuthorResolution::Resolved(user.login.clone())
                }
                _ => AuthorResolution::NotFound,
            },
            n if n <= 0 => AuthorResolution::NotFound,
            n => AuthorResolution::Ambiguous(n),
        }
    }

    pub fn login(&self) -> Option<&str> {
        match self {
            AuthorResolution::Resolved(login) => Some(login),
            AuthorResolution::NotFound | AuthorResolution::Ambiguous(_) => None,
        }
    }
}

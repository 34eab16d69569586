//! The two ways of finding reviewers for a branch.
//!
//! - [`find_contributors_to_branch`] asks the GitHub compare API for the commits on the head
//!   branch and reads each commit's author login directly from the response.
//! - [`find_authors_of_new_commits`] runs `git cherry` locally, looks up each new commit's author
//!   email, and maps the email to a login with the GitHub user search API.
//!
//! The external services sit behind small traits so that the pipelines can be exercised without
//! a network or a repository.

use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::cherry::parse_new_commits;
use crate::commit_id::CommitId;
use crate::git_binary::{Git, GitError};
use crate::github::{self, models};
use crate::repo_name::RepoName;
use crate::reviewers::{AuthorResolution, ReviewerSet};

// -------------------------------------------------------------------------------------------------
// seams
// -------------------------------------------------------------------------------------------------
/// Something that can list the commits between two refs of a hosted repository
#[allow(async_fn_in_trait)]
pub trait CommitComparer {
    async fn compare_commits(
        &self,
        repo: &RepoName,
        base: &str,
        head: &str,
    ) -> github::Result<Vec<models::ComparedCommit>>;
}

/// Something that can search for platform users by a term such as an email address
#[allow(async_fn_in_trait)]
pub trait UserDirectory {
    async fn search_users(&self, term: &str) -> github::Result<models::UserSearchResults>;
}

/// Something that can answer questions about local commit history
pub trait CommitLog {
    /// Raw `git cherry -v <upstream> <head>` output.
    fn cherry(&self, upstream: &str, head: &str) -> Result<String, GitError>;

    fn author_email(&self, commit: &CommitId) -> Result<String, GitError>;
}

impl CommitComparer for github::Client {
    async fn compare_commits(
        &self,
        repo: &RepoName,
        base: &str,
        head: &str,
    ) -> github::Result<Vec<models::ComparedCommit>> {
        github::Client::compare_commits(self, &repo.owner, &repo.name, base, head).await
    }
}

impl UserDirectory for github::Client {
    async fn search_users(&self, term: &str) -> github::Result<models::UserSearchResults> {
        github::Client::search_users(self, term).await
    }
}

impl CommitLog for Git {
    fn cherry(&self, upstream: &str, head: &str) -> Result<String, GitError> {
        Git::cherry(self, upstream, head)
    }

    fn author_email(&self, commit: &CommitId) -> Result<String, GitError> {
        Git::author_email(self, commit)
    }
}

// -------------------------------------------------------------------------------------------------
// compare API
// -------------------------------------------------------------------------------------------------
/// Find the authors of commits on `head_branch` that are not on `base_branch`.
///
/// Commits whose author email is not linked to a GitHub account are skipped with a warning.
pub async fn find_contributors_to_branch<C: CommitComparer>(
    client: &C,
    repo: &RepoName,
    head_branch: &str,
    base_branch: &str,
) -> Result<ReviewerSet> {
    let commits = client
        .compare_commits(repo, base_branch, head_branch)
        .await
        .with_context(|| {
            format!("Failed to compare {base_branch}...{head_branch} in {repo}")
        })?;
    debug!("{} commits in {base_branch}...{head_branch}", commits.len());

    let mut contributors = ReviewerSet::new();
    for commit in commits {
        match commit.author {
            Some(author) => {
                contributors.insert(author.login);
            }
            None => warn!("Commit {} has no associated GitHub user; skipping", commit.sha),
        }
    }
    info!("Found {} contributors to {head_branch}", contributors.len());
    Ok(contributors)
}

// -------------------------------------------------------------------------------------------------
// local cherry + user search
// -------------------------------------------------------------------------------------------------
/// Map an author email to a GitHub login.
///
/// Zero or several matching users are not errors: a warning is logged and the author is left
/// unresolved. A failed search request is an error.
pub async fn resolve_author<D: UserDirectory>(
    directory: &D,
    email: &str,
) -> Result<AuthorResolution> {
    let results = directory
        .search_users(email)
        .await
        .with_context(|| format!("Failed to search for GitHub users matching {email}"))?;

    let resolution = AuthorResolution::from_search_results(&results);
    match &resolution {
        AuthorResolution::Resolved(login) => debug!("Resolved {email} to {login}"),
        AuthorResolution::NotFound => warn!("No GitHub user found for {email}"),
        AuthorResolution::Ambiguous(n) => {
            warn!("Found {n} GitHub users for {email}; cannot determine which one to use")
        }
    }
    Ok(resolution)
}

/// Find the GitHub logins of the authors of commits on `base_branch` that have no equivalent
/// patch on `target_branch`.
///
/// Every commit hash is extracted before any user search happens, so malformed `git cherry`
/// output fails the run without touching the network.
pub async fn find_authors_of_new_commits<G, D>(
    git: &G,
    directory: &D,
    base_branch: &str,
    target_branch: &str,
) -> Result<ReviewerSet>
where
    G: CommitLog,
    D: UserDirectory,
{
    let output = git
        .cherry(target_branch, base_branch)
        .with_context(|| format!("Failed to compare {base_branch} against {target_branch}"))?;
    let commits = parse_new_commits(&output).context("Failed to parse git cherry output")?;
    debug!("{} new commits on {base_branch}", commits.len());

    let mut resolved: HashMap<String, AuthorResolution> = HashMap::new();
    let mut authors = ReviewerSet::new();
    for commit in &commits {
        let email = git
            .author_email(commit)
            .with_context(|| format!("Failed to find the author of commit {commit}"))?;

        if !resolved.contains_key(&email) {
            let resolution = resolve_author(directory, &email).await?;
            resolved.insert(email.clone(), resolution);
        }
        if let Some(login) = resolved.get(&email).and_then(AuthorResolution::login) {
            authors.insert(login);
        }
    }
    info!(
        "Resolved {} authors from {} new commits on {base_branch}",
        authors.len(),
        commits.len()
    );
    Ok(authors)
}

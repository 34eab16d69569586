//! Parsing of `git cherry -v` output into the commits that are new on a branch.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::commit_id::CommitId;

lazy_static! {
    static ref COMMIT_HASH_PATTERN: Regex =
        Regex::new(r"[0-9a-fA-F]{5,40}").expect("commit hash regex should compile");
}

// -------------------------------------------------------------------------------------------------
// ParseError
// -------------------------------------------------------------------------------------------------
#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// A line marked as a new commit contained no commit hash
    MissingCommitHash { line: String },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingCommitHash { line } => {
                write!(f, "could not determine commit hash from line {line:?}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Extract the commits marked as new (`+`) from `git cherry` output, in order.
///
/// Lines marked `-` have an equivalent patch upstream and are skipped. Any `+` line without a
/// commit hash fails the whole parse, so that no partial result is ever used.
pub fn parse_new_commits(output: &str) -> Result<Vec<CommitId>, ParseError> {
    let mut commits = Vec::new();
    for line in output.lines() {
        let body = match line.strip_prefix('+') {
            Some(body) => body,
            None => {
                trace!("Skipping cherry line {line:?}");
                continue;
            }
        };

        let commit = COMMIT_HASH_PATTERN
            .find(body)
            .and_then(|m| CommitId::new(m.as_str()))
            .ok_or_else(|| ParseError::MissingCommitHash {
                line: line.to_string(),
            })?;
        commits.push(commit);
    }
    Ok(commits)
}

use anyhow::{bail, Context, Result};
use std::io::Write;
use tracing::warn;

use crate::args::GlobalArgs;
use get_reviewers::github;
use get_reviewers::reviewers::ReviewerSet;

/// The environment variable holding an optional GitHub access token.
/// There is no command-line flag for the token.
const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

fn github_token_from_env() -> Result<Option<String>> {
    match std::env::var(GITHUB_TOKEN_VAR) {
        Ok(token) => Ok(Some(token)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => {
            bail!("{GITHUB_TOKEN_VAR} contains invalid Unicode")
        }
    }
}

/// Build a GitHub client from the global arguments and the `GITHUB_TOKEN` environment variable.
pub fn github_client(global_args: &GlobalArgs) -> Result<github::Client> {
    github::ClientBuilder::new()
        .base_url(global_args.github_api_url.clone())
        .context("Failed to set GitHub API URL")?
        .auth(github::Auth::from_optional_token(github_token_from_env()?))
        .ignore_certs(global_args.ignore_certs)
        .build()
        .context("Failed to initialize GitHub client")
}

/// Log how long to wait before retrying if `err` came from GitHub rate limiting.
pub fn warn_if_rate_limited(err: &anyhow::Error) {
    if let Some(github::Error::RateLimited { wait, .. }) = err.downcast_ref::<github::Error>() {
        warn!("Rate limit exceeded: Would need to wait for {wait:?} before retrying");
    }
}

/// Create the single-threaded runtime that drives GitHub requests.
pub fn new_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to initialize async runtime")
}

/// Print the reviewers to stdout as one comma-separated line.
pub fn write_reviewers(reviewers: &ReviewerSet) -> Result<()> {
    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    match writeln!(writer, "{reviewers}").and_then(|()| writer.flush()) {
        // Ignore SIGPIPE errors, like those that can come from piping to `head`
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(e).context("Failed to write reviewers"),
        Ok(()) => Ok(()),
    }
}

/// A utility type to generate properly pluralized count expressions in log messages,
/// e.g., "1 reviewer" or "7 reviewers".
pub struct Counted<'a> {
    singular: &'a str,
    count: usize,
}

impl<'a> Counted<'a> {
    /// Create a new `Counted` value with the given count and singular form, which is pluralized by
    /// adding an `s`.
    pub fn regular(count: usize, singular: &'a str) -> Self {
        Counted { singular, count }
    }
}

impl<'a> std::fmt::Display for Counted<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 1 {
            write!(f, "1 {}", self.singular)
        } else {
            write!(f, "{} {}s", self.count, self.singular)
        }
    }
}

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::args;
use crate::util::{github_client, new_runtime, warn_if_rate_limited, write_reviewers, Counted};
use get_reviewers::pipeline::find_contributors_to_branch;
use get_reviewers::repo_name::RepoName;

/// Get the value of a `compare` option that is required once reviewers are to be added.
fn required<'a>(value: &'a Option<String>, flag: &str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => bail!("{flag} is required when --should-add-reviewers is true"),
    }
}

pub fn run(global_args: &args::GlobalArgs, args: &args::CompareArgs) -> Result<()> {
    if !args.should_add_reviewers {
        debug!("Not adding reviewers; nothing to do");
        return Ok(());
    }

    let repository: RepoName = required(&args.repository, "--repository")?
        .parse()
        .context("Failed to parse --repository")?;
    let head_branch = required(&args.head_branch, "--head-branch")?;
    let base_branch = required(&args.base_branch, "--base-branch")?;

    let client = github_client(global_args)?;
    let runtime = new_runtime()?;

    let mut reviewers = runtime
        .block_on(find_contributors_to_branch(&client, &repository, head_branch, base_branch))
        .inspect_err(warn_if_rate_limited)?;

    if let Some(required) = &args.required_reviewers {
        reviewers.extend_from_comma_list(required);
    }
    info!("Requesting {}", Counted::regular(reviewers.len(), "reviewer"));

    write_reviewers(&reviewers).context("Failed to output reviewers")
}

use anyhow::{Context, Result};
use tracing::info;

use crate::args;
use crate::util::{github_client, new_runtime, warn_if_rate_limited, write_reviewers, Counted};
use get_reviewers::git_binary::Git;
use get_reviewers::pipeline::find_authors_of_new_commits;

pub fn run(global_args: &args::GlobalArgs, args: &args::CherryArgs) -> Result<()> {
    let git = Git::new(&args.repo_dir);
    let client = github_client(global_args)?;
    let runtime = new_runtime()?;

    let reviewers = runtime
        .block_on(find_authors_of_new_commits(
            &git,
            &client,
            &args.base_branch,
            &args.target_branch,
        ))
        .inspect_err(warn_if_rate_limited)?;
    info!("Requesting {}", Counted::regular(reviewers.len(), "reviewer"));

    write_reviewers(&reviewers).context("Failed to output reviewers")
}

pub mod cherry;
pub mod commit_id;
pub mod git_binary;
pub mod github;
pub mod pipeline;
pub mod repo_name;
pub mod reviewers;

use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, debug_span};

use crate::commit_id::CommitId;

#[derive(Debug)]
pub enum GitError {
    IOError(std::io::Error),
    GitError {
        stdout: Vec<u8>,
        stderr: Vec<u8>,
        status: ExitStatus,
    },
    UnexpectedOutput {
        command: &'static str,
        output: String,
    },
}

impl From<std::io::Error> for GitError {
    fn from(err: std::io::Error) -> GitError {
        GitError::IOError(err)
    }
}

impl std::fmt::Display for GitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitError::IOError(e) => write!(f, "git execution failed: {e}"),
            GitError::GitError {
                stdout,
                stderr,
                status,
            } => write!(
                f,
                "git execution failed\ncode={status}\nstdout=```\n{}```\nstderr=```\n{}```",
                String::from_utf8_lossy(stdout),
                String::from_utf8_lossy(stderr)
            ),
            GitError::UnexpectedOutput { command, output } => {
                write!(f, "unexpected output from git {command}: {output:?}")
            }
        }
    }
}

impl std::error::Error for GitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GitError::IOError(e) => Some(e),
            GitError::GitError { .. } => None,
            GitError::UnexpectedOutput { .. } => None,
        }
    }
}

lazy_static! {
    static ref QUOTED_VALUE_PATTERN: Regex =
        Regex::new(r#""([^"]*)""#).expect("quoted value regex should compile");
}

/// A handle for running the `git` binary from `PATH` in a particular working directory.
pub struct Git {
    repo_dir: PathBuf,
}

impl Git {
    pub fn new<P: AsRef<Path>>(repo_dir: P) -> Self {
        Self {
            repo_dir: repo_dir.as_ref().to_path_buf(),
        }
    }

    fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.env("GIT_CONFIG_GLOBAL", "/dev/null");
        cmd.env("GIT_CONFIG_NOSYSTEM", "1");
        cmd.env("GIT_CONFIG_SYSTEM", "/dev/null");
        cmd.arg("-C").arg(&self.repo_dir);
        cmd.stdin(Stdio::null());
        cmd
    }

    fn run(&self, mut cmd: Command) -> Result<String, GitError> {
        debug!("{cmd:#?}");
        let output = cmd.output()?;
        if !output.status.success() {
            return Err(GitError::GitError {
                stdout: output.stdout,
                stderr: output.stderr,
                status: output.status,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run `git cherry -v <upstream> <head>`, returning its raw output.
    ///
    /// Each line names a commit of `head`, marked with `+` when no equivalent patch exists in
    /// `upstream`, or `-` when one does.
    pub fn cherry(&self, upstream: &str, head: &str) -> Result<String, GitError> {
        let _span = debug_span!("git_cherry", upstream, head).entered();

        let mut cmd = self.git();
        cmd.arg("cherry").arg("-v").arg(upstream).arg(head);
        self.run(cmd)
    }

    /// Look up the author email of a single commit.
    pub fn author_email(&self, commit: &CommitId) -> Result<String, GitError> {
        let _span = debug_span!("git_log", commit = %commit).entered();

        let mut cmd = self.git();
        cmd.arg("log")
            .arg("-n")
            .arg("1")
            .arg(r#"--format="%ae""#)
            .arg(commit.as_str())
            .arg("--");
        let output = self.run(cmd)?;
        parse_quoted_email(&output).ok_or_else(|| GitError::UnexpectedOutput {
            command: "log",
            output,
        })
    }
}

/// Extract the author email from `git log --format="%ae"` output.
fn parse_quoted_email(output: &str) -> Option<String> {
    let captures = QUOTED_VALUE_PATTERN.captures(output.trim())?;
    let email = captures.get(1)?.as_str().trim();
    if email.is_empty() {
        None
    } else {
        Some(email.to_string())
    }
}

//! Integration Test Utilities and Common Code

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};

pub use assert_cmd::prelude::*;
pub use assert_fs::prelude::*;
pub use assert_fs::TempDir;
pub use predicates::prelude::*;
pub use predicates::str::{is_empty, RegexPredicate};
pub use std::path::Path;
pub use std::process::Command;

/// Build a `Command` for the `get-reviewers` crate binary with variadic command-line arguments.
///
/// The arguments can be anything that is allowed by `Command::arg`.
#[macro_export]
macro_rules! get_reviewers {
    ( $( $arg:expr ),* ) => {
        {
            let mut cmd = get_reviewers_cmd();
            $(
                cmd.arg($arg);
            )*
            cmd
        }
    }
}

/// Build an `assert_cmd::assert::Assert` by calling `get_reviewers!(args).assert().success()`.
#[macro_export]
macro_rules! get_reviewers_success {
    ( $( $arg:expr ),* ) => { get_reviewers!($( $arg ),*).assert().success() }
}

/// Build an `assert_cmd::assert::Assert` by calling `get_reviewers!(args).assert().failure()`.
#[macro_export]
macro_rules! get_reviewers_failure {
    ( $( $arg:expr ),* ) => { get_reviewers!($( $arg ),*).assert().failure() }
}

// make macros easily visible to other modules
pub use {get_reviewers, get_reviewers_failure, get_reviewers_success};

/// Build a `Command` for the `get-reviewers` crate binary.
///
/// Environment variables that would change its behavior are cleared, and colored log output is
/// disabled, so that output can be matched exactly.
pub fn get_reviewers_cmd() -> Command {
    let mut cmd = Command::cargo_bin("get-reviewers").expect("get-reviewers should be executable");
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("GET_REVIEWERS_GITHUB_API_URL")
        .env_remove("GET_REVIEWERS_LOG")
        .env("NO_COLOR", "1");
    // requests to the stub server must not be routed through a proxy
    for var in ["HTTP_PROXY", "http_proxy", "HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"] {
        cmd.env_remove(var);
    }
    cmd
}

/// Create a `RegexPredicate` from the given pattern.
pub fn is_match(pat: &str) -> RegexPredicate {
    predicates::str::is_match(pat).expect("pattern should compile")
}

// -------------------------------------------------------------------------------------------------
// StubServer
// -------------------------------------------------------------------------------------------------
/// A canned HTTP response
#[derive(Clone, Debug)]
pub struct StubResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl StubResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// A minimal HTTP/1.1 server on 127.0.0.1 that answers GitHub API requests with canned responses.
///
/// Each route is a request-target prefix; the first matching route answers. Unmatched requests
/// get a 404. The head of every request received is recorded.
pub struct StubServer {
    listener: Option<TcpListener>,
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub fn new() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("should be able to bind stub server");
        let addr = listener.local_addr().expect("stub server should have an address");
        Self {
            listener: Some(listener),
            addr,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The base URL of this server, with a trailing slash.
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Start answering requests in a background thread.
    pub fn serve(&mut self, routes: Vec<(String, StubResponse)>) {
        let listener = self.listener.take().expect("stub server should only be started once");
        let requests = Arc::clone(&self.requests);
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                handle_connection(stream, &routes, &requests);
            }
        });
    }

    /// The heads of all requests received so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock should not be poisoned").clone()
    }

    /// The request targets (path and query) of all requests received so far, in order.
    pub fn request_targets(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|r| r.lines().next()?.split(' ').nth(1).map(str::to_string))
            .collect()
    }
}

fn handle_connection(
    mut stream: TcpStream,
    routes: &[(String, StubResponse)],
    requests: &Mutex<Vec<String>>,
) {
    let mut head = String::new();
    {
        let mut reader = BufReader::new(&mut stream);
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            if line == "\r\n" || line == "\n" {
                break;
            }
            head.push_str(&line);
        }
    }

    let target = head
        .lines()
        .next()
        .and_then(|l| l.split(' ').nth(1))
        .unwrap_or("")
        .to_string();
    requests.lock().expect("requests lock should not be poisoned").push(head);

    let response = routes
        .iter()
        .find(|(prefix, _)| target.starts_with(prefix.as_str()))
        .map(|(_, response)| response.clone())
        .unwrap_or_else(|| StubResponse::json(404, r#"{"message": "Not Found"}"#));

    let mut out = format!("HTTP/1.1 {} Stub\r\n", response.status);
    out.push_str("Content-Type: application/json; charset=utf-8\r\n");
    out.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    out.push_str("Connection: close\r\n");
    for (name, value) in &response.headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str("\r\n");
    out.push_str(&response.body);
    let _ = stream.write_all(out.as_bytes());
    let _ = stream.flush();
}

// -------------------------------------------------------------------------------------------------
// TestRepo
// -------------------------------------------------------------------------------------------------
/// A scratch Git repository, manipulated with the `git` binary.
pub struct TestRepo {
    pub root: TempDir,
}

impl TestRepo {
    /// Create a new repository with one initial commit, and a `trunk` branch pointing at it.
    /// The current branch is `feature`, also pointing at the initial commit.
    pub fn new() -> Self {
        let root = TempDir::new().expect("should be able to create tempdir");
        let repo = Self { root };
        repo.git(&["init", "-q"]);
        repo.commit("README.md", "# scratch\n", "founder@example.com", "Initial commit");
        repo.git(&["branch", "trunk"]);
        repo.git(&["checkout", "-q", "-b", "feature"]);
        repo
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Run `git` in this repository with isolated configuration, asserting success.
    pub fn git(&self, args: &[&str]) {
        self.git_as(args, "tester@example.com");
    }

    fn git_as(&self, args: &[&str], email: &str) {
        let status = Command::new("git")
            .current_dir(self.path())
            .env("GIT_CONFIG_GLOBAL", "/dev/null")
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("GIT_AUTHOR_NAME", "Test Author")
            .env("GIT_AUTHOR_EMAIL", email)
            .env("GIT_COMMITTER_NAME", "Test Committer")
            .env("GIT_COMMITTER_EMAIL", "committer@example.com")
            .args(["-c", "commit.gpgsign=false"])
            .args(args)
            .status()
            .expect("git should be executable");
        assert!(status.success(), "git {args:?} should succeed");
    }

    /// Write a file and commit it, authored by `email`.
    pub fn commit(&self, file: &str, contents: &str, email: &str, message: &str) {
        self.root
            .child(file)
            .write_str(contents)
            .expect("should be able to write file");
        self.git_as(&["add", file], email);
        self.git_as(&["commit", "-q", "-m", message], email);
    }
}

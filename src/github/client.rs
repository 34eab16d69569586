use chrono::{DateTime, Duration, TimeDelta, TimeZone, Utc};
use reqwest::{header, header::HeaderValue, StatusCode, Url};
use secrecy::ExposeSecret;
use tracing::{debug, trace};

use super::models::{ClientError, ComparedCommit, CommitComparison, HeaderLinks, UserSearchResults};
use super::{Auth, Error, Result};
#[cfg(test)]
use super::ClientBuilder;

// -------------------------------------------------------------------------------------------------
// Client
// -------------------------------------------------------------------------------------------------
pub struct Client {
    pub(super) base_url: Url,
    pub(super) inner: reqwest::Client,
    pub(super) auth: Auth,
}

const MAX_PER_PAGE: (&str, &str) = ("per_page", "100");

impl Client {
    /// List the commits reachable from `head` but not from `base` in the repository
    /// `owner/repo`, following pagination until every commit has been fetched.
    pub async fn compare_commits(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Vec<ComparedCommit>> {
        let url = self.compare_url(owner, repo, base, head)?;

        let mut commits = Vec::new();
        let mut next = Some(url);
        while let Some(url) = next {
            let response = self.get_url(url).await?;
            let links = HeaderLinks::from_headers(response.headers());
            let page: CommitComparison = decode(response).await?;
            debug!(
                "Fetched {} compared commits ({:?} total)",
                page.commits.len(),
                page.total_commits
            );
            if page.commits.is_empty() {
                break;
            }
            commits.extend(page.commits);
            next = links.next;
        }
        Ok(commits)
    }

    /// Search for users matching the given term, typically an email address.
    pub async fn search_users(&self, term: &str) -> Result<UserSearchResults> {
        let response = self
            .get_with_params(&["search", "users"], &[("q", term)])
            .await?;
        decode(response).await
    }

    /// Build the URL of the compare endpoint.
    ///
    /// The `{base}...{head}` part is pushed as a single percent-encoded path segment, so that refs
    /// containing slashes, like `feature/foo`, are accepted.
    fn compare_url(&self, owner: &str, repo: &str, base: &str, head: &str) -> Result<Url> {
        let mut url = self.make_url(&["repos", owner, repo, "compare"], &[MAX_PER_PAGE])?;
        match url.path_segments_mut() {
            Ok(mut segments) => {
                segments.pop_if_empty().push(&format!("{base}...{head}"));
            }
            Err(()) => return Err(Error::UrlBaseError(self.base_url.clone())),
        }
        Ok(url)
    }
}

/// Create a URL from the given base, path parts, and parameters.
///
/// The path parts should not contain slashes.
fn url_from_path_parts_and_params(
    base_url: Url,
    path_parts: &[&str],
    params: &[(&str, &str)],
) -> Result<Url> {
    if base_url.cannot_be_a_base() {
        return Err(Error::UrlBaseError(base_url));
    }

    let mut buf = base_url.path().to_string();
    if !buf.ends_with('/') {
        buf.push('/');
    }

    for (i, p) in path_parts.iter().enumerate() {
        if p.contains('/') {
            return Err(Error::UrlSlashError(p.to_string()));
        }
        if i > 0 {
            // do not add a leading slash for the very first path part, or the result comes out
            // wrong, as it is unintentionally treated as an absolute path
            buf.push('/');
        }
        buf.push_str(p);
    }
    let url = base_url.join(&buf)?;
    let url = if params.is_empty() {
        Url::parse(url.as_str())
    } else {
        Url::parse_with_params(url.as_str(), params)
    }?;
    Ok(url)
}

/// Turn a non-success response into an `Error`, distinguishing authorization failures from other
/// unexpected statuses.
fn error_for_status(status: StatusCode, url: Url, body: String) -> Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            let message = match serde_json::from_str::<ClientError>(&body) {
                Ok(client_error) => client_error.message,
                Err(_) => body,
            };
            Error::Unauthorized { status, message }
        }
        _ => Error::UnexpectedStatus { status, url, body },
    }
}

/// Interpret the body of an error response, keeping the raw text as the message when it is not a
/// GitHub error object.
fn client_error_from_body(body: &str) -> ClientError {
    serde_json::from_str(body).unwrap_or_else(|_| ClientError {
        message: body.trim().to_string(),
        documentation_url: None,
        errors: Vec::new(),
    })
}

/// Decode a JSON response body, reporting shape mismatches as `Error::PayloadError`.
async fn decode<T>(response: reqwest::Response) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let url = response.url().clone();
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|source| Error::PayloadError { url, source })
}


// private implementation
impl Client {
    /// Construct a `Url` from the given path parts and query parameters.
    fn make_url(&self, path_parts: &[&str], params: &[(&str, &str)]) -> Result<Url> {
        url_from_path_parts_and_params(self.base_url.clone(), path_parts, params)
    }

    async fn get_with_params(
        &self,
        path_parts: &[&str],
        params: &[(&str, &str)],
    ) -> Result<reqwest::Response> {
        let url = self.make_url(path_parts, params)?;
        self.get_url(url).await
    }

    async fn get_url(&self, url: Url) -> Result<reqwest::Response> {
        trace!("GET {url}");

        // build request, handling authentication if any
        let request_builder = self
            .inner
            .get(url)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        let request_builder = match &self.auth {
            Auth::Token(token) => request_builder.bearer_auth(token.expose_secret()),
            Auth::Unauthenticated => request_builder,
        };

        // send request and wait for response
        let response = request_builder.send().await?;

        // Check for rate limiting.
        //
        // GitHub usually signals this with a 403 rather than a 429, setting either `Retry-After`
        // or `x-ratelimit-remaining: 0`. When `Retry-After` is absent, the limit resets at the
        // epoch time in `x-ratelimit-reset`.
        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            if let Some(retry_after) = response.headers().get("Retry-After") {
                let wait =
                    atoi::atoi::<i64>(retry_after.as_bytes()).and_then(TimeDelta::try_seconds);
                let client_error = client_error_from_body(&response.text().await?);
                return Err(Error::RateLimited { client_error, wait });
            }

            if let Some(b"0") = response
                .headers()
                .get("x-ratelimit-remaining")
                .map(HeaderValue::as_bytes)
            {
                let wait = || -> Option<Duration> {
                    let date = response.headers().get("date")?.to_str().ok()?;
                    let date = DateTime::parse_from_rfc2822(date).ok()?.with_timezone(&Utc);

                    let reset_time = response
                        .headers()
                        .get("x-ratelimit-reset")?
                        .to_str()
                        .ok()?
                        .parse::<i64>()
                        .ok()?;
                    let reset_time = Utc.timestamp_opt(reset_time, 0).single()?;

                    Some(reset_time - date)
                }();

                let client_error = client_error_from_body(&response.text().await?);
                return Err(Error::RateLimited { client_error, wait });
            }
        }

        if !status.is_success() {
            let url = response.url().clone();
            let body = response.text().await?;
            return Err(error_for_status(status, url, body));
        }

        Ok(response)
    }
}

use chrono::Duration;
use reqwest::{StatusCode, Url};

use super::models;

// -------------------------------------------------------------------------------------------------
// Error
// -------------------------------------------------------------------------------------------------
#[derive(Debug)]
pub enum Error {
    RateLimited {
        /// The client error returned by GitHub
        client_error: models::ClientError,

        /// The duration to wait until trying again
        wait: Option<Duration>,
    },

    /// The credentials were missing, invalid, or lacked access (401, or a 403 that is not rate
    /// limiting)
    Unauthorized { status: StatusCode, message: String },

    /// Any other non-success response
    UnexpectedStatus {
        status: StatusCode,
        url: Url,
        body: String,
    },

    /// The response body did not have the expected shape
    PayloadError { url: Url, source: serde_json::Error },

    UrlParseError(url::ParseError),
    UrlSlashError(String),
    UrlBaseError(Url),
    ReqwestError(reqwest::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::RateLimited { client_error, .. } => {
                write!(f, "request was rate-limited: {}", client_error.message)
            }
            Error::Unauthorized { status, message } => {
                write!(f, "request was not authorized ({status}): {message}")
            }
            Error::UnexpectedStatus { status, url, body } => {
                write!(f, "bad response from {url}: {status}: {body}")
            }
            Error::PayloadError { url, .. } => {
                write!(f, "unexpected response payload from {url}")
            }
            Error::UrlParseError(e) => write!(f, "error parsing URL: {e}"),
            Error::UrlSlashError(p) => {
                write!(f, "error building URL: component {p:?} contains a slash")
            }
            Error::UrlBaseError(u) => write!(f, "error building URL: {u} cannot be a base"),
            Error::ReqwestError(e) => write!(f, "error making request: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::RateLimited { .. } => None,
            Error::Unauthorized { .. } => None,
            Error::UnexpectedStatus { .. } => None,
            Error::PayloadError { source, .. } => Some(source),
            Error::UrlParseError(e) => Some(e),
            Error::UrlSlashError(_) => None,
            Error::UrlBaseError(_) => None,
            Error::ReqwestError(e) => Some(e),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::UrlParseError(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Error {
        Error::ReqwestError(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn payload_error_names_cause_once() {
        let source = serde_json::from_str::<models::CommitComparison>("{}").unwrap_err();
        let cause = source.to_string();
        let err = Error::PayloadError {
            url: Url::parse("https://api.github.com/repos/acme/widgets/compare/main...release")
                .unwrap(),
            source,
        };
        insta::assert_snapshot!(
            err.to_string(),
            @"unexpected response payload from https://api.github.com/repos/acme/widgets/compare/main...release"
        );

        let chain = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(chain.matches(&cause).count(), 1);
    }
}

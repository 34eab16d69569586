use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use reqwest::header::HeaderMap;
use url::Url;

// -------------------------------------------------------------------------------------------------
// HeaderLinks
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Default)]
pub struct HeaderLinks {
    pub next: Option<Url>,
    // NOTE: these could be parsed out of the headers, but are not currently used, so we ignore them
    // pub prev: Option<Url>,
    // pub first: Option<Url>,
    // pub last: Option<Url>,
}

lazy_static! {
    static ref HEADER_LINKS_PATTERN: Regex =
        RegexBuilder::new(r#"<([^>]+)>; \s* rel \s* = \s* "next""#)
            .ignore_whitespace(true)
            .build()
            .expect("header links regex should compile");
}

impl HeaderLinks {
    /// Extract pagination links from the `Link` headers of a response.
    ///
    /// Headers that are not valid strings or that do not parse as URLs are ignored.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut next = None;

        for value in headers.get_all(reqwest::header::LINK) {
            let value = match value.to_str() {
                Ok(v) => v,
                Err(_) => continue,
            };

            let capture = match HEADER_LINKS_PATTERN.captures(value).and_then(|c| c.get(1)) {
                Some(v) => v,
                None => continue,
            };

            if let Ok(url) = Url::parse(capture.as_str()) {
                next = Some(url);
            }
        }

        HeaderLinks { next }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqwest::header::{HeaderValue, LINK};

    #[test]
    fn next_link_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                r#"<https://api.github.com/repositories/1/compare/a...b?page=2>; rel="next", <https://api.github.com/repositories/1/compare/a...b?page=5>; rel="last""#,
            ),
        );
        let links = HeaderLinks::from_headers(&headers);
        assert_eq!(
            links.next.map(|u| u.to_string()),
            Some("https://api.github.com/repositories/1/compare/a...b?page=2".to_string())
        );
    }

    #[test]
    fn no_next_link_on_last_page() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                r#"<https://api.github.com/repositories/1/compare/a...b?page=1>; rel="prev""#,
            ),
        );
        assert!(HeaderLinks::from_headers(&headers).next.is_none());
        assert!(HeaderLinks::from_headers(&HeaderMap::new()).next.is_none());
    }
}

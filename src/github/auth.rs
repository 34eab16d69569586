use secrecy::SecretString;

// -------------------------------------------------------------------------------------------------
// Auth
// -------------------------------------------------------------------------------------------------
/// Supported forms of authentication
pub enum Auth {
    /// No authentication
    Unauthenticated,

    /// Authenticate with a bearer token, such as the `GITHUB_TOKEN` given to a CI job
    Token(SecretString),
}

impl Auth {
    /// Use the given token if there is one, otherwise unauthenticated access.
    pub fn from_optional_token(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.is_empty() => Auth::Token(SecretString::new(token)),
            _ => Auth::Unauthenticated,
        }
    }
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Auth::Unauthenticated => write!(f, "Unauthenticated"),
            Auth::Token(_) => write!(f, "Token(<redacted>)"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_token_is_unauthenticated() {
        assert!(matches!(Auth::from_optional_token(None), Auth::Unauthenticated));
        assert!(matches!(Auth::from_optional_token(Some(String::new())), Auth::Unauthenticated));
        assert!(matches!(Auth::from_optional_token(Some("ghp_x".into())), Auth::Token(_)));
    }

    #[test]
    fn debug_does_not_leak_token() {
        let auth = Auth::from_optional_token(Some("ghp_supersecret".into()));
        assert_eq!(format!("{auth:?}"), "Token(<redacted>)");
    }
}

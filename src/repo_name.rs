use std::str::FromStr;

// -------------------------------------------------------------------------------------------------
// RepoName
// -------------------------------------------------------------------------------------------------
/// A GitHub repository named as `owner/name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoName {
    pub owner: String,
    pub name: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RepoNameError(String);

impl std::fmt::Display for RepoNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid repository {:?}: expected the form OWNER/NAME", self.0)
    }
}

impl std::error::Error for RepoNameError {}

impl FromStr for RepoName {
    type Err = RepoNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || RepoNameError(s.to_string());
        let (owner, name) = s.trim().split_once('/').ok_or_else(err)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(err());
        }
        Ok(RepoName {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for RepoName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

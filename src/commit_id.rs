// -------------------------------------------------------------------------------------------------
// CommitId
// -------------------------------------------------------------------------------------------------
/// An abbreviated or full hexadecimal commit hash, between 5 and 40 characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitId(String);

impl CommitId {
    pub const MIN_LEN: usize = 5;
    pub const MAX_LEN: usize = 40;

    /// Create a `CommitId`, returning `None` if `hash` is not 5 to 40 hex digits.
    pub fn new(hash: &str) -> Option<Self> {
        let len_ok = (Self::MIN_LEN..=Self::MAX_LEN).contains(&hash.len());
        if len_ok && hash.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(CommitId(hash.to_ascii_lowercase()))
        } else {
            None
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A commit that changed a tracked path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRef {
    pub oid: String,
    pub short_oid: String,
    pub author: AuthorInfo,
    pub message: String,
    pub summary: String,
    /// Committer date in the committer's own offset
    pub date: NaiveDate,
    /// Committer time of day, in seconds since midnight
    pub time: u32,
    pub timestamp: i64,
    pub parents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub name: String,
    pub email: String,
}

impl std::fmt::Display for AuthorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

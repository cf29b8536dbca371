use chrono::{DateTime, Utc};
use serde::Serialize;
use smallvec::SmallVec;

/// Length of the abbreviated hash shown next to each commit
pub const SHORT_HASH_LEN: usize = 8;

/// A laid-out commit in the graph
///
/// Parents and children are hashes, never references to other nodes.
/// Look them up through [`GraphModel::node`](super::GraphModel::node).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitNode {
    /// Full commit hash
    pub hash: String,
    /// First `SHORT_HASH_LEN` characters of the hash
    pub short_hash: String,
    /// First line of the commit message
    pub message: String,
    /// Author name
    pub author: String,
    /// Author timestamp
    pub timestamp: DateTime<Utc>,
    /// Parent hashes, first parent first
    pub parents: SmallVec<[String; 2]>,
    /// Hashes of collected commits naming this one as a parent
    pub children: Vec<String>,
    /// Lane index
    pub column: usize,
    /// Sequence index, 0 is the most recent
    pub row: usize,
    /// Branch names pointing at this commit
    pub branches: Vec<String>,
    /// Tag names pointing at this commit
    pub tags: Vec<String>,
    /// Whether HEAD resolves to this commit
    pub is_head: bool,
}

impl CommitNode {
    /// Check if this is a root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Check if this is a merge commit (multiple parents)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Check if any branch or tag points here
    pub fn is_decorated(&self) -> bool {
        self.is_head || !self.branches.is_empty() || !self.tags.is_empty()
    }
}

/// Abbreviate a hash to `SHORT_HASH_LEN` characters
pub fn short_hash(hash: &str) -> String {
    hash.chars().take(SHORT_HASH_LEN).collect()
}

/// First line of a commit message, without a trailing carriage return
pub fn summary(message: &str) -> String {
    message
        .lines()
        .next()
        .unwrap_or("")
        .trim_end_matches('\r')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hash_takes_prefix() {
        assert_eq!(short_hash("0123456789abcdef"), "01234567");
        assert_eq!(short_hash("abc"), "abc");
    }

    #[test]
    fn summary_keeps_first_line() {
        assert_eq!(summary("Fix parser\n\nLonger body"), "Fix parser");
        assert_eq!(summary("Windows line\r\nmore"), "Windows line");
        assert_eq!(summary(""), "");
    }
}

use super::{Author, Commit, CommitSource, RefSource};
use crate::error::GraphError;
use std::collections::{BTreeMap, HashMap};

/// Commit and ref store held entirely in memory
///
/// Branch and tag names are kept sorted so enumeration is deterministic.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    commits: HashMap<String, Commit>,
    branches: BTreeMap<String, String>,
    tags: BTreeMap<String, String>,
    head: Option<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit
    pub fn add_commit(&mut self, commit: Commit) {
        self.commits.insert(commit.hash.clone(), commit);
    }

    /// Add a commit built from its parts, authored by "Test"
    pub fn commit(&mut self, hash: &str, parents: &[&str], timestamp: i64, message: &str) -> &mut Self {
        self.add_commit(Commit {
            hash: hash.to_string(),
            parent_hashes: parents.iter().map(|p| p.to_string()).collect(),
            author: Author {
                name: "Test".to_string(),
                email: "test@example.com".to_string(),
                timestamp,
            },
            message: message.to_string(),
        });
        self
    }

    /// Point a branch at a hash. The hash does not need to exist.
    pub fn branch(&mut self, name: &str, hash: &str) -> &mut Self {
        self.branches.insert(name.to_string(), hash.to_string());
        self
    }

    /// Point a tag at a hash
    pub fn tag(&mut self, name: &str, hash: &str) -> &mut Self {
        self.tags.insert(name.to_string(), hash.to_string());
        self
    }

    /// Point HEAD at a hash
    pub fn set_head(&mut self, hash: &str) -> &mut Self {
        self.head = Some(hash.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

impl CommitSource for MemorySource {
    fn read_commit(&self, hash: &str) -> Result<Commit, GraphError> {
        self.commits
            .get(hash)
            .cloned()
            .ok_or_else(|| GraphError::CommitNotFound(hash.to_string()))
    }
}

impl RefSource for MemorySource {
    fn resolve_ref(&self, name: &str) -> Option<String> {
        if name == "HEAD" {
            return self.head.clone();
        }
        self.branches
            .get(name)
            .or_else(|| self.tags.get(name))
            .cloned()
    }

    fn branch_names(&self) -> Vec<String> {
        self.branches.keys().cloned().collect()
    }

    fn tag_names(&self) -> Vec<String> {
        self.tags.keys().cloned().collect()
    }
}

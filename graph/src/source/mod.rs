//! Interfaces to the object and ref store the graph is built from.
//!
//! The store itself lives outside this crate. [`GitWalker`](crate::GitWalker)
//! adapts a git2 repository and [`MemorySource`] keeps everything in maps.

pub mod memory;

pub use memory::MemorySource;

use crate::error::GraphError;
use smallvec::SmallVec;

/// Commit author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
    /// Seconds since the Unix epoch
    pub timestamp: i64,
}

/// A commit as read from the object store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    /// Parent hashes, first parent first
    pub parent_hashes: SmallVec<[String; 2]>,
    pub author: Author,
    pub message: String,
}

/// Reads commits by hash
pub trait CommitSource {
    /// Read a single commit. Any error means the object is missing.
    fn read_commit(&self, hash: &str) -> Result<Commit, GraphError>;
}

/// Resolves ref names and enumerates branches and tags
pub trait RefSource {
    /// Resolve a ref name to a commit hash
    fn resolve_ref(&self, name: &str) -> Option<String>;

    /// All branch names
    fn branch_names(&self) -> Vec<String>;

    /// All tag names
    fn tag_names(&self) -> Vec<String>;

    /// Hash HEAD currently resolves to
    fn head(&self) -> Option<String> {
        self.resolve_ref("HEAD")
    }
}

impl<T: CommitSource + ?Sized> CommitSource for &T {
    fn read_commit(&self, hash: &str) -> Result<Commit, GraphError> {
        (**self).read_commit(hash)
    }
}

impl<T: RefSource + ?Sized> RefSource for &T {
    fn resolve_ref(&self, name: &str) -> Option<String> {
        (**self).resolve_ref(name)
    }

    fn branch_names(&self) -> Vec<String> {
        (**self).branch_names()
    }

    fn tag_names(&self) -> Vec<String> {
        (**self).tag_names()
    }

    fn head(&self) -> Option<String> {
        (**self).head()
    }
}

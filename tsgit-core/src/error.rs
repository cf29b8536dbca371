use std::path::PathBuf;
use thiserror::Error;

/// Errors from conflict resolution and write-back
#[derive(Debug, Error)]
pub enum ConflictError {
    #[error("no conflict hunk with id {0}")]
    UnknownHunk(usize),

    #[error("{path} still has {remaining} unresolved conflict(s)")]
    Unresolved { path: String, remaining: usize },

    #[error("path is outside the working directory: {}", .0.display())]
    NotInWorkdir(PathBuf),

    #[error("repository has no working directory")]
    BareRepository,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Git(#[from] git2::Error),
}

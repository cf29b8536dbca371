use thiserror::Error;

/// Errors raised by commit and ref sources
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("commit not found: {0}")]
    CommitNotFound(String),

    #[error("invalid commit hash: {0}")]
    InvalidHash(String),

    #[error(transparent)]
    Git(#[from] git2::Error),
}

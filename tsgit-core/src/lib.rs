pub mod conflict;
pub mod error;
pub mod merge;

pub use conflict::{parse, ConflictFile, ConflictHunk, Line, Resolution};
pub use error::ConflictError;
pub use merge::MergeOps;

pub mod core;
pub mod decor;
pub mod error;
pub mod git_backend;
pub mod layout;
pub mod render;
pub mod source;

pub use core::{CommitNode, EdgeType, GraphEdge, GraphModel};
pub use decor::RefDecorator;
pub use error::GraphError;
pub use git_backend::GitWalker;
pub use layout::{ActiveColumns, BuildOptions, CommitOrder, GraphBuilder, DEFAULT_MAX_COMMITS};
pub use render::{CharsetProfile, TextRenderer};
pub use source::{Author, Commit, CommitSource, MemorySource, RefSource};

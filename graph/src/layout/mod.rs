pub mod builder;
pub mod columns;

pub use builder::{BuildOptions, CommitOrder, GraphBuilder, DEFAULT_MAX_COMMITS};
pub use columns::ActiveColumns;

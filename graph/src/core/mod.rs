pub mod node;
pub mod edge;
pub mod model;

pub use node::CommitNode;
pub use edge::{GraphEdge, EdgeType};
pub use model::{GraphModel, GraphStats};

use serde::Serialize;

/// An edge from a commit to one of its parents
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GraphEdge {
    /// Child commit hash
    pub from: String,
    /// Parent commit hash
    pub to: String,
    /// Column of the child
    pub from_column: usize,
    /// Column reserved for the parent
    pub to_column: usize,
    /// Edge type
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// Connects a commit to its first parent
    Direct,
    /// Connects a commit to any additional parent
    Merge,
}

impl EdgeType {
    /// Edge type for the parent at `parent_index`
    pub fn for_parent(parent_index: usize) -> Self {
        if parent_index == 0 {
            EdgeType::Direct
        } else {
            EdgeType::Merge
        }
    }
}

impl GraphEdge {
    pub fn new(
        from: String,
        to: String,
        from_column: usize,
        to_column: usize,
        edge_type: EdgeType,
    ) -> Self {
        Self {
            from,
            to,
            from_column,
            to_column,
            edge_type,
        }
    }

    pub fn is_merge(&self) -> bool {
        self.edge_type == EdgeType::Merge
    }
}

use super::{edge::GraphEdge, node::CommitNode};
use serde::Serialize;
use std::collections::HashMap;

/// Laid-out commit graph handed to renderers
///
/// Frozen once built: nodes are ordered by row and every parent/child
/// link is resolved by hash through [`GraphModel::node`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphModel {
    /// Nodes ordered by row, most recent first
    pub nodes: Vec<CommitNode>,
    /// Edges from children to parents
    pub edges: Vec<GraphEdge>,
    /// One more than the highest column assigned during layout
    pub max_columns: usize,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl GraphModel {
    pub fn new(nodes: Vec<CommitNode>, edges: Vec<GraphEdge>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(row, node)| (node.hash.clone(), row))
            .collect();

        let max_columns = nodes
            .iter()
            .map(|node| node.column)
            .chain(edges.iter().map(|edge| edge.to_column))
            .max()
            .map_or(0, |column| column + 1);

        Self {
            nodes,
            edges,
            max_columns,
            index,
        }
    }

    /// Look up a node by commit hash
    pub fn node(&self, hash: &str) -> Option<&CommitNode> {
        self.row_of(hash).map(|row| &self.nodes[row])
    }

    /// Row of the node with the given hash
    pub fn row_of(&self, hash: &str) -> Option<usize> {
        self.index.get(hash).copied()
    }

    /// Edges leaving the given commit, in parent order
    pub fn edges_from<'a>(&'a self, hash: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |edge| edge.from == hash)
    }

    /// Parents of a commit that are present in the graph
    pub fn parents_of(&self, hash: &str) -> Vec<&CommitNode> {
        self.node(hash)
            .map(|node| node.parents.iter().filter_map(|p| self.node(p)).collect())
            .unwrap_or_default()
    }

    /// Children of a commit that are present in the graph
    pub fn children_of(&self, hash: &str) -> Vec<&CommitNode> {
        self.node(hash)
            .map(|node| node.children.iter().filter_map(|c| self.node(c)).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            total_commits: self.nodes.len(),
            total_edges: self.edges.len(),
            merge_commits: self.nodes.iter().filter(|n| n.is_merge()).count(),
            root_commits: self.nodes.iter().filter(|n| n.is_root()).count(),
            max_columns: self.max_columns,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub total_commits: usize,
    pub total_edges: usize,
    pub merge_commits: usize,
    pub root_commits: usize,
    pub max_columns: usize,
}

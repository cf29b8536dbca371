use crate::core::node::{short_hash, summary};
use crate::core::{CommitNode, EdgeType, GraphEdge, GraphModel};
use crate::decor::RefDecorator;
use crate::layout::ActiveColumns;
use crate::source::{Commit, CommitSource, RefSource};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use tracing::debug;

/// Default number of commits collected per build
pub const DEFAULT_MAX_COMMITS: usize = 50;

/// Order in which collected commits are assigned rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitOrder {
    /// Newest author timestamp first. Clock skew can place a parent
    /// above its child.
    #[default]
    Timestamp,
    /// Children always above parents, newest first among the rest
    Topological,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    pub max_commits: usize,
    pub order: CommitOrder,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_commits: DEFAULT_MAX_COMMITS,
            order: CommitOrder::default(),
        }
    }
}

/// Builds a [`GraphModel`] from the commits reachable from branch tips
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    options: BuildOptions,
}

impl GraphBuilder {
    pub fn new(max_commits: usize) -> Self {
        Self::with_options(BuildOptions {
            max_commits,
            ..BuildOptions::default()
        })
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    /// Collect, order and lay out commits.
    ///
    /// Missing objects and dangling refs are skipped, never fatal.
    pub fn build<S, R>(&self, source: &S, refs: &R) -> GraphModel
    where
        S: CommitSource + ?Sized,
        R: RefSource + ?Sized,
    {
        let decorator = RefDecorator::from_refs(refs);
        let (commits, unreadable) = self.collect(source, decorator.branch_heads());
        let commits = match self.options.order {
            CommitOrder::Timestamp => sort_by_timestamp(commits),
            CommitOrder::Topological => sort_topologically(commits),
        };

        let model = layout(commits, &unreadable, &decorator);
        debug!(
            commits = model.node_count(),
            edges = model.edge_count(),
            columns = model.max_columns,
            "built commit graph"
        );
        model
    }

    /// Breadth-first walk over parent links from the given tips.
    ///
    /// Also returns the hashes that failed to read. Parents left unvisited
    /// by the `max_commits` cap are in neither set.
    fn collect<S>(&self, source: &S, tips: &[String]) -> (Vec<Commit>, HashSet<String>)
    where
        S: CommitSource + ?Sized,
    {
        let mut collected = Vec::new();
        let mut unreadable = HashSet::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut frontier: VecDeque<String> = VecDeque::new();

        for tip in tips {
            if seen.insert(tip.clone()) {
                frontier.push_back(tip.clone());
            }
        }

        while collected.len() < self.options.max_commits {
            let Some(hash) = frontier.pop_front() else {
                break;
            };

            match source.read_commit(&hash) {
                Ok(commit) => {
                    for parent in &commit.parent_hashes {
                        if seen.insert(parent.clone()) {
                            frontier.push_back(parent.clone());
                        }
                    }
                    collected.push(commit);
                }
                Err(err) => {
                    debug!(%hash, error = %err, "skipping unreadable commit");
                    unreadable.insert(hash);
                }
            }
        }

        (collected, unreadable)
    }
}

/// Stable sort, newest first. Ties keep discovery order.
fn sort_by_timestamp(mut commits: Vec<Commit>) -> Vec<Commit> {
    commits.sort_by(|a, b| b.author.timestamp.cmp(&a.author.timestamp));
    commits
}

/// Emit a commit only once every collected child has been emitted
fn sort_topologically(commits: Vec<Commit>) -> Vec<Commit> {
    let index: HashMap<&str, usize> = commits
        .iter()
        .enumerate()
        .map(|(i, c)| (c.hash.as_str(), i))
        .collect();

    let mut pending_children = vec![0usize; commits.len()];
    for commit in &commits {
        for parent in distinct(&commit.parent_hashes) {
            if let Some(&p) = index.get(parent) {
                pending_children[p] += 1;
            }
        }
    }

    // Max-heap on timestamp, earliest discovery wins ties
    let mut ready: BinaryHeap<(i64, Reverse<usize>)> = commits
        .iter()
        .enumerate()
        .filter(|(i, _)| pending_children[*i] == 0)
        .map(|(i, c)| (c.author.timestamp, Reverse(i)))
        .collect();

    let mut order = Vec::with_capacity(commits.len());
    let mut emitted = vec![false; commits.len()];
    while let Some((_, Reverse(i))) = ready.pop() {
        order.push(i);
        emitted[i] = true;
        for parent in distinct(&commits[i].parent_hashes) {
            if let Some(&p) = index.get(parent) {
                pending_children[p] -= 1;
                if pending_children[p] == 0 {
                    ready.push((commits[p].author.timestamp, Reverse(p)));
                }
            }
        }
    }

    // Only reachable with a cyclic history; fall back to timestamps
    if order.len() < commits.len() {
        let mut rest: Vec<usize> = (0..commits.len()).filter(|i| !emitted[*i]).collect();
        rest.sort_by_key(|&i| Reverse(commits[i].author.timestamp));
        order.extend(rest);
    }

    drop(index);
    let mut slots: Vec<Option<Commit>> = commits.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}

fn distinct(parents: &[String]) -> impl Iterator<Item = &str> {
    parents
        .iter()
        .enumerate()
        .filter(move |(i, p)| !parents[..*i].contains(*p))
        .map(|(_, p)| p.as_str())
}

/// Assign columns walking the ordered commits once.
///
/// Parents cut off by the commit cap still get an edge and keep their
/// column reserved, so the lane runs past the last row.
fn layout(
    commits: Vec<Commit>,
    unreadable: &HashSet<String>,
    decorator: &RefDecorator,
) -> GraphModel {
    let rows: HashMap<&str, usize> = commits
        .iter()
        .enumerate()
        .map(|(row, c)| (c.hash.as_str(), row))
        .collect();

    let mut children: HashMap<&str, Vec<String>> = HashMap::new();
    for commit in &commits {
        for parent in distinct(&commit.parent_hashes) {
            if rows.contains_key(parent) {
                children.entry(parent).or_default().push(commit.hash.clone());
            }
        }
    }

    let mut columns = ActiveColumns::new();
    let mut placed: HashMap<&str, usize> = HashMap::new();
    let mut nodes = Vec::with_capacity(commits.len());
    let mut edges = Vec::new();

    for (row, commit) in commits.iter().enumerate() {
        let hash = commit.hash.as_str();
        let column = match columns.position(hash) {
            Some(column) => column,
            None => columns.allocate(hash),
        };
        columns.release(hash);
        placed.insert(hash, column);

        for (i, parent) in commit.parent_hashes.iter().enumerate() {
            if unreadable.contains(parent) {
                continue;
            }

            let placed_column = placed.get(parent.as_str()).copied();
            let to_column = if i == 0 {
                // A parent laid out above its child (clock skew) needs no lane
                // below this row
                if placed_column.is_none() {
                    columns.reserve(column, parent);
                }
                column
            } else if let Some(parent_column) = placed_column {
                parent_column
            } else {
                match columns.position(parent) {
                    Some(reserved) => reserved,
                    None => columns.allocate(parent),
                }
            };

            edges.push(GraphEdge::new(
                commit.hash.clone(),
                parent.clone(),
                column,
                to_column,
                EdgeType::for_parent(i),
            ));
        }

        let decoration = decorator.decorate(hash);
        nodes.push(CommitNode {
            hash: commit.hash.clone(),
            short_hash: short_hash(&commit.hash),
            message: summary(&commit.message),
            author: commit.author.name.clone(),
            timestamp: Utc
                .timestamp_opt(commit.author.timestamp, 0)
                .single()
                .unwrap_or_default(),
            parents: commit.parent_hashes.clone(),
            children: children.remove(hash).unwrap_or_default(),
            column,
            row,
            branches: decoration.branches,
            tags: decoration.tags,
            is_head: decoration.is_head,
        });
    }

    GraphModel::new(nodes, edges)
}

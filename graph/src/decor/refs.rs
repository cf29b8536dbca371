use crate::source::RefSource;
use std::collections::HashMap;
use tracing::debug;

/// Names attached to a single commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoration {
    pub is_head: bool,
    pub branches: Vec<String>,
    pub tags: Vec<String>,
}

/// Resolved branch, tag and HEAD names, indexed by commit hash
#[derive(Debug, Clone, Default)]
pub struct RefDecorator {
    head: Option<String>,
    /// Resolved branch tips in enumeration order, deduplicated
    branch_heads: Vec<String>,
    branches: HashMap<String, Vec<String>>,
    tags: HashMap<String, Vec<String>>,
}

impl RefDecorator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every branch and tag once. Dangling refs are skipped.
    pub fn from_refs<R: RefSource + ?Sized>(refs: &R) -> Self {
        let mut decorator = Self::new();

        for name in refs.branch_names() {
            match refs.resolve_ref(&name) {
                Some(hash) => decorator.add_branch(hash, name),
                None => debug!(branch = %name, "skipping dangling branch"),
            }
        }

        for name in refs.tag_names() {
            match refs.resolve_ref(&name) {
                Some(hash) => decorator.add_tag(hash, name),
                None => debug!(tag = %name, "skipping dangling tag"),
            }
        }

        if let Some(head) = refs.head() {
            decorator.set_head(head);
        }

        decorator
    }

    pub fn set_head(&mut self, commit_id: String) {
        self.head = Some(commit_id);
    }

    pub fn add_branch(&mut self, commit_id: String, branch: String) {
        if !self.branch_heads.contains(&commit_id) {
            self.branch_heads.push(commit_id.clone());
        }
        self.branches.entry(commit_id).or_default().push(branch);
    }

    pub fn add_tag(&mut self, commit_id: String, tag: String) {
        self.tags.entry(commit_id).or_default().push(tag);
    }

    pub fn head(&self) -> Option<&str> {
        self.head.as_deref()
    }

    /// Distinct commits pointed at by branches
    pub fn branch_heads(&self) -> &[String] {
        &self.branch_heads
    }

    pub fn decorate(&self, commit_id: &str) -> Decoration {
        Decoration {
            is_head: self.head.as_deref() == Some(commit_id),
            branches: self.branches.get(commit_id).cloned().unwrap_or_default(),
            tags: self.tags.get(commit_id).cloned().unwrap_or_default(),
        }
    }
}

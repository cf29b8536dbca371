use crate::core::GraphModel;
use crate::error::GraphError;
use crate::layout::{BuildOptions, GraphBuilder};
use crate::source::{Author, Commit, CommitSource, RefSource};
use anyhow::{Context, Result};
use git2::{BranchType, Oid, Repository};
use std::path::Path;
use tracing::debug;

/// Commit and ref source backed by a git2 repository
pub struct GitWalker {
    repo: Repository,
}

impl GitWalker {
    pub fn new(repo_path: Option<&Path>) -> Result<Self> {
        let repo = match repo_path {
            Some(path) => Repository::discover(path),
            None => Repository::open_from_env(),
        }
        .context("Failed to open repository")?;

        Ok(Self { repo })
    }

    pub fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Build the commit graph for this repository
    pub fn into_graph(&self, options: BuildOptions) -> GraphModel {
        GraphBuilder::with_options(options).build(self, self)
    }

    fn peel_reference(&self, full_name: &str) -> Option<String> {
        let reference = self.repo.find_reference(full_name).ok()?;
        reference
            .peel_to_commit()
            .map(|commit| commit.id().to_string())
            .map_err(|err| debug!(reference = full_name, error = %err, "ref does not peel to a commit"))
            .ok()
    }
}

impl CommitSource for GitWalker {
    fn read_commit(&self, hash: &str) -> Result<Commit, GraphError> {
        let oid = Oid::from_str(hash).map_err(|_| GraphError::InvalidHash(hash.to_string()))?;
        let commit = self.repo.find_commit(oid).map_err(|err| {
            if err.code() == git2::ErrorCode::NotFound {
                GraphError::CommitNotFound(hash.to_string())
            } else {
                GraphError::Git(err)
            }
        })?;

        let author = commit.author();
        Ok(Commit {
            hash: commit.id().to_string(),
            parent_hashes: commit.parent_ids().map(|oid| oid.to_string()).collect(),
            author: Author {
                name: author.name().unwrap_or("Unknown").to_string(),
                email: author.email().unwrap_or("").to_string(),
                timestamp: author.when().seconds(),
            },
            message: commit.message().unwrap_or("").to_string(),
        })
    }
}

impl RefSource for GitWalker {
    fn resolve_ref(&self, name: &str) -> Option<String> {
        if name == "HEAD" {
            return self
                .repo
                .head()
                .ok()
                .and_then(|head| head.peel_to_commit().ok())
                .map(|commit| commit.id().to_string());
        }

        self.peel_reference(&format!("refs/heads/{}", name))
            .or_else(|| self.peel_reference(&format!("refs/tags/{}", name)))
            .or_else(|| {
                self.repo
                    .revparse_single(name)
                    .and_then(|object| object.peel_to_commit())
                    .map(|commit| commit.id().to_string())
                    .ok()
            })
    }

    fn branch_names(&self) -> Vec<String> {
        let branches = match self.repo.branches(Some(BranchType::Local)) {
            Ok(branches) => branches,
            Err(err) => {
                debug!(error = %err, "failed to list branches");
                return Vec::new();
            }
        };

        branches
            .filter_map(|branch| branch.ok())
            .filter_map(|(branch, _)| branch.name().ok().flatten().map(str::to_string))
            .collect()
    }

    fn tag_names(&self) -> Vec<String> {
        match self.repo.tag_names(None) {
            Ok(names) => names.iter().flatten().map(str::to_string).collect(),
            Err(err) => {
                debug!(error = %err, "failed to list tags");
                Vec::new()
            }
        }
    }
}

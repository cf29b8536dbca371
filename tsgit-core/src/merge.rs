use crate::conflict::{parse, ConflictFile};
use crate::error::ConflictError;
use git2::Repository as Git2Repository;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Conflict discovery and write-back for a repository's working tree
pub struct MergeOps {
    repo: Git2Repository,
}

impl MergeOps {
    pub fn open<P: AsRef<Path>>(repo_path: P) -> Result<Self, ConflictError> {
        let repo = Git2Repository::discover(repo_path)?;
        Ok(MergeOps { repo })
    }

    pub fn workdir(&self) -> Result<&Path, ConflictError> {
        self.repo.workdir().ok_or(ConflictError::BareRepository)
    }

    /// Whether a merge is currently in progress
    pub fn is_merging(&self) -> bool {
        self.repo.state() == git2::RepositoryState::Merge
    }

    /// Get list of conflicted files
    pub fn conflicted_paths(&self) -> Result<Vec<String>, ConflictError> {
        let mut conflicts = Vec::new();
        let index = self.repo.index()?;

        for conflict in index.conflicts()? {
            let entry = conflict?;
            let side = entry.our.or(entry.their).or(entry.ancestor);
            if let Some(side) = side {
                let path = String::from_utf8_lossy(&side.path).into_owned();
                if !conflicts.contains(&path) {
                    conflicts.push(path);
                }
            }
        }

        debug!(count = conflicts.len(), "listed conflicted paths");
        Ok(conflicts)
    }

    /// Read a working-tree file and parse its conflict markers
    pub fn load_conflict<P: AsRef<Path>>(&self, path: P) -> Result<ConflictFile, ConflictError> {
        let relative = self.relative_path(path.as_ref())?;
        let content = fs::read_to_string(self.workdir()?.join(&relative))?;
        let file = parse(relative.to_string_lossy(), &content);

        debug!(
            path = %file.path,
            hunks = file.hunks().len(),
            "loaded conflicted file"
        );
        Ok(file)
    }

    /// Write the resolved text back to the working tree and stage it.
    ///
    /// Fails with [`ConflictError::Unresolved`] while any hunk is open.
    /// A terminal newline present in the original content is restored.
    pub fn write_resolution(&self, file: &ConflictFile) -> Result<PathBuf, ConflictError> {
        let Some(mut content) = file.apply() else {
            let remaining = file.unresolved_count();
            warn!(path = %file.path, remaining, "refusing to write unresolved file");
            return Err(ConflictError::Unresolved {
                path: file.path.clone(),
                remaining,
            });
        };

        if file.trailing_newline() {
            content.push('\n');
        }

        let relative = self.relative_path(Path::new(&file.path))?;
        let target = self.workdir()?.join(&relative);
        fs::write(&target, content)?;

        let mut index = self.repo.index()?;
        index.add_path(&relative)?;
        index.write()?;

        info!(path = %file.path, hunks = file.hunks().len(), "wrote resolved file");
        Ok(target)
    }

    /// Path relative to the working directory
    fn relative_path(&self, path: &Path) -> Result<PathBuf, ConflictError> {
        let relative = if path.is_absolute() {
            let workdir = self.workdir()?;
            let workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());
            let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
            path.strip_prefix(&workdir)
                .map(Path::to_path_buf)
                .map_err(|_| ConflictError::NotInWorkdir(path.clone()))?
        } else {
            path.to_path_buf()
        };

        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
        {
            return Err(ConflictError::NotInWorkdir(relative));
        }

        Ok(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::Resolution;
    use anyhow::Result;
    use git2::Signature;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const CONFLICTED: &str = "a\n<<<<<<< HEAD\nmine\n=======\ntheirs\n>>>>>>> branch\nb\n";

    fn create_test_repo() -> Result<(TempDir, Git2Repository)> {
        let dir = TempDir::new()?;
        let repo = Git2Repository::init(dir.path())?;

        let mut config = repo.config()?;
        config.set_str("user.name", "Test User")?;
        config.set_str("user.email", "test@example.com")?;

        Ok((dir, repo))
    }

    fn commit_file(
        repo: &Git2Repository,
        dir: &Path,
        content: &str,
        parents: &[&git2::Commit],
        update_ref: Option<&str>,
    ) -> Result<git2::Oid> {
        fs::write(dir.join("file.txt"), content)?;
        let mut index = repo.index()?;
        index.add_path(Path::new("file.txt"))?;
        index.write()?;
        let tree = repo.find_tree(index.write_tree()?)?;
        let sig = Signature::now("Test User", "test@example.com")?;
        Ok(repo.commit(update_ref, &sig, &sig, content, &tree, parents)?)
    }

    #[test]
    fn test_clean_repository_has_no_conflicts() -> Result<()> {
        let (dir, repo) = create_test_repo()?;
        commit_file(&repo, dir.path(), "base\n", &[], Some("HEAD"))?;

        let ops = MergeOps::open(dir.path())?;
        assert!(ops.conflicted_paths()?.is_empty());
        assert!(!ops.is_merging());

        Ok(())
    }

    #[test]
    fn test_write_resolution_stages_file() -> Result<()> {
        let (dir, _repo) = create_test_repo()?;
        fs::write(dir.path().join("notes.txt"), CONFLICTED)?;

        let ops = MergeOps::open(dir.path())?;
        let mut file = ops.load_conflict("notes.txt")?;
        assert_eq!(file.hunks().len(), 1);

        file.resolve(0, Resolution::Theirs)?;
        let written = ops.write_resolution(&file)?;

        assert_eq!(fs::read_to_string(&written)?, "a\ntheirs\nb\n");
        let index = ops.repo.index()?;
        assert!(index.get_path(Path::new("notes.txt"), 0).is_some());

        Ok(())
    }

    #[test]
    fn test_unresolved_file_is_not_written() -> Result<()> {
        let (dir, _repo) = create_test_repo()?;
        fs::write(dir.path().join("notes.txt"), CONFLICTED)?;

        let ops = MergeOps::open(dir.path())?;
        let file = ops.load_conflict(dir.path().join("notes.txt"))?;

        let err = ops.write_resolution(&file).unwrap_err();
        assert!(matches!(err, ConflictError::Unresolved { remaining: 1, .. }));
        assert_eq!(fs::read_to_string(dir.path().join("notes.txt"))?, CONFLICTED);

        Ok(())
    }

    #[test]
    fn test_paths_outside_workdir_are_rejected() -> Result<()> {
        let (dir, _repo) = create_test_repo()?;
        let ops = MergeOps::open(dir.path())?;

        assert!(matches!(
            ops.load_conflict("../escape.txt"),
            Err(ConflictError::NotInWorkdir(_))
        ));

        Ok(())
    }

    #[test]
    fn test_real_merge_conflict() -> Result<()> {
        let (dir, repo) = create_test_repo()?;

        let base_oid = commit_file(&repo, dir.path(), "shared\n", &[], Some("HEAD"))?;
        let base = repo.find_commit(base_oid)?;
        let other_oid = commit_file(&repo, dir.path(), "theirs\n", &[&base], None)?;
        commit_file(&repo, dir.path(), "ours\n", &[&base], Some("HEAD"))?;

        let annotated = repo.find_annotated_commit(other_oid)?;
        repo.merge(&[&annotated], None, None)?;

        let ops = MergeOps::open(dir.path())?;
        assert!(ops.is_merging());
        assert_eq!(ops.conflicted_paths()?, vec!["file.txt".to_string()]);

        let mut file = ops.load_conflict("file.txt")?;
        assert_eq!(file.hunks().len(), 1);
        assert_eq!(file.hunks()[0].ours, vec!["ours".to_string()]);
        assert_eq!(file.hunks()[0].theirs, vec!["theirs".to_string()]);

        file.resolve_all(Resolution::Both);
        ops.write_resolution(&file)?;

        assert!(ops.conflicted_paths()?.is_empty());
        assert_eq!(fs::read_to_string(dir.path().join("file.txt"))?, "ours\ntheirs\n");

        Ok(())
    }
}

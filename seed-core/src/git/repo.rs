//! Working-copy state operations backed by libgit2

use std::path::{Path, PathBuf};

use git2::{build::CheckoutBuilder, BranchType, IndexAddOption, Repository, Signature};

use crate::{Error, Result};

/// A git working copy wrapper providing the bootstrap-specific operations
pub struct GitRepo {
    /// The underlying git2 repository
    repo: Repository,
    /// Path to the repository root
    root: PathBuf,
}

impl std::fmt::Debug for GitRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepo")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl GitRepo {
    /// Open the git repository at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let repo = Repository::open(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                Error::LocalGit(format!("Not a git repository: {}", path.display()))
            } else {
                Error::Git(e)
            }
        })?;

        let root = repo
            .workdir()
            .ok_or_else(|| Error::LocalGit("Bare repositories are not supported".to_string()))?
            .to_path_buf();

        Ok(Self { repo, root })
    }

    /// Get the repository root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Point the `origin` remote at `url`, creating it if absent
    ///
    /// Idempotent: an existing `origin` is rebound even if it currently
    /// points somewhere else.
    pub fn rebind_origin(&self, url: &str) -> Result<()> {
        if self.repo.find_remote("origin").is_ok() {
            self.repo.remote_set_url("origin", url)?;
            tracing::debug!(url = %url, "Rebound existing origin remote");
        } else {
            self.repo.remote("origin", url)?;
            tracing::debug!(url = %url, "Created origin remote");
        }
        Ok(())
    }

    /// Check out branch `name`, creating it if it does not exist locally
    ///
    /// A missing local branch is created from `origin/{name}` with upstream
    /// tracking when that remote ref exists, otherwise from the current
    /// HEAD commit.
    pub fn ensure_branch(&self, name: &str) -> Result<()> {
        if self.repo.find_branch(name, BranchType::Local).is_err() {
            let remote_ref = format!("refs/remotes/origin/{}", name);
            if let Ok(reference) = self.repo.find_reference(&remote_ref) {
                let commit = reference.peel_to_commit()?;
                let mut branch = self.repo.branch(name, &commit, false)?;
                branch.set_upstream(Some(&format!("origin/{}", name)))?;
                tracing::debug!(branch = %name, "Created local branch tracking origin");
            } else {
                let head = self.repo.head()?.peel_to_commit()?;
                self.repo.branch(name, &head, false)?;
                tracing::debug!(branch = %name, "Created local branch at HEAD");
            }
        }

        self.repo.set_head(&format!("refs/heads/{}", name))?;
        // Safe checkout: switching to a branch at the current HEAD keeps
        // uncommitted working-tree changes, like `git checkout -b`.
        self.repo
            .checkout_head(Some(CheckoutBuilder::new().safe()))?;
        Ok(())
    }

    /// Check whether the working tree has any changes, including untracked
    /// and deleted files.
    pub fn is_dirty(&self) -> Result<bool> {
        let mut options = git2::StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }

    /// Stage every change in the working tree and commit it
    ///
    /// Returns the new commit id. If a merge is in progress the merge head
    /// becomes a second parent and the merge state is cleaned up.
    pub fn stage_and_commit(&self, message: &str) -> Result<git2::Oid> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let signature = self.signature()?;
        let head = self.repo.head()?.peel_to_commit()?;

        let merge_head = self
            .repo
            .find_reference("MERGE_HEAD")
            .ok()
            .map(|r| r.peel_to_commit())
            .transpose()?;

        let mut parents = vec![&head];
        if let Some(ref commit) = merge_head {
            parents.push(commit);
        }

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        if merge_head.is_some() {
            self.repo.cleanup_state()?;
        }

        Ok(oid)
    }

    /// Stage and commit only if the working tree is dirty
    ///
    /// Returns `true` if a commit was made. A clean tree is a no-op
    /// success.
    pub fn commit_if_dirty(&self, message: &str) -> Result<bool> {
        if !self.is_dirty()? {
            tracing::debug!("Working tree is clean, nothing to commit");
            return Ok(false);
        }
        self.stage_and_commit(message)?;
        Ok(true)
    }

    fn signature(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(sig) => Ok(sig),
            // No user.name/user.email configured
            Err(_) => Ok(Signature::now("repo-seed", "repo-seed@localhost")?),
        }
    }

    /// Get access to the underlying git2 repository
    pub fn inner(&self) -> &Repository {
        &self.repo
    }
}

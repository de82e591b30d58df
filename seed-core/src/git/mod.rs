//! Local repository controller
//!
//! Drives the single working copy through the flow's states: clone,
//! remote rebind, branch checkout, metadata rewrite, commit, push, and
//! the unrelated-histories merge. Repository state goes through libgit2
//! (`repo`), network and merge-strategy operations go through the `git`
//! binary (`ops`).

pub mod ops;
pub mod repo;

use std::path::Path;

use tracing::info;

use crate::bootstrap::LocalGit;
use crate::{manifest, Result};

pub use repo::GitRepo;

/// `LocalGit` implementation over the real working copy
#[derive(Debug, Clone, Copy, Default)]
pub struct GitWorkingCopy;

impl LocalGit for GitWorkingCopy {
    fn clone_template(&self, url: &str, path: &Path) -> Result<()> {
        ops::clone_template(url, path)?;
        info!(url = %url, path = %path.display(), "Cloned template repository");
        Ok(())
    }

    fn rewrite_metadata(&self, path: &Path, name: &str, description: &str) -> Result<()> {
        manifest::rewrite_metadata(path, name, description)
    }

    fn rebind_origin(&self, path: &Path, url: &str) -> Result<()> {
        GitRepo::open(path)?.rebind_origin(url)
    }

    fn ensure_branch(&self, path: &Path, name: &str) -> Result<()> {
        GitRepo::open(path)?.ensure_branch(name)
    }

    fn stage_commit_push(
        &self,
        path: &Path,
        message: &str,
        refspec: &str,
        force: bool,
    ) -> Result<()> {
        let repo = GitRepo::open(path)?;
        if !repo.commit_if_dirty(message)? {
            info!("No changes to commit, skipping push");
            return Ok(());
        }

        ops::push(path, refspec, force)?;
        info!(refspec = %refspec, force, "Pushed changes");
        Ok(())
    }

    fn merge_unrelated(&self, path: &Path, target: &str, source: &str) -> Result<()> {
        ops::fetch_all(path)?;

        GitRepo::open(path)?.ensure_branch(target)?;
        ops::merge_theirs(path, source)?;

        // `-X theirs` normally commits the merge itself; pick up anything
        // it left behind.
        GitRepo::open(path)?.commit_if_dirty("Merge with unrelated histories resolved")?;

        ops::push(path, target, true)?;
        info!(target = %target, source = %source, "Merged and force-pushed");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::path::Path;

    use git2::{Oid, Repository, RepositoryInitOptions, Signature};

    pub fn init_repo(dir: &Path, initial_branch: &str) -> Repository {
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head(initial_branch);
        let repo = Repository::init_opts(dir, &opts).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "tester").unwrap();
        config.set_str("user.email", "tester@example.com").unwrap();
        repo
    }

    pub fn commit_file(repo: &Repository, name: &str, contents: &str, message: &str) -> Oid {
        let root = repo.workdir().unwrap();
        std::fs::write(root.join(name), contents).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();

        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let signature = Signature::now("tester", "tester@example.com").unwrap();

        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap()
    }

    pub fn blob_at(bare: &Repository, reference: &str, file: &str) -> String {
        let tree = bare
            .find_reference(reference)
            .unwrap()
            .peel_to_commit()
            .unwrap()
            .tree()
            .unwrap();
        let entry = tree.get_name(file).unwrap();
        let blob = entry.to_object(bare).unwrap().peel_to_blob().unwrap();
        String::from_utf8(blob.content().to_vec()).unwrap()
    }
}

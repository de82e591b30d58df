//! Git operations that shell out to the `git` binary
//!
//! Network transports (clone, fetch, push) and the merge-strategy option
//! the flow needs (`-X theirs` with unrelated histories) are not exposed
//! by libgit2 in a usable form, so these go through the CLI.

use std::path::Path;
use std::process::{Command, Output};

use crate::{Error, Result};

/// Clone the template repository into `path`
///
/// Fails if `path` already exists and is not an empty directory.
pub fn clone_template(url: &str, path: &Path) -> Result<()> {
    if path.exists() {
        let occupied = path
            .read_dir()
            .map_err(|e| Error::Clone(format!("Cannot read {}: {}", path.display(), e)))?
            .next()
            .is_some();
        if occupied {
            return Err(Error::Clone(format!(
                "Destination {} exists and is not empty",
                path.display()
            )));
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::Clone(format!("Failed to create {}: {}", parent.display(), e)))?;
    }

    let output = Command::new("git")
        .arg("clone")
        .arg(url)
        .arg(path)
        .output()
        .map_err(|e| Error::Clone(format!("Failed to run git clone: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);

        if stderr.contains("Authentication failed") || stderr.contains("Permission denied") {
            return Err(Error::Clone(format!(
                "Authentication failed for {}. Check your credentials or repository access.",
                url
            )));
        }

        if stderr.contains("Could not resolve host") || stderr.contains("unable to access") {
            return Err(Error::Clone(format!(
                "Network error cloning {}. Check your internet connection.",
                url
            )));
        }

        if stderr.contains("not found") || stderr.contains("does not exist") {
            return Err(Error::Clone(format!(
                "Repository not found: {}. Check the URL is correct.",
                url
            )));
        }

        return Err(Error::Clone(format!("git clone failed: {}", stderr)));
    }

    Ok(())
}

/// Fetch every remote of the working copy at `path`
pub fn fetch_all(path: &Path) -> Result<()> {
    let output = git_in(path, &["fetch", "--all"])
        .map_err(|e| Error::LocalGit(format!("Failed to run git fetch: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::LocalGit(format!("git fetch failed: {}", stderr)));
    }

    Ok(())
}

/// Push `refspec` to origin, optionally forced
pub fn push(path: &Path, refspec: &str, force: bool) -> Result<()> {
    let mut args = vec!["push"];
    if force {
        args.push("--force");
    }
    args.push("origin");
    args.push(refspec);

    let output = git_in(path, &args)
        .map_err(|e| Error::LocalGit(format!("Failed to run git push: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::LocalGit(format!(
            "Push of '{}' rejected: {}",
            refspec, stderr
        )));
    }

    Ok(())
}

/// Merge `source` into the current branch, allowing unrelated histories
/// and resolving every conflict in favor of the incoming side.
pub fn merge_theirs(path: &Path, source: &str) -> Result<()> {
    let output = git_in(
        path,
        &[
            "merge",
            source,
            "--allow-unrelated-histories",
            "--strategy-option",
            "theirs",
            "--no-edit",
        ],
    )
    .map_err(|e| Error::Merge(format!("Failed to run git merge: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        return Err(Error::Merge(format!(
            "git merge {} failed: {}{}",
            source, stdout, stderr
        )));
    }

    Ok(())
}

fn git_in(path: &Path, args: &[&str]) -> std::io::Result<Output> {
    Command::new("git").args(args).current_dir(path).output()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::testutil::{commit_file, init_repo};
    use tempfile::TempDir;

    #[test]
    fn test_clone_rejects_non_empty_destination() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        std::fs::write(dest.path().join("occupied"), "x").unwrap();

        let result = clone_template(source.path().to_str().unwrap(), dest.path());
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Clone(_)));
        assert!(err.to_string().contains("not empty"));
    }

    #[test]
    fn test_clone_from_local_path() {
        let source = TempDir::new().unwrap();
        let raw = init_repo(source.path(), "main");
        commit_file(&raw, "hello.txt", "hello", "initial commit");

        let parent = TempDir::new().unwrap();
        let dest = parent.path().join("clone");
        clone_template(source.path().to_str().unwrap(), &dest).unwrap();

        assert!(dest.join(".git").exists());
        assert_eq!(
            std::fs::read_to_string(dest.join("hello.txt")).unwrap(),
            "hello"
        );
    }

    #[test]
    fn test_clone_unreachable_source() {
        let parent = TempDir::new().unwrap();
        let dest = parent.path().join("clone");
        let result = clone_template("/nonexistent/template/repo", &dest);
        assert!(matches!(result, Err(Error::Clone(_))));
    }
}

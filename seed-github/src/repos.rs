//! Repository creation, commit discovery, and ref management

use reqwest::StatusCode;
use seed_core::{Error, RemoteRepo, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::GitHubClient;

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryResponse {
    pub full_name: String,
    pub default_branch: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitEntry {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefResponse {
    pub object: RefObject,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefObject {
    pub sha: String,
}

impl GitHubClient {
    /// Create the repository under the authenticated user
    ///
    /// `auto_init` is requested so a first commit and default branch
    /// exist immediately; the branch-creation step depends on that.
    pub async fn create_repository(&self, name: &str, description: &str) -> Result<RemoteRepo> {
        let body = json!({
            "name": name,
            "description": description,
            "auto_init": true,
        });

        let response = self
            .http()
            .post(format!("{}/user/repos", self.api_url()))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::RemoteCreation(e.to_string()))?;

        if response.status() != StatusCode::CREATED {
            return Err(Error::RemoteCreation(
                Self::response_detail(response).await,
            ));
        }

        let repo: RepositoryResponse = response
            .json()
            .await
            .map_err(|e| Error::RemoteCreation(format!("Unexpected response body: {}", e)))?;

        info!(repo = %repo.full_name, "Repository created");
        Ok(RemoteRepo {
            full_name: repo.full_name,
            default_branch: repo.default_branch,
        })
    }

    /// SHA the default branch currently points at
    pub async fn default_branch_sha(&self) -> Result<String> {
        let response = self
            .http()
            .get(self.repo_url(""))
            .send()
            .await
            .map_err(|e| Error::BranchDiscovery(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(Error::BranchDiscovery(
                Self::response_detail(response).await,
            ));
        }

        let repo: RepositoryResponse = response
            .json()
            .await
            .map_err(|e| Error::BranchDiscovery(format!("Unexpected response body: {}", e)))?;

        let response = self
            .http()
            .get(self.repo_url(&format!("/git/refs/heads/{}", repo.default_branch)))
            .send()
            .await
            .map_err(|e| Error::BranchDiscovery(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(Error::BranchDiscovery(
                Self::response_detail(response).await,
            ));
        }

        let reference: RefResponse = response
            .json()
            .await
            .map_err(|e| Error::BranchDiscovery(format!("Unexpected response body: {}", e)))?;

        Ok(reference.object.sha)
    }

    /// SHA of the repository's first commit
    ///
    /// The commits listing is newest-first, so the root commit is the
    /// last entry of the page. A freshly auto-initialized repository has
    /// exactly one commit; an empty listing is a fatal precondition
    /// failure.
    pub async fn first_commit_sha(&self) -> Result<String> {
        let response = self
            .http()
            .get(self.repo_url("/commits"))
            .send()
            .await
            .map_err(|e| Error::BranchDiscovery(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(Error::BranchDiscovery(
                Self::response_detail(response).await,
            ));
        }

        let commits: Vec<CommitEntry> = response
            .json()
            .await
            .map_err(|e| Error::BranchDiscovery(format!("Unexpected response body: {}", e)))?;

        let first = commits
            .into_iter()
            .last()
            .ok_or_else(|| Error::BranchDiscovery("Repository has no commits".to_string()))?;

        debug!(sha = %first.sha, "Resolved first commit");
        Ok(first.sha)
    }

    /// Create a branch ref pointing at `sha`
    ///
    /// An existing ref with the same name fails with 422; that failure is
    /// surfaced to the caller, never retried.
    pub async fn create_ref(&self, branch: &str, sha: &str) -> Result<()> {
        let body = json!({
            "ref": format!("refs/heads/{}", branch),
            "sha": sha,
        });

        let response = self
            .http()
            .post(self.repo_url("/git/refs"))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::BranchCreation {
                branch: branch.to_string(),
                reason: e.to_string(),
            })?;

        if response.status() != StatusCode::CREATED {
            return Err(Error::BranchCreation {
                branch: branch.to_string(),
                reason: Self::response_detail(response).await,
            });
        }

        info!(branch = %branch, sha = %sha, "Created ref");
        Ok(())
    }
}

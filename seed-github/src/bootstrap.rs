//! `RemoteHost` capability implementation for the orchestrator

use async_trait::async_trait;
use seed_core::{RemoteHost, RemoteRepo, RepoPublicKey, Result};

use crate::GitHubClient;

#[async_trait]
impl RemoteHost for GitHubClient {
    async fn check_identity(&self) -> Result<bool> {
        GitHubClient::check_identity(self).await
    }

    async fn create_repository(&self, name: &str, description: &str) -> Result<RemoteRepo> {
        GitHubClient::create_repository(self, name, description).await
    }

    async fn fetch_secrets_public_key(&self) -> Result<RepoPublicKey> {
        GitHubClient::fetch_secrets_public_key(self).await
    }

    async fn put_secret(&self, name: &str, sealed_value: &str, key_id: &str) -> Result<()> {
        GitHubClient::put_secret(self, name, sealed_value, key_id).await
    }

    async fn first_commit_sha(&self) -> Result<String> {
        GitHubClient::first_commit_sha(self).await
    }

    async fn create_ref(&self, branch: &str, sha: &str) -> Result<()> {
        GitHubClient::create_ref(self, branch, sha).await
    }
}

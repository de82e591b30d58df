//! GitHub API client
//!
//! A thin client over the REST v3 API carrying the fixed wire contract:
//! JSON bodies, bearer authorization, the pinned API-version header, and
//! a versioned user agent (GitHub rejects requests without one).

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use seed_core::{BootstrapConfig, Error, Result};
use tracing::{debug, info};

const GITHUB_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";

/// GitHub API client scoped to one owner/repository pair
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Create a client for the repository named in the config,
    /// authenticated with its token.
    pub fn new(config: &BootstrapConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| Error::Config("GITHUB_TOKEN contains invalid characters".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(API_VERSION),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("repo-seed/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        info!(owner = %config.username, repo = %config.repo_name, "Created GitHub client");

        Ok(Self {
            http,
            api_url: GITHUB_API_URL.to_string(),
            owner: config.username.clone(),
            repo: config.repo_name.clone(),
        })
    }

    /// Get the repository owner
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the repository name
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Connectivity/auth smoke test against a cheap endpoint
    pub async fn check_identity(&self) -> Result<bool> {
        let response = self
            .http
            .get(format!("{}/octocat", self.api_url))
            .send()
            .await
            .map_err(|e| Error::Auth(e.to_string()))?;

        let status = response.status();
        debug!(status = %status, "Identity check response");
        Ok(status == reqwest::StatusCode::OK)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn api_url(&self) -> &str {
        &self.api_url
    }

    /// URL under `/repos/{owner}/{repo}`
    pub(crate) fn repo_url(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.api_url, self.owner, self.repo, suffix
        )
    }

    /// Render a failed response as "status: body" for error messages
    pub(crate) async fn response_detail(response: reqwest::Response) -> String {
        let status = response.status();
        match response.text().await {
            Ok(body) if !body.is_empty() => format!("{}: {}", status, body),
            _ => status.to_string(),
        }
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GitHubClient {
        let config = BootstrapConfig {
            username: "octocat".to_string(),
            token: "ghp_test".to_string(),
            repo_name: "demo-app".to_string(),
            repo_description: "demo".to_string(),
            docker_user: "u".to_string(),
            docker_password: "p".to_string(),
            template_url: "https://github.com/octocat/template.git".to_string(),
            local_path: "/tmp/demo-app".to_string(),
        };
        GitHubClient::new(&config).unwrap()
    }

    #[test]
    fn test_repo_url() {
        let client = test_client();
        assert_eq!(
            client.repo_url("/actions/secrets/public-key"),
            "https://api.github.com/repos/octocat/demo-app/actions/secrets/public-key"
        );
    }

    #[test]
    fn test_token_with_newline_rejected() {
        let config = BootstrapConfig {
            username: "octocat".to_string(),
            token: "bad\ntoken".to_string(),
            repo_name: "demo-app".to_string(),
            repo_description: "demo".to_string(),
            docker_user: "u".to_string(),
            docker_password: "p".to_string(),
            template_url: "https://github.com/octocat/template.git".to_string(),
            local_path: "/tmp/demo-app".to_string(),
        };
        assert!(matches!(GitHubClient::new(&config), Err(Error::Config(_))));
    }
}

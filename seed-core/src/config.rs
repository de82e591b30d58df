//! Invocation configuration for the bootstrap flow
//!
//! All parameters come from environment variables, read once at startup
//! into an immutable value that is passed by reference into every
//! component. Nothing reads the environment after construction.

use crate::{Error, Result};

/// Immutable configuration for one bootstrap run
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// GitHub account that will own the new repository
    pub username: String,
    /// Personal access token with repo scope
    pub token: String,
    /// Name of the repository to create
    pub repo_name: String,
    /// Description for the repository and rewritten metadata
    pub repo_description: String,
    /// Value stored as the `DOCKER_USER` secret
    pub docker_user: String,
    /// Value stored as the `DOCKER_PASSWORD` secret
    pub docker_password: String,
    /// Clone URL of the template repository
    pub template_url: String,
    /// Local directory the template is cloned into
    pub local_path: String,
}

impl BootstrapConfig {
    /// Load configuration from process environment variables
    ///
    /// Required variables: `GITHUB_USERNAME`, `GITHUB_TOKEN`, `REPO_NAME`,
    /// `REPO_DESCRIPTION`, `DOCKER_USER`, `DOCKER_PASSWORD`, `TEMPLATE_URL`,
    /// `LOCAL_PATH`. Every value must be non-empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through a caller-supplied variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |name: &str| -> Result<String> {
            let value = lookup(name)
                .map(|v| v.trim().to_string())
                .unwrap_or_default();
            if value.is_empty() {
                return Err(Error::Config(format!(
                    "Environment variable {} is not set. \
                     Set it in the environment or in a .env file.",
                    name
                )));
            }
            Ok(value)
        };

        Ok(Self {
            username: require("GITHUB_USERNAME")?,
            token: require("GITHUB_TOKEN")?,
            repo_name: require("REPO_NAME")?,
            repo_description: require("REPO_DESCRIPTION")?,
            docker_user: require("DOCKER_USER")?,
            docker_password: require("DOCKER_PASSWORD")?,
            template_url: require("TEMPLATE_URL")?,
            local_path: require("LOCAL_PATH")?,
        })
    }

    /// HTTPS clone URL of the target repository
    pub fn remote_url(&self) -> String {
        format!(
            "https://github.com/{}/{}.git",
            self.username, self.repo_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("GITHUB_USERNAME", "octocat"),
            ("GITHUB_TOKEN", "ghp_xxxxxxxxxxxx"),
            ("REPO_NAME", "demo-app"),
            ("REPO_DESCRIPTION", "demo"),
            ("DOCKER_USER", "dockeruser"),
            ("DOCKER_PASSWORD", "dockerpass"),
            ("TEMPLATE_URL", "https://github.com/octocat/template.git"),
            ("LOCAL_PATH", "/tmp/demo-app"),
        ])
    }

    #[test]
    fn test_full_config_loads() {
        let env = full_env();
        let config = BootstrapConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.username, "octocat");
        assert_eq!(config.repo_name, "demo-app");
        assert_eq!(config.local_path, "/tmp/demo-app");
    }

    #[test]
    fn test_missing_variable_rejected() {
        let mut env = full_env();
        env.remove("GITHUB_TOKEN");
        let result = BootstrapConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }

    #[test]
    fn test_empty_variable_rejected() {
        let mut env = full_env();
        env.insert("REPO_NAME", "   ");
        let result = BootstrapConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_values_trimmed() {
        let mut env = full_env();
        env.insert("GITHUB_TOKEN", "  ghp_xxxxxxxxxxxx  ");
        let config = BootstrapConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.token, "ghp_xxxxxxxxxxxx");
    }

    #[test]
    fn test_remote_url() {
        let env = full_env();
        let config = BootstrapConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(
            config.remote_url(),
            "https://github.com/octocat/demo-app.git"
        );
    }
}

//! Bootstrap orchestrator
//!
//! Sequences the end-to-end flow: authenticate, create the remote
//! repository, provision secrets, create branches, clone the template,
//! rewrite and push, merge histories. Every step after the identity
//! check is a hard gate: the first fatal failure stops the run, and
//! already-created remote state is left as-is (no rollback).
//!
//! The external systems sit behind capability traits so tests can drive
//! the orchestrator with fakes.

use std::path::Path;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::seal::SecretSealer;
use crate::{BootstrapConfig, Error, Result};

/// Branch pinned to the first commit and later force-updated with the
/// rewritten template content.
pub const FEATURE_BRANCH: &str = "feature/initial";

/// Branch the template content is merged into.
pub const MAIN_BRANCH: &str = "main";

/// Names under which the credential pair is stored as secrets.
pub const SECRET_NAMES: [&str; 2] = ["DOCKER_USER", "DOCKER_PASSWORD"];

/// Descriptor of the newly created remote repository
#[derive(Debug, Clone)]
pub struct RemoteRepo {
    /// Full name in `owner/name` form
    pub full_name: String,
    /// Default branch the platform initialized
    pub default_branch: String,
}

/// Repository-scoped public key for sealing secrets
///
/// Fetched fresh each run; keys may rotate between runs.
#[derive(Debug, Clone)]
pub struct RepoPublicKey {
    /// Base64-encoded public key
    pub key: String,
    /// Platform identifier for the key, echoed back on upload
    pub key_id: String,
}

/// Capability set for the hosted repository API
#[async_trait]
pub trait RemoteHost: Send + Sync {
    /// Connectivity/auth smoke test. `Ok(false)` or an error is logged by
    /// the orchestrator, never fatal.
    async fn check_identity(&self) -> Result<bool>;

    /// Create the target repository, auto-initialized so a first commit
    /// and default branch exist immediately.
    async fn create_repository(&self, name: &str, description: &str) -> Result<RemoteRepo>;

    /// Fetch the repository's secrets public key.
    async fn fetch_secrets_public_key(&self) -> Result<RepoPublicKey>;

    /// Upload one sealed secret under `name`.
    async fn put_secret(&self, name: &str, sealed_value: &str, key_id: &str) -> Result<()>;

    /// SHA of the repository's first (root) commit.
    async fn first_commit_sha(&self) -> Result<String>;

    /// Create branch `branch` pointing at `sha`. An already-existing ref
    /// is an error, surfaced rather than retried.
    async fn create_ref(&self, branch: &str, sha: &str) -> Result<()>;
}

/// Capability set for the local working copy
pub trait LocalGit: Send + Sync {
    fn clone_template(&self, url: &str, path: &Path) -> Result<()>;
    fn rewrite_metadata(&self, path: &Path, name: &str, description: &str) -> Result<()>;
    fn rebind_origin(&self, path: &Path, url: &str) -> Result<()>;
    fn ensure_branch(&self, path: &Path, name: &str) -> Result<()>;
    fn stage_commit_push(&self, path: &Path, message: &str, refspec: &str, force: bool)
        -> Result<()>;
    fn merge_unrelated(&self, path: &Path, target: &str, source: &str) -> Result<()>;
}

/// Steps of the fixed bootstrap sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Identity,
    CreateRepository,
    ProvisionSecrets,
    CreateBranches,
    CloneTemplate,
    PushTemplate,
    MergeHistories,
}

impl Step {
    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Step::Identity => "Checking identity against the API",
            Step::CreateRepository => "Creating target repository",
            Step::ProvisionSecrets => "Sealing and uploading secrets",
            Step::CreateBranches => "Creating remote branches",
            Step::CloneTemplate => "Cloning template repository",
            Step::PushTemplate => "Rewriting metadata and pushing",
            Step::MergeHistories => "Merging template into main",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Result of a completed bootstrap run
#[derive(Debug)]
pub struct BootstrapOutcome {
    /// Full name of the created repository
    pub repository: String,
    /// Per-secret upload failures. The flow continues past these; callers
    /// decide how loudly to surface them.
    pub failed_secrets: Vec<Error>,
}

/// The orchestrator: borrows the config and the three capabilities and
/// runs the sequence once.
pub struct Bootstrap<'a> {
    config: &'a BootstrapConfig,
    remote: &'a dyn RemoteHost,
    local: &'a dyn LocalGit,
    sealer: &'a dyn SecretSealer,
}

impl<'a> Bootstrap<'a> {
    pub fn new(
        config: &'a BootstrapConfig,
        remote: &'a dyn RemoteHost,
        local: &'a dyn LocalGit,
        sealer: &'a dyn SecretSealer,
    ) -> Self {
        Self {
            config,
            remote,
            local,
            sealer,
        }
    }

    /// Run the full bootstrap sequence once
    pub async fn run(&self) -> Result<BootstrapOutcome> {
        let config = self.config;

        // Step 1: identity check, never fatal
        info!("{}", Step::Identity);
        match self.remote.check_identity().await {
            Ok(true) => info!("Authentication successful"),
            Ok(false) => warn!("Identity check failed, continuing anyway"),
            Err(e) => warn!(error = %e, "Identity check errored, continuing anyway"),
        }

        // Step 2: create the repository
        info!("{}", Step::CreateRepository);
        let repo = self
            .remote
            .create_repository(&config.repo_name, &config.repo_description)
            .await?;
        info!(repo = %repo.full_name, default_branch = %repo.default_branch, "Repository created");

        // Step 3: seal and upload both secrets. Upload failures are
        // per-secret and do not abort the remaining secrets or the flow.
        info!("{}", Step::ProvisionSecrets);
        let public_key = self.remote.fetch_secrets_public_key().await?;
        let mut failed_secrets = Vec::new();
        let values = [&config.docker_user, &config.docker_password];
        for (name, value) in SECRET_NAMES.iter().zip(values) {
            let sealed = self.sealer.seal(&public_key.key, value)?;
            match self
                .remote
                .put_secret(name, &sealed, &public_key.key_id)
                .await
            {
                Ok(()) => info!(secret = %name, "Secret stored"),
                Err(e) => {
                    warn!(secret = %name, error = %e, "Secret upload failed");
                    failed_secrets.push(e);
                }
            }
        }

        // Step 4: pin feature/initial to the first commit
        info!("{}", Step::CreateBranches);
        let sha = self.remote.first_commit_sha().await?;
        info!(sha = %sha, "Discovered first commit");
        self.remote.create_ref(FEATURE_BRANCH, &sha).await?;
        info!(branch = %FEATURE_BRANCH, "Branch created");

        // Step 5: clone the template
        info!("{}", Step::CloneTemplate);
        let path = Path::new(&config.local_path);
        self.local.clone_template(&config.template_url, path)?;

        // Step 6: rewrite metadata, repoint origin, force-push the branch
        info!("{}", Step::PushTemplate);
        self.local
            .rewrite_metadata(path, &config.repo_name, &config.repo_description)?;
        self.local.rebind_origin(path, &config.remote_url())?;
        self.local.ensure_branch(path, FEATURE_BRANCH)?;
        self.local.stage_commit_push(
            path,
            "Initial commit with modified template files.",
            &format!("{}:{}", FEATURE_BRANCH, FEATURE_BRANCH),
            true,
        )?;

        // Step 7: merge the unrelated histories into main
        info!("{}", Step::MergeHistories);
        self.local
            .merge_unrelated(path, MAIN_BRANCH, &format!("origin/{}", FEATURE_BRANCH))?;

        info!(repo = %repo.full_name, "Bootstrap complete");
        Ok(BootstrapOutcome {
            repository: repo.full_name,
            failed_secrets,
        })
    }
}

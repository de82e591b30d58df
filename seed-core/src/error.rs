//! Error types for the bootstrap flow

use thiserror::Error;

/// Result type alias for bootstrap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for bootstrap operations
///
/// Each variant maps to one failure category of the flow so callers can
/// branch on the kind of failure instead of matching message text.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or empty environment variable, bad path)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Identity check against the remote API failed (non-fatal to the flow)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Remote repository creation failed
    #[error("Failed to create repository: {0}")]
    RemoteCreation(String),

    /// Fetching the repository secrets public key failed
    #[error("Failed to fetch secrets public key: {0}")]
    KeyFetch(String),

    /// Sealing a secret value failed
    #[error("Failed to seal secret: {0}")]
    Seal(String),

    /// Uploading a single named secret failed
    #[error("Failed to upload secret {name}: {reason}")]
    SecretUpload { name: String, reason: String },

    /// Discovering the commit to branch from failed
    #[error("Failed to discover branch point: {0}")]
    BranchDiscovery(String),

    /// Creating a remote ref failed (including the already-exists case)
    #[error("Failed to create branch '{branch}': {reason}")]
    BranchCreation { branch: String, reason: String },

    /// Cloning the template repository failed
    #[error("Failed to clone template: {0}")]
    Clone(String),

    /// Local checkout/commit/push failure
    #[error("Local git operation failed: {0}")]
    LocalGit(String),

    /// Merge failure
    #[error("Merge failed: {0}")]
    Merge(String),

    /// Underlying libgit2 error
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

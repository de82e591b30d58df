//! Seed Core - Core library for the repo-seed bootstrapper
//!
//! This crate provides the building blocks for bootstrapping a new
//! repository from a template: configuration, secret sealing, local git
//! operations, and the orchestrator that sequences the end-to-end flow.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod git;
pub mod manifest;
pub mod seal;

pub use bootstrap::{Bootstrap, BootstrapOutcome, LocalGit, RemoteHost, RemoteRepo, RepoPublicKey};
pub use config::BootstrapConfig;
pub use error::{Error, Result};
pub use seal::{SealedBoxSealer, SecretSealer};

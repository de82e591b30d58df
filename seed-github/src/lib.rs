//! Seed GitHub - GitHub API access for the repo-seed bootstrapper
//!
//! This crate talks to the GitHub REST API: identity check, repository
//! creation, Actions secret provisioning, and ref management. It
//! implements the `RemoteHost` capability the orchestrator drives.

mod bootstrap;
mod client;
mod repos;
mod secrets;

pub use client::GitHubClient;

//! Git operations for release workflows.
//!
//! This module defines the [`RepositoryClient`] seam used by the orchestrator
//! and its libgit2-backed implementation, authenticating over SSH through a
//! [`CredentialsProvider`].

mod credentials;
mod git_adapter;
mod operations;

pub use credentials::{CredentialsProvider, KeyPairCredentials};
pub use git_adapter::Git2Client;
pub use operations::{CommitInfo, PushInfo, RepositoryClient, RepositoryHandle};

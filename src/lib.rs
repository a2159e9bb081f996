//! # Release Bot
//!
//! Conversational release automation for git repositories hosted on GitHub.
//!
//! A short exchange ("feature or bugfix?") triggers one release pipeline run:
//! clone into an ephemeral workspace over SSH, bump the version, pick a unique
//! human-readable release name, render release notes, commit and tag the bump,
//! push both, and file a draft GitHub release.
//!
//! ## Features
//!
//! - **Sequential Pipeline**: Every step runs in order; the first failure is returned unchanged
//! - **Ephemeral Workspaces**: One uniquely named directory per attempt, removed best-effort
//! - **Key-Pair Transport**: SSH public-key authentication through a credential callback
//! - **Unique Names**: `adjective-animal` names never reused for the same repository
//! - **Draft Releases**: Releases are filed as drafts for a human to publish
//!
//! ## Usage
//!
//! ```bash
//! release_bot chat                              # listen for trigger phrases on stdin
//! release_bot release acme/widget --type bugfix # skip the trigger, answer up front
//! release_bot check                             # validate startup configuration
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod git;
pub mod github;
pub mod naming;
pub mod notes;
pub mod orchestrator;
pub mod version;
pub mod workspace;

// Re-export main types for public API
pub use config::{AppConfig, AppPaths, BotIdentity, Credentials};
pub use conversation::{Conversation, ConversationController, ConversationState, TriggerBinding};
pub use error::{ReleaseError, Result};
pub use git::{CredentialsProvider, Git2Client, KeyPairCredentials, RepositoryClient};
pub use github::{GitHubReleaseConfig, GitHubReleaseManager, ReleaseHost};
pub use naming::{ReleaseNamer, WordListNamer};
pub use notes::{NotesGenerator, TemplateNotes};
pub use orchestrator::Orchestrator;
pub use version::{ManifestVersionResolver, VersionBump, VersionResolver, VersionTag};
pub use workspace::{TokenGenerator, UuidTokens, Workspace, WorkspaceManager};

use std::fmt;

/// Kind of release requested in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseType {
    /// New functionality; bumps the minor version
    Feature,
    /// Fixes only; bumps the patch version
    Bugfix,
}

impl ReleaseType {
    /// Version component this release type increments
    pub fn bump(self) -> VersionBump {
        match self {
            ReleaseType::Feature => VersionBump::Minor,
            ReleaseType::Bugfix => VersionBump::Patch,
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseType::Feature => write!(f, "feature"),
            ReleaseType::Bugfix => write!(f, "bugfix"),
        }
    }
}

/// Input to one pipeline run. Immutable once the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Requested release type
    pub release_type: ReleaseType,
}

impl ReleaseRequest {
    /// Create a new release request
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, release_type: ReleaseType) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            release_type,
        }
    }
}

/// Result of a completed release pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRecord {
    /// Version tag that was committed, tagged and pushed
    pub version: VersionTag,
    /// Unique human-readable release name
    pub release_name: String,
    /// Rendered release notes
    pub release_notes: String,
    /// URL of the draft release on the hosting service
    pub release_url: String,
}

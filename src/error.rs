//! Comprehensive error types for release_bot operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.
//! Every pipeline step returns one of these unchanged; nothing here retries.

use crate::version::VersionBump;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release_bot operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all release_bot operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Startup configuration errors (fatal)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Ephemeral workspace errors
    #[error("Workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    /// Version management errors
    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    /// Git operation errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Release naming errors
    #[error("Naming error: {0}")]
    Naming(#[from] NamingError),

    /// Release notes errors
    #[error("Release notes error: {0}")]
    Notes(#[from] NotesError),

    /// Hosting service (GitHub) errors
    #[error("GitHub error: {0}")]
    Hosting(#[from] HostingError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Startup configuration errors. Any of these prevents the process from starting.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Passphrase secret missing or empty
    #[error("Environment variable {var} is missing or empty; refusing to start")]
    MissingPassphrase {
        /// Variable that was checked
        var: String,
    },

    /// Key file not found at its fixed location
    #[error("SSH key file not found at {path}")]
    MissingKeyFile {
        /// Expected key path
        path: PathBuf,
    },

    /// Configuration file could not be read or parsed
    #[error("Invalid configuration file {path}: {reason}")]
    InvalidFile {
        /// Path to the configuration file
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Hosting token missing
    #[error("GitHub token not provided. Set GH_TOKEN or GITHUB_TOKEN, or `github_token` in the config file")]
    MissingToken,
}

/// Workspace allocation errors
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Name is not a single path component
    #[error("Invalid workspace name '{name}'")]
    InvalidName {
        /// Rejected name
        name: String,
    },

    /// A directory with the generated path already exists
    #[error("Workspace already exists at {path}")]
    Conflict {
        /// Conflicting path
        path: PathBuf,
    },

    /// Directory tree could not be created
    #[error("Failed to create workspace at {path}: {source}")]
    CreateFailed {
        /// Path that could not be created
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Directory tree could not be removed
    #[error("Failed to remove workspace at {path}: {source}")]
    RemoveFailed {
        /// Path that could not be removed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Version management errors
#[derive(Error, Debug)]
pub enum VersionError {
    /// Invalid version format
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion {
        /// Version string
        version: String,
        /// Reason for the error
        reason: String,
    },

    /// Version parsing failed
    #[error("Failed to parse version '{version}': {source}")]
    ParseFailed {
        /// Version string
        version: String,
        /// Parsing error
        #[source]
        source: semver::Error,
    },

    /// Computed version does not advance past the prior one
    #[error("New version '{next}' must be greater than current version '{previous}'")]
    NotIncreasing {
        /// Prior version
        previous: String,
        /// Computed version
        next: String,
    },

    /// A version component is already at its maximum
    #[error("Cannot bump '{version}': {component} component overflows")]
    Overflow {
        /// Version being bumped
        version: String,
        /// Component that would overflow
        component: VersionBump,
    },

    /// Background version resolution did not complete
    #[error("Version resolution task failed: {reason}")]
    ResolveFailed {
        /// Reason for the error
        reason: String,
    },

    /// Failed to update a version manifest
    #[error("Failed to update manifest at {path}: {reason}")]
    ManifestUpdateFailed {
        /// Path to the manifest
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

/// Why a push was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushFailure {
    /// Remote rejected the update (non-fast-forward or hook)
    Rejected,
    /// Credentials were refused
    Authentication,
    /// Transport or network failure
    Network,
}

impl std::fmt::Display for PushFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PushFailure::Rejected => write!(f, "rejected"),
            PushFailure::Authentication => write!(f, "authentication"),
            PushFailure::Network => write!(f, "network"),
        }
    }
}

/// Git operation errors
#[derive(Error, Debug)]
pub enum GitError {
    /// Not a git repository
    #[error("Not a git repository: {path}")]
    NotRepository {
        /// Path that was opened
        path: PathBuf,
    },

    /// Git authentication failed
    #[error("Git authentication failed: {reason}")]
    AuthenticationFailed {
        /// Reason for the error
        reason: String,
    },

    /// Clone failed (network or destination conflict)
    #[error("Git clone of {url} failed: {reason}")]
    CloneFailed {
        /// Remote URL
        url: String,
        /// Reason for the error
        reason: String,
    },

    /// Staging, tree, commit or tag creation failed
    #[error("Git commit failed: {reason}")]
    CommitFailed {
        /// Reason for the error
        reason: String,
    },

    /// Push failed
    #[error("Git push failed ({kind}): {reason}")]
    PushFailed {
        /// Failure classification
        kind: PushFailure,
        /// Reason for the error
        reason: String,
    },

    /// Reading history or references failed
    #[error("Git history lookup failed: {reason}")]
    HistoryFailed {
        /// Reason for the error
        reason: String,
    },
}

/// Release naming errors
#[derive(Error, Debug)]
pub enum NamingError {
    /// Could not draw an unused name
    #[error("No unused release name found after {attempts} attempts")]
    Exhausted {
        /// Number of draws made
        attempts: usize,
    },
}

/// Release notes errors
#[derive(Error, Debug)]
pub enum NotesError {
    /// Template could not be parsed
    #[error("Invalid notes template: {0}")]
    Template(#[from] handlebars::TemplateError),

    /// Template could not be rendered
    #[error("Failed to render notes: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Hosting service errors
#[derive(Error, Debug)]
pub enum HostingError {
    /// Token lacks permission for the operation
    #[error("Permission denied for {operation}: {message}")]
    Permission {
        /// Operation attempted
        operation: String,
        /// Message returned by the API
        message: String,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded during {operation}")]
    RateLimited {
        /// Operation attempted
        operation: String,
        /// Seconds until the limit resets, when reported
        retry_after_seconds: Option<u64>,
    },

    /// A release with this tag or name already exists
    #[error("Release '{tag}' already exists")]
    NameCollision {
        /// Tag name that collided
        tag: String,
    },

    /// Any other non-success response
    #[error("GitHub API returned {status} for {operation}: {message}")]
    Api {
        /// Operation attempted
        operation: String,
        /// HTTP status code
        status: u16,
        /// Message returned by the API
        message: String,
    },

    /// Transport failure talking to the API
    #[error("GitHub request failed for {operation}: {source}")]
    Transport {
        /// Operation attempted
        operation: String,
        /// Underlying HTTP error
        #[source]
        source: reqwest::Error,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Config(ConfigError::MissingPassphrase { var }) => vec![
                format!("Export the SSH key passphrase: export {var}=..."),
            ],
            ReleaseError::Config(ConfigError::MissingKeyFile { path }) => vec![
                format!("Place the key pair at {}", path.display()),
                "Key files live under <app_root>/ssh-keys/<identity>[.pub]".to_string(),
            ],
            ReleaseError::Git(GitError::AuthenticationFailed { .. })
            | ReleaseError::Git(GitError::PushFailed {
                kind: PushFailure::Authentication,
                ..
            }) => vec![
                "Check that the deploy key is registered with write access".to_string(),
                "Verify the passphrase matches the private key".to_string(),
            ],
            ReleaseError::Git(GitError::PushFailed {
                kind: PushFailure::Rejected,
                ..
            }) => vec![
                "The remote branch moved during the release; trigger a fresh release".to_string(),
            ],
            ReleaseError::Hosting(HostingError::RateLimited {
                retry_after_seconds: Some(secs),
                ..
            }) => vec![format!("Wait {} seconds before retrying", secs)],
            ReleaseError::Hosting(HostingError::Permission { .. }) => vec![
                "Ensure the GitHub token has `contents: write` on the repository".to_string(),
            ],
            _ => vec!["Check the server logs for the full error".to_string()],
        }
    }
}

//! Core repository operations trait and types for release management.
//!
//! The orchestrator only talks to git through [`RepositoryClient`]. The
//! implementation in `git_adapter` delegates to libgit2.

use crate::error::Result;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Trait defining the repository operations a release run needs
pub trait RepositoryClient {
    /// Clone `owner/repo` into an existing empty directory
    fn clone_repository(
        &self,
        owner: &str,
        repo: &str,
        target: &Path,
    ) -> impl Future<Output = Result<RepositoryHandle>>;

    /// List tag names present in the clone
    fn tag_names(&self, handle: &RepositoryHandle) -> impl Future<Output = Result<Vec<String>>>;

    /// Commits reachable from HEAD, newest first, stopping at `since_tag` when given
    fn recent_commits(
        &self,
        handle: &RepositoryHandle,
        since_tag: Option<&str>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<CommitInfo>>>;

    /// Stage everything, commit `"<tag_name> <release_name>"`, tag it and push
    /// the branch and tag together
    fn commit_and_tag(
        &self,
        handle: &RepositoryHandle,
        tag_name: &str,
        release_name: &str,
    ) -> impl Future<Output = Result<PushInfo>>;
}

/// A completed clone on local disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryHandle {
    /// Working directory of the clone
    pub path: PathBuf,
    /// Checked-out primary branch
    pub branch: String,
    /// URL the clone was made from
    pub remote_url: String,
}

/// Information about a Git commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Commit hash (full SHA)
    pub hash: String,
    /// Short commit hash
    pub short_hash: String,
    /// First line of the commit message
    pub summary: String,
    /// Author name
    pub author_name: String,
    /// Commit timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Information about a successful release push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushInfo {
    /// Remote name that was pushed to
    pub remote_name: String,
    /// Branch that was pushed
    pub branch: String,
    /// Tag that was pushed
    pub tag_name: String,
    /// Release commit hash
    pub commit_hash: String,
}

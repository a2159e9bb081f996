//! Adapter layer between the RepositoryClient trait and libgit2.
//!
//! libgit2 calls are blocking, so every operation reopens the repository by
//! path inside `spawn_blocking` and returns owned results.

use crate::config::BotIdentity;
use crate::error::{GitError, PushFailure, ReleaseError, Result};
use crate::git::{CommitInfo, CredentialsProvider, PushInfo, RepositoryClient, RepositoryHandle};
use git2::build::RepoBuilder;
use git2::{
    ErrorClass, ErrorCode, FetchOptions, IndexAddOption, ObjectType, PushOptions,
    RemoteCallbacks, Repository, Signature,
};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// libgit2 re-invokes the credential callback after a rejection; stop after this many
const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// Remote every clone is created with
const REMOTE_NAME: &str = "origin";

/// Repository operations using libgit2
#[derive(Clone)]
pub struct Git2Client {
    credentials: Arc<dyn CredentialsProvider>,
    remote_url_template: String,
    identity: BotIdentity,
}

impl std::fmt::Debug for Git2Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git2Client")
            .field("remote_url_template", &self.remote_url_template)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl Git2Client {
    /// Create a client.
    ///
    /// `remote_url_template` contains `{owner}` and `{repo}` placeholders.
    pub fn new(
        credentials: Arc<dyn CredentialsProvider>,
        remote_url_template: impl Into<String>,
        identity: BotIdentity,
    ) -> Self {
        Self {
            credentials,
            remote_url_template: remote_url_template.into(),
            identity,
        }
    }

    /// Clone URL for a repository
    pub fn remote_url(&self, owner: &str, repo: &str) -> String {
        self.remote_url_template
            .replace("{owner}", owner)
            .replace("{repo}", repo)
    }

    fn callbacks<'a>(&'a self, attempts: &'a Cell<usize>) -> RemoteCallbacks<'a> {
        let provider = self.credentials.as_ref();
        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(move |url, username, allowed| {
            let attempt = attempts.get() + 1;
            attempts.set(attempt);
            if attempt > MAX_CREDENTIAL_ATTEMPTS {
                return Err(git2::Error::from_str("credentials rejected by remote"));
            }
            provider.credentials(url, username, allowed)
        });
        callbacks
    }

    fn clone_blocking(&self, url: &str, target: &Path) -> Result<RepositoryHandle> {
        let attempts = Cell::new(0);

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(self.callbacks(&attempts));

        let mut builder = RepoBuilder::new();
        builder.fetch_options(fetch_options);

        let repo = builder.clone(url, target).map_err(|e| {
            if is_auth_failure(&e, &attempts) {
                GitError::AuthenticationFailed {
                    reason: e.message().to_string(),
                }
            } else if e.code() == ErrorCode::Exists {
                GitError::CloneFailed {
                    url: url.to_string(),
                    reason: format!("destination {} is not empty", target.display()),
                }
            } else {
                GitError::CloneFailed {
                    url: url.to_string(),
                    reason: e.message().to_string(),
                }
            }
        })?;

        let branch = repo
            .head()
            .ok()
            .and_then(|head| head.shorthand().map(str::to_string))
            .ok_or_else(|| GitError::CloneFailed {
                url: url.to_string(),
                reason: "remote has no default branch".to_string(),
            })?;

        log::info!("Cloned {} ({}) into {}", url, branch, target.display());

        Ok(RepositoryHandle {
            path: target.to_path_buf(),
            branch,
            remote_url: url.to_string(),
        })
    }

    fn commit_and_tag_blocking(
        &self,
        handle: &RepositoryHandle,
        tag_name: &str,
        release_name: &str,
    ) -> Result<PushInfo> {
        let repo = open(&handle.path)?;
        let commit_failed = |step: &str, e: git2::Error| GitError::CommitFailed {
            reason: format!("{step}: {}", e.message()),
        };

        // Stage additions, modifications and deletions
        let mut index = repo.index().map_err(|e| commit_failed("open index", e))?;
        index
            .add_all(["*"], IndexAddOption::DEFAULT, None)
            .map_err(|e| commit_failed("stage changes", e))?;
        index
            .update_all(["*"], None)
            .map_err(|e| commit_failed("stage deletions", e))?;
        index.write().map_err(|e| commit_failed("write index", e))?;

        let tree_id = index
            .write_tree()
            .map_err(|e| commit_failed("write tree", e))?;
        let tree = repo
            .find_tree(tree_id)
            .map_err(|e| commit_failed("find tree", e))?;
        let parent = repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| commit_failed("resolve branch tip", e))?;

        let now = git2::Time::new(chrono::Utc::now().timestamp(), 0);
        let signature = Signature::new(&self.identity.name, &self.identity.email, &now)
            .map_err(|e| commit_failed("build signature", e))?;

        let message = format!("{tag_name} {release_name}");
        let commit_id = repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                &message,
                &tree,
                &[&parent],
            )
            .map_err(|e| commit_failed("create commit", e))?;

        let target = repo
            .find_object(commit_id, Some(ObjectType::Commit))
            .map_err(|e| commit_failed("find commit", e))?;
        repo.tag(tag_name, &target, &signature, &message, false)
            .map_err(|e| {
                if e.code() == ErrorCode::Exists {
                    GitError::CommitFailed {
                        reason: format!("tag '{tag_name}' already exists"),
                    }
                } else {
                    commit_failed("create tag", e)
                }
            })?;

        log::info!("Committed {} and tagged {}", commit_id, tag_name);

        self.push_blocking(&repo, &handle.branch, tag_name)?;

        Ok(PushInfo {
            remote_name: REMOTE_NAME.to_string(),
            branch: handle.branch.clone(),
            tag_name: tag_name.to_string(),
            commit_hash: commit_id.to_string(),
        })
    }

    fn push_blocking(&self, repo: &Repository, branch: &str, tag_name: &str) -> Result<()> {
        let mut remote = repo
            .find_remote(REMOTE_NAME)
            .map_err(|e| GitError::PushFailed {
                kind: PushFailure::Network,
                reason: format!("remote '{REMOTE_NAME}' not found: {}", e.message()),
            })?;

        let branch_spec = format!("refs/heads/{branch}:refs/heads/{branch}");
        let tag_spec = format!("refs/tags/{tag_name}:refs/tags/{tag_name}");

        let attempts = Cell::new(0);
        let rejections = RefCell::new(Vec::new());

        let mut callbacks = self.callbacks(&attempts);
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                rejections.borrow_mut().push(format!("{refname}: {status}"));
            }
            Ok(())
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);

        remote
            .push(&[branch_spec.as_str(), tag_spec.as_str()], Some(&mut push_options))
            .map_err(|e| GitError::PushFailed {
                kind: classify_push_error(&e, &attempts),
                reason: e.message().to_string(),
            })?;

        let rejections = rejections.borrow();
        if !rejections.is_empty() {
            return Err(GitError::PushFailed {
                kind: PushFailure::Rejected,
                reason: rejections.join("; "),
            }
            .into());
        }

        log::info!("Pushed {} and {} to {}", branch, tag_name, REMOTE_NAME);
        Ok(())
    }
}

impl RepositoryClient for Git2Client {
    async fn clone_repository(
        &self,
        owner: &str,
        repo: &str,
        target: &Path,
    ) -> Result<RepositoryHandle> {
        let url = self.remote_url(owner, repo);
        let target = target.to_path_buf();
        let client = self.clone();
        let join_url = url.clone();

        tokio::task::spawn_blocking(move || client.clone_blocking(&url, &target))
            .await
            .map_err(|e| GitError::CloneFailed {
                url: join_url,
                reason: format!("Task join error: {e}"),
            })?
    }

    async fn tag_names(&self, handle: &RepositoryHandle) -> Result<Vec<String>> {
        let path = handle.path.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
            let repo = open(&path)?;
            let names = repo.tag_names(None).map_err(|e| GitError::HistoryFailed {
                reason: format!("list tags: {}", e.message()),
            })?;
            Ok(names.iter().flatten().map(str::to_string).collect())
        })
        .await
        .map_err(|e| history_join_error(&e))?
    }

    async fn recent_commits(
        &self,
        handle: &RepositoryHandle,
        since_tag: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CommitInfo>> {
        let path = handle.path.clone();
        let since_tag = since_tag.map(str::to_string);
        tokio::task::spawn_blocking(move || read_history(&path, since_tag.as_deref(), limit))
            .await
            .map_err(|e| history_join_error(&e))?
    }

    async fn commit_and_tag(
        &self,
        handle: &RepositoryHandle,
        tag_name: &str,
        release_name: &str,
    ) -> Result<PushInfo> {
        let client = self.clone();
        let handle = handle.clone();
        let tag_name = tag_name.to_string();
        let release_name = release_name.to_string();

        tokio::task::spawn_blocking(move || {
            client.commit_and_tag_blocking(&handle, &tag_name, &release_name)
        })
        .await
        .map_err(|e| GitError::CommitFailed {
            reason: format!("Task join error: {e}"),
        })?
    }
}

fn open(path: &Path) -> Result<Repository> {
    Repository::open(path).map_err(|_| {
        ReleaseError::Git(GitError::NotRepository {
            path: PathBuf::from(path),
        })
    })
}

fn read_history(path: &Path, since_tag: Option<&str>, limit: usize) -> Result<Vec<CommitInfo>> {
    let repo = open(path)?;
    let history_failed = |step: &str, e: git2::Error| GitError::HistoryFailed {
        reason: format!("{step}: {}", e.message()),
    };

    let mut walk = repo.revwalk().map_err(|e| history_failed("revwalk", e))?;
    walk.set_sorting(git2::Sort::TIME)
        .map_err(|e| history_failed("sort", e))?;
    walk.push_head().map_err(|e| history_failed("push HEAD", e))?;

    if let Some(tag) = since_tag {
        // A tag absent from this clone means the whole history is new
        if let Ok(object) = repo.revparse_single(&format!("refs/tags/{tag}"))
            && let Ok(commit) = object.peel_to_commit()
        {
            walk.hide(commit.id())
                .map_err(|e| history_failed("hide tag", e))?;
        }
    }

    let mut commits = Vec::new();
    for oid in walk.take(limit) {
        let oid = oid.map_err(|e| history_failed("walk", e))?;
        let commit = repo
            .find_commit(oid)
            .map_err(|e| history_failed("find commit", e))?;

        let hash = oid.to_string();
        commits.push(CommitInfo {
            short_hash: hash.chars().take(7).collect(),
            hash,
            summary: commit.summary().unwrap_or_default().to_string(),
            author_name: commit.author().name().unwrap_or("unknown").to_string(),
            timestamp: chrono::DateTime::from_timestamp(commit.time().seconds(), 0)
                .unwrap_or_else(chrono::Utc::now),
        });
    }

    Ok(commits)
}

fn history_join_error(e: &tokio::task::JoinError) -> GitError {
    GitError::HistoryFailed {
        reason: format!("Task join error: {e}"),
    }
}

fn is_auth_failure(e: &git2::Error, attempts: &Cell<usize>) -> bool {
    e.code() == ErrorCode::Auth
        || attempts.get() > MAX_CREDENTIAL_ATTEMPTS
        || (e.class() == ErrorClass::Ssh && e.message().to_lowercase().contains("auth"))
}

fn classify_push_error(e: &git2::Error, attempts: &Cell<usize>) -> PushFailure {
    if is_auth_failure(e, attempts) {
        PushFailure::Authentication
    } else if e.code() == ErrorCode::NotFastForward
        || e.message().contains("fast-forward")
        || e.message().contains("fastforward")
    {
        PushFailure::Rejected
    } else {
        PushFailure::Network
    }
}

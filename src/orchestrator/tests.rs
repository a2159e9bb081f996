use super::*;
use crate::error::{GitError, HostingError, PushFailure, ReleaseError, WorkspaceError};
use crate::git::{CommitInfo, PushInfo};
use crate::github::CreatedRelease;
use crate::notes::TemplateNotes;
use crate::version::ManifestVersionResolver;
use crate::workspace::TokenGenerator;
use crate::ReleaseType;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

type Calls = Arc<Mutex<Vec<String>>>;

fn record(calls: &Calls, call: impl Into<String>) {
    calls.lock().unwrap().push(call.into());
}

#[derive(Default)]
struct FakeRepo {
    calls: Calls,
    fail_clone: bool,
    fail_push: bool,
    /// Clone somewhere else and delete the workspace, so cleanup fails
    clone_elsewhere: Option<PathBuf>,
}

impl RepositoryClient for FakeRepo {
    async fn clone_repository(&self, owner: &str, repo: &str, target: &Path) -> Result<RepositoryHandle> {
        record(&self.calls, format!("clone {owner}/{repo}"));
        if self.fail_clone {
            return Err(GitError::AuthenticationFailed {
                reason: "key rejected".to_string(),
            }
            .into());
        }

        let path = match &self.clone_elsewhere {
            Some(elsewhere) => {
                std::fs::remove_dir_all(target).unwrap();
                elsewhere.clone()
            }
            None => target.to_path_buf(),
        };
        std::fs::write(
            path.join("Cargo.toml"),
            "[package]\nname = \"widget\"\nversion = \"1.2.3\"\n",
        )
        .unwrap();

        Ok(RepositoryHandle {
            path,
            branch: "main".to_string(),
            remote_url: format!("git@github.com:{owner}/{repo}.git"),
        })
    }

    async fn tag_names(&self, _handle: &RepositoryHandle) -> Result<Vec<String>> {
        Ok(vec!["v1.2.2".to_string(), "v1.2.3".to_string()])
    }

    async fn recent_commits(
        &self,
        _handle: &RepositoryHandle,
        since_tag: Option<&str>,
        _limit: usize,
    ) -> Result<Vec<CommitInfo>> {
        record(&self.calls, format!("history since {}", since_tag.unwrap_or("-")));
        Ok(vec![CommitInfo {
            hash: "abc1234def".to_string(),
            short_hash: "abc1234".to_string(),
            summary: "Fix widget overflow".to_string(),
            author_name: "Dana".to_string(),
            timestamp: chrono::Utc::now(),
        }])
    }

    async fn commit_and_tag(
        &self,
        handle: &RepositoryHandle,
        tag_name: &str,
        release_name: &str,
    ) -> Result<PushInfo> {
        record(&self.calls, format!("commit {tag_name} {release_name}"));
        if self.fail_push {
            return Err(GitError::PushFailed {
                kind: PushFailure::Rejected,
                reason: "non-fast-forward".to_string(),
            }
            .into());
        }
        Ok(PushInfo {
            remote_name: "origin".to_string(),
            branch: handle.branch.clone(),
            tag_name: tag_name.to_string(),
            commit_hash: "feedface".to_string(),
        })
    }
}

struct FixedNamer(Calls);

impl ReleaseNamer for FixedNamer {
    async fn unique_name(&self, _owner: &str, _repo: &str) -> Result<String> {
        record(&self.0, "name");
        Ok("brave-falcon".to_string())
    }
}

#[derive(Default)]
struct FakeHost {
    calls: Calls,
    drafts: Arc<Mutex<Vec<DraftRelease>>>,
    fail_create: bool,
    /// Attempt directory whose presence is recorded when the release is filed
    workspace: Option<PathBuf>,
}

impl ReleaseHost for FakeHost {
    async fn list_release_names(&self, _owner: &str, _repo: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn create_release(&self, release: &DraftRelease) -> Result<CreatedRelease> {
        if let Some(workspace) = &self.workspace {
            record(&self.calls, format!("workspace present: {}", workspace.exists()));
        }
        record(&self.calls, format!("create_release {}", release.tag_name));
        if self.fail_create {
            return Err(HostingError::Permission {
                operation: "create release".to_string(),
                message: "Resource not accessible by integration".to_string(),
            }
            .into());
        }
        self.drafts.lock().unwrap().push(release.clone());
        Ok(CreatedRelease {
            id: 1,
            html_url: format!(
                "https://github.com/{}/{}/releases/tag/{}",
                release.owner, release.repo, release.tag_name
            ),
            draft: release.draft,
        })
    }
}

#[derive(Debug)]
struct FixedToken(&'static str);

impl TokenGenerator for FixedToken {
    fn next_token(&self) -> String {
        self.0.to_string()
    }
}

struct Harness {
    root: TempDir,
    calls: Calls,
    drafts: Arc<Mutex<Vec<DraftRelease>>>,
}

impl Harness {
    fn new() -> Self {
        Self {
            root: TempDir::new().unwrap(),
            calls: Calls::default(),
            drafts: Arc::default(),
        }
    }

    fn orchestrator(
        &self,
        repo: FakeRepo,
        host: FakeHost,
    ) -> Orchestrator<FakeRepo, ManifestVersionResolver, FixedNamer, TemplateNotes, FakeHost> {
        let workspaces = WorkspaceManager::new(self.root.path().join("tmp"), Arc::new(FixedToken("attempt")));
        Orchestrator::new(
            workspaces,
            FakeRepo {
                calls: Arc::clone(&self.calls),
                ..repo
            },
            ManifestVersionResolver,
            FixedNamer(Arc::clone(&self.calls)),
            TemplateNotes::new().unwrap(),
            FakeHost {
                calls: Arc::clone(&self.calls),
                drafts: Arc::clone(&self.drafts),
                workspace: Some(self.workspace_path()),
                ..host
            },
        )
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn workspace_path(&self) -> PathBuf {
        self.root.path().join("tmp/widget/attempt")
    }
}

fn bugfix() -> ReleaseRequest {
    ReleaseRequest::new("acme", "widget", ReleaseType::Bugfix)
}

#[tokio::test]
async fn bugfix_release_runs_every_step_in_order() {
    let harness = Harness::new();
    let orchestrator = harness.orchestrator(FakeRepo::default(), FakeHost::default());

    let record = orchestrator.release_and_tag(&bugfix()).await.unwrap();

    assert_eq!(record.version.to_string(), "v1.2.4");
    assert_eq!(record.release_name, "brave-falcon");
    assert_eq!(
        record.release_url,
        "https://github.com/acme/widget/releases/tag/v1.2.4"
    );
    assert!(record.release_notes.contains("Fix widget overflow"));
    assert_eq!(
        harness.calls(),
        vec![
            "clone acme/widget",
            "name",
            "history since v1.2.3",
            "commit v1.2.4 brave-falcon",
            "workspace present: false",
            "create_release v1.2.4",
        ]
    );

    let drafts = harness.drafts.lock().unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].tag_name, "v1.2.4");
    assert_eq!(drafts[0].name, "brave-falcon");
    assert!(drafts[0].draft);
    assert!(!harness.workspace_path().exists());
}

#[tokio::test]
async fn clone_failure_short_circuits_everything_after_it() {
    let harness = Harness::new();
    let orchestrator = harness.orchestrator(
        FakeRepo {
            fail_clone: true,
            ..FakeRepo::default()
        },
        FakeHost::default(),
    );

    let err = orchestrator.release_and_tag(&bugfix()).await.unwrap_err();

    assert!(matches!(
        err,
        ReleaseError::Git(GitError::AuthenticationFailed { .. })
    ));
    assert_eq!(harness.calls(), vec!["clone acme/widget"]);
    assert!(!harness.workspace_path().exists());
}

#[tokio::test]
async fn push_failure_creates_no_release() {
    let harness = Harness::new();
    let orchestrator = harness.orchestrator(
        FakeRepo {
            fail_push: true,
            ..FakeRepo::default()
        },
        FakeHost::default(),
    );

    let err = orchestrator.release_and_tag(&bugfix()).await.unwrap_err();

    assert!(matches!(
        err,
        ReleaseError::Git(GitError::PushFailed {
            kind: PushFailure::Rejected,
            ..
        })
    ));
    assert!(harness.calls().iter().all(|c| !c.starts_with("create_release")));
    assert!(harness.drafts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn cleanup_failure_does_not_change_success() {
    let harness = Harness::new();
    let elsewhere = TempDir::new().unwrap();
    let orchestrator = harness.orchestrator(
        FakeRepo {
            clone_elsewhere: Some(elsewhere.path().to_path_buf()),
            ..FakeRepo::default()
        },
        FakeHost::default(),
    );

    let record = orchestrator.release_and_tag(&bugfix()).await.unwrap();
    assert_eq!(record.version.to_string(), "v1.2.4");
}

#[tokio::test]
async fn cleanup_failure_does_not_mask_push_error() {
    let harness = Harness::new();
    let elsewhere = TempDir::new().unwrap();
    let orchestrator = harness.orchestrator(
        FakeRepo {
            clone_elsewhere: Some(elsewhere.path().to_path_buf()),
            fail_push: true,
            ..FakeRepo::default()
        },
        FakeHost::default(),
    );

    let err = orchestrator.release_and_tag(&bugfix()).await.unwrap_err();
    assert!(matches!(err, ReleaseError::Git(GitError::PushFailed { .. })));
}

#[tokio::test]
async fn workspace_conflict_stops_before_clone() {
    let harness = Harness::new();
    std::fs::create_dir_all(harness.workspace_path()).unwrap();
    let orchestrator = harness.orchestrator(FakeRepo::default(), FakeHost::default());

    let err = orchestrator.release_and_tag(&bugfix()).await.unwrap_err();

    assert!(matches!(
        err,
        ReleaseError::Workspace(WorkspaceError::Conflict { .. })
    ));
    assert!(harness.calls().is_empty());
    // The pre-existing directory belongs to someone else and is left alone
    assert!(harness.workspace_path().exists());
}

#[tokio::test]
async fn hosting_failure_after_push_is_returned_unchanged() {
    let harness = Harness::new();
    let orchestrator = harness.orchestrator(
        FakeRepo::default(),
        FakeHost {
            fail_create: true,
            ..FakeHost::default()
        },
    );

    let err = orchestrator.release_and_tag(&bugfix()).await.unwrap_err();

    assert!(matches!(
        err,
        ReleaseError::Hosting(HostingError::Permission { .. })
    ));
    assert!(harness.calls().contains(&"commit v1.2.4 brave-falcon".to_string()));
}

#[tokio::test]
async fn workspace_is_removed_before_the_release_is_filed() {
    let harness = Harness::new();
    let orchestrator = harness.orchestrator(
        FakeRepo::default(),
        FakeHost {
            fail_create: true,
            ..FakeHost::default()
        },
    );

    orchestrator.release_and_tag(&bugfix()).await.unwrap_err();

    let calls = harness.calls();
    let filed = calls
        .iter()
        .position(|c| c == "create_release v1.2.4")
        .unwrap();
    assert_eq!(calls[filed - 1], "workspace present: false");
    assert!(!harness.workspace_path().exists());
}

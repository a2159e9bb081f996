//! The release pipeline.
//!
//! [`Orchestrator::release_and_tag`] runs, strictly in order:
//!
//! 1. create a workspace named after the repository
//! 2. clone the repository into it
//! 3. resolve the next version (writing it into the manifests)
//! 4. pick a release name unused on the hosting service
//! 5. render release notes from the history since the previous tag
//! 6. commit, tag and push
//! 7. remove the workspace (failures are logged only)
//! 8. file a draft release
//!
//! The first failure is returned unchanged. Nothing is compensated: if step 8
//! fails, the pushed commit and tag stay on the remote.

use crate::error::Result;
use crate::git::{RepositoryClient, RepositoryHandle};
use crate::github::{DraftRelease, ReleaseHost};
use crate::naming::ReleaseNamer;
use crate::notes::{NoteCommit, NotesContext, NotesGenerator};
use crate::version::{VersionResolver, VersionTag};
use crate::workspace::{Workspace, WorkspaceManager};
use crate::{ReleaseRecord, ReleaseRequest};
use std::future::Future;

/// Default cap on commits passed to the notes generator
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Anything that can run a release for a request
pub trait ReleasePipeline {
    /// Run one release to completion or first failure
    fn release_and_tag(
        &self,
        request: &ReleaseRequest,
    ) -> impl Future<Output = Result<ReleaseRecord>>;
}

/// Sequences the release collaborators into one pipeline run
#[derive(Debug)]
pub struct Orchestrator<R, V, N, G, H> {
    workspaces: WorkspaceManager,
    repository: R,
    versions: V,
    namer: N,
    notes: G,
    host: H,
    history_limit: usize,
}

/// Output of steps 2-6, everything the hosting call needs
struct PushedRelease {
    version: VersionTag,
    release_name: String,
    release_notes: String,
}

impl<R, V, N, G, H> Orchestrator<R, V, N, G, H>
where
    R: RepositoryClient,
    V: VersionResolver,
    N: ReleaseNamer,
    G: NotesGenerator,
    H: ReleaseHost,
{
    /// Assemble a pipeline from its collaborators
    pub fn new(
        workspaces: WorkspaceManager,
        repository: R,
        versions: V,
        namer: N,
        notes: G,
        host: H,
    ) -> Self {
        Self {
            workspaces,
            repository,
            versions,
            namer,
            notes,
            host,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Cap the number of commits listed in release notes
    pub fn with_history_limit(mut self, history_limit: usize) -> Self {
        self.history_limit = history_limit;
        self
    }

    /// Run the release pipeline for `request`
    pub async fn release_and_tag(&self, request: &ReleaseRequest) -> Result<ReleaseRecord> {
        let ReleaseRequest {
            owner,
            repo,
            release_type,
        } = request;
        log::info!("Starting {} release of {}/{}", release_type, owner, repo);

        // 1. No workspace means nothing to clean up
        let workspace = self.workspaces.create_workspace(repo).await?;

        // 2-6
        let pushed = self.prepare_and_push(request, &workspace).await;

        // 7. Cleanup is logged, never propagated
        if let Err(e) = self.workspaces.remove_workspace(&workspace).await {
            log::warn!("Workspace cleanup failed (ignored): {}", e);
        }

        let pushed = pushed?;

        // 8.
        let draft = DraftRelease {
            owner: owner.clone(),
            repo: repo.clone(),
            tag_name: pushed.version.to_string(),
            name: pushed.release_name.clone(),
            body: pushed.release_notes.clone(),
            draft: true,
        };
        let created = self.host.create_release(&draft).await.inspect_err(|e| {
            log::error!(
                "{} was pushed to {}/{} but no release was created: {}",
                pushed.version,
                owner,
                repo,
                e
            );
        })?;

        log::info!(
            "Released {}/{} {} \"{}\"",
            owner,
            repo,
            pushed.version,
            pushed.release_name
        );

        Ok(ReleaseRecord {
            version: pushed.version,
            release_name: pushed.release_name,
            release_notes: pushed.release_notes,
            release_url: created.html_url,
        })
    }

    async fn prepare_and_push(
        &self,
        request: &ReleaseRequest,
        workspace: &Workspace,
    ) -> Result<PushedRelease> {
        let ReleaseRequest {
            owner,
            repo,
            release_type,
        } = request;

        // 2.
        let handle = self
            .repository
            .clone_repository(owner, repo, workspace.path())
            .await?;

        // 3.
        let tags = self.repository.tag_names(&handle).await?;
        let resolved = self
            .versions
            .resolve(&handle.path, &tags, *release_type)
            .await?;

        // 4.
        let release_name = self.namer.unique_name(owner, repo).await?;

        // 5.
        let release_notes = self
            .render_notes(request, &handle, &resolved.next, resolved.previous_tag.as_ref(), &release_name)
            .await?;

        // 6.
        let tag_name = resolved.next.to_string();
        self.repository
            .commit_and_tag(&handle, &tag_name, &release_name)
            .await?;

        Ok(PushedRelease {
            version: resolved.next,
            release_name,
            release_notes,
        })
    }

    async fn render_notes(
        &self,
        request: &ReleaseRequest,
        handle: &RepositoryHandle,
        version: &VersionTag,
        previous: Option<&VersionTag>,
        release_name: &str,
    ) -> Result<String> {
        let previous = previous.map(ToString::to_string);
        let commits = self
            .repository
            .recent_commits(handle, previous.as_deref(), self.history_limit)
            .await?;

        let context = NotesContext {
            owner: request.owner.clone(),
            repo: request.repo.clone(),
            version: version.to_string(),
            previous_version: previous,
            release_name: release_name.to_string(),
            date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            commits: commits.iter().map(NoteCommit::from).collect(),
        };
        self.notes.generate(&context).await
    }
}

impl<R, V, N, G, H> ReleasePipeline for Orchestrator<R, V, N, G, H>
where
    R: RepositoryClient,
    V: VersionResolver,
    N: ReleaseNamer,
    G: NotesGenerator,
    H: ReleaseHost,
{
    async fn release_and_tag(&self, request: &ReleaseRequest) -> Result<ReleaseRecord> {
        Orchestrator::release_and_tag(self, request).await
    }
}

#[cfg(test)]
mod tests;

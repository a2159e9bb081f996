//! Workspace allocation and best-effort removal.

use crate::error::{Result, WorkspaceError};
use crate::workspace::TokenGenerator;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// A directory exclusively owned by one release attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    path: PathBuf,
    attempt_id: String,
}

impl Workspace {
    /// Directory holding the clone
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Token generated for this attempt
    pub fn attempt_id(&self) -> &str {
        &self.attempt_id
    }
}

/// Allocates and destroys release workspaces under a fixed root
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    root: PathBuf,
    tokens: Arc<dyn TokenGenerator>,
}

impl WorkspaceManager {
    /// Create a manager placing workspaces under `root`
    pub fn new(root: impl Into<PathBuf>, tokens: Arc<dyn TokenGenerator>) -> Self {
        Self {
            root: root.into(),
            tokens,
        }
    }

    /// Root all workspaces are created under
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Allocate `<root>/<name>/<token>`.
    ///
    /// Fails with [`WorkspaceError::Conflict`] if that exact path already exists.
    /// The existence check and the creation are two separate filesystem calls.
    pub async fn create_workspace(&self, name: &str) -> Result<Workspace> {
        validate_component(name)?;

        let attempt_id = self.tokens.next_token();
        validate_component(&attempt_id)?;

        let path = self.root.join(name).join(&attempt_id);

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|source| WorkspaceError::CreateFailed {
                path: path.clone(),
                source,
            })?;
        if exists {
            return Err(WorkspaceError::Conflict { path }.into());
        }

        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|source| WorkspaceError::CreateFailed {
                path: path.clone(),
                source,
            })?;

        log::debug!("Created workspace {}", path.display());
        Ok(Workspace { path, attempt_id })
    }

    /// Recursively delete a workspace.
    ///
    /// The error is returned for the caller to log; release flows never propagate it.
    pub async fn remove_workspace(
        &self,
        workspace: &Workspace,
    ) -> std::result::Result<(), WorkspaceError> {
        tokio::fs::remove_dir_all(&workspace.path)
            .await
            .map_err(|source| WorkspaceError::RemoveFailed {
                path: workspace.path.clone(),
                source,
            })?;

        // Drop the per-repo parent once its last attempt is gone
        if let Some(parent) = workspace.path.parent()
            && parent != self.root
        {
            let _ = tokio::fs::remove_dir(parent).await;
        }

        log::debug!("Removed workspace {}", workspace.path.display());
        Ok(())
    }
}

fn validate_component(name: &str) -> std::result::Result<(), WorkspaceError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(WorkspaceError::InvalidName {
            name: name.to_string(),
        }),
    }
}

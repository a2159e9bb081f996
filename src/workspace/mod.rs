//! Ephemeral release workspaces.
//!
//! Each release attempt owns exactly one directory at
//! `<temp_root>/<name>/<token>`, holding one clone. Tokens come from an
//! injected [`TokenGenerator`] so concurrent attempts never share a path.

mod manager;
mod tokens;

pub use manager::{Workspace, WorkspaceManager};
pub use tokens::{TokenGenerator, UuidTokens};

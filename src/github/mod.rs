//! GitHub integration for release operations

mod release_manager;

pub use release_manager::{
    CreatedRelease, DraftRelease, GitHubReleaseConfig, GitHubReleaseManager, ReleaseHost,
};

//! Next-version resolution for a fresh clone.

use crate::ReleaseType;
use crate::error::{Result, VersionError};
use crate::version::{
    ManifestKind, VersionBumper, VersionTag, read_manifest_version, update_manifest_version,
};
use semver::Version;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Supplies the next release version for a cloned repository
pub trait VersionResolver {
    /// Compute the next version and write it into the working tree
    fn resolve(
        &self,
        workdir: &Path,
        tags: &[String],
        release_type: ReleaseType,
    ) -> impl Future<Output = Result<ResolvedVersion>>;
}

/// Outcome of version resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// Highest release tag found, if any
    pub previous_tag: Option<VersionTag>,
    /// Version the bump started from
    pub previous: Version,
    /// New release version
    pub next: VersionTag,
    /// Manifests rewritten with the new version
    pub modified_files: Vec<PathBuf>,
}

/// Resolves versions from `v<semver>` tags and root manifests.
///
/// The prior version is the highest of every release tag and every manifest
/// version; `0.0.0` when the repository has neither.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestVersionResolver;

impl ManifestVersionResolver {
    fn resolve_blocking(
        workdir: &Path,
        tags: &[String],
        release_type: ReleaseType,
    ) -> Result<ResolvedVersion> {
        let previous_tag = tags
            .iter()
            .filter_map(|tag| tag.parse::<VersionTag>().ok())
            .max();

        let mut previous = previous_tag
            .as_ref()
            .map(|tag| tag.version().clone())
            .unwrap_or_else(|| Version::new(0, 0, 0));

        for kind in ManifestKind::ALL {
            if let Some(declared) = read_manifest_version(kind, &kind.path_in(workdir))?
                && declared > previous
            {
                previous = declared;
            }
        }

        let next = VersionBumper::from_version(previous.clone()).bump(release_type.bump())?;
        if next <= previous {
            return Err(VersionError::NotIncreasing {
                previous: previous.to_string(),
                next: next.to_string(),
            }
            .into());
        }

        let mut modified_files = Vec::new();
        for kind in ManifestKind::ALL {
            let path = kind.path_in(workdir);
            if update_manifest_version(kind, &path, &next)? {
                modified_files.push(path);
            }
        }

        log::info!(
            "Resolved {} release: {} -> v{} ({} manifest(s) updated)",
            release_type,
            previous,
            next,
            modified_files.len()
        );

        Ok(ResolvedVersion {
            previous_tag,
            previous,
            next: VersionTag::new(next),
            modified_files,
        })
    }
}

impl VersionResolver for ManifestVersionResolver {
    async fn resolve(
        &self,
        workdir: &Path,
        tags: &[String],
        release_type: ReleaseType,
    ) -> Result<ResolvedVersion> {
        let workdir = workdir.to_path_buf();
        let tags = tags.to_vec();
        tokio::task::spawn_blocking(move || Self::resolve_blocking(&workdir, &tags, release_type))
            .await
            .map_err(|e| VersionError::ResolveFailed {
                reason: format!("Task join error: {e}"),
            })?
    }
}

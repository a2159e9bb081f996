//! Version management for release runs.
//!
//! This module provides semantic version bumping, format-preserving manifest
//! edits and the resolver that picks the next release version for a clone.

mod bumper;
mod manifest;
mod resolver;

pub use bumper::{VersionBump, VersionBumper};
pub use manifest::{ManifestKind, read_manifest_version, update_manifest_version};
pub use resolver::{ManifestVersionResolver, ResolvedVersion, VersionResolver};

use crate::error::VersionError;
use semver::Version;
use std::fmt;
use std::str::FromStr;

/// A release tag of the form `v<semver>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionTag(Version);

impl VersionTag {
    /// Wrap a version
    pub fn new(version: Version) -> Self {
        Self(version)
    }

    /// Underlying semantic version
    pub fn version(&self) -> &Version {
        &self.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl FromStr for VersionTag {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix('v').ok_or_else(|| VersionError::InvalidVersion {
            version: s.to_string(),
            reason: "release tags start with 'v'".to_string(),
        })?;
        Version::parse(raw)
            .map(Self)
            .map_err(|source| VersionError::ParseFailed {
                version: s.to_string(),
                source,
            })
    }
}

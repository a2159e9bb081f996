//! Semantic version bumping.

use crate::error::VersionError;
use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;

/// Version component to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    /// Breaking change: `x.0.0`
    Major,
    /// New functionality: `_.x.0`
    Minor,
    /// Fixes only: `_._.x`
    Patch,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => write!(f, "major"),
            VersionBump::Minor => write!(f, "minor"),
            VersionBump::Patch => write!(f, "patch"),
        }
    }
}

/// Computes bumped versions from a starting point
#[derive(Debug, Clone)]
pub struct VersionBumper {
    current: Version,
}

impl VersionBumper {
    /// Start from `current`
    pub fn from_version(current: Version) -> Self {
        Self { current }
    }

    /// Version being bumped
    pub fn current(&self) -> &Version {
        &self.current
    }

    /// Apply `bump`, resetting lower components and dropping pre-release/build metadata
    pub fn bump(&self, bump: VersionBump) -> Result<Version, VersionError> {
        let Version {
            major,
            minor,
            patch,
            ..
        } = self.current;

        let incremented = |component: u64| {
            component.checked_add(1).ok_or_else(|| VersionError::Overflow {
                version: self.current.to_string(),
                component: bump,
            })
        };

        let (major, minor, patch) = match bump {
            VersionBump::Major => (incremented(major)?, 0, 0),
            VersionBump::Minor => (major, incremented(minor)?, 0),
            VersionBump::Patch => (major, minor, incremented(patch)?),
        };

        Ok(Version {
            major,
            minor,
            patch,
            pre: Prerelease::EMPTY,
            build: BuildMetadata::EMPTY,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bumps_reset_lower_components() {
        let bumper = VersionBumper::from_version(Version::new(1, 2, 3));
        assert_eq!(bumper.bump(VersionBump::Patch).unwrap(), Version::new(1, 2, 4));
        assert_eq!(bumper.bump(VersionBump::Minor).unwrap(), Version::new(1, 3, 0));
        assert_eq!(bumper.bump(VersionBump::Major).unwrap(), Version::new(2, 0, 0));
    }

    #[test]
    fn prerelease_metadata_is_dropped() {
        let bumper = VersionBumper::from_version(Version::parse("1.2.3-rc.1+build.5").unwrap());
        assert_eq!(bumper.bump(VersionBump::Patch).unwrap(), Version::new(1, 2, 4));
    }

    #[test]
    fn maxed_out_component_is_an_error() {
        let bumper = VersionBumper::from_version(Version::new(1, 2, u64::MAX));
        let err = bumper.bump(VersionBump::Patch).unwrap_err();
        assert!(matches!(
            err,
            VersionError::Overflow {
                component: VersionBump::Patch,
                ..
            }
        ));
        assert!(err.to_string().contains("patch component overflows"));

        // Lower components reset, so only the bumped one matters
        assert_eq!(bumper.bump(VersionBump::Minor).unwrap(), Version::new(1, 3, 0));
    }
}

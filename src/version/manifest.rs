//! Reading and writing the version field of project manifests.
//!
//! `Cargo.toml` is edited with `toml_edit` so comments and layout survive;
//! `package.json` keeps its key order through serde_json's `preserve_order`.

use crate::error::{Result, VersionError};
use semver::Version;
use std::path::{Path, PathBuf};

/// Manifest formats carrying a project version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// Rust `Cargo.toml`
    Cargo,
    /// Node `package.json`
    PackageJson,
}

impl ManifestKind {
    /// Every supported manifest
    pub const ALL: [ManifestKind; 2] = [ManifestKind::Cargo, ManifestKind::PackageJson];

    /// File name at the repository root
    pub fn file_name(self) -> &'static str {
        match self {
            ManifestKind::Cargo => "Cargo.toml",
            ManifestKind::PackageJson => "package.json",
        }
    }

    /// Manifest path under `workdir`
    pub fn path_in(self, workdir: &Path) -> PathBuf {
        workdir.join(self.file_name())
    }
}

fn update_failed(path: &Path, reason: impl Into<String>) -> VersionError {
    VersionError::ManifestUpdateFailed {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn parse_version(path: &Path, raw: &str) -> Result<Version> {
    Version::parse(raw).map_err(|source| {
        VersionError::ParseFailed {
            version: format!("{raw} (in {})", path.display()),
            source,
        }
        .into()
    })
}

/// Version declared by a manifest, `None` when the file or field is absent
pub fn read_manifest_version(kind: ManifestKind, path: &Path) -> Result<Option<Version>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| update_failed(path, format!("Failed to read file: {e}")))?;

    let raw = match kind {
        ManifestKind::Cargo => {
            let doc = content
                .parse::<toml_edit::DocumentMut>()
                .map_err(|e| update_failed(path, format!("Failed to parse TOML: {e}")))?;
            cargo_version_item(&doc).and_then(|item| item.as_str().map(str::to_string))
        }
        ManifestKind::PackageJson => {
            let json: serde_json::Value = serde_json::from_str(&content)
                .map_err(|e| update_failed(path, format!("Failed to parse JSON: {e}")))?;
            json.get("version")
                .and_then(|v| v.as_str())
                .map(str::to_string)
        }
    };

    raw.map(|raw| parse_version(path, &raw)).transpose()
}

/// `[package].version` when it is a literal, else `[workspace.package].version`
fn cargo_version_item(doc: &toml_edit::DocumentMut) -> Option<&toml_edit::Item> {
    let package = doc
        .get("package")
        .and_then(|p| p.get("version"))
        .filter(|v| v.is_str());
    package.or_else(|| {
        doc.get("workspace")
            .and_then(|w| w.get("package"))
            .and_then(|p| p.get("version"))
            .filter(|v| v.is_str())
    })
}

/// Write `new_version` into a manifest.
///
/// Returns `false` without touching the file when it declares no literal version.
pub fn update_manifest_version(kind: ManifestKind, path: &Path, new_version: &Version) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| update_failed(path, format!("Failed to read file: {e}")))?;

    let updated = match kind {
        ManifestKind::Cargo => {
            let mut doc = content
                .parse::<toml_edit::DocumentMut>()
                .map_err(|e| update_failed(path, format!("Failed to parse TOML: {e}")))?;

            let has_package_version = doc
                .get("package")
                .and_then(|p| p.get("version"))
                .is_some_and(|v| v.is_str());
            let has_workspace_version = doc
                .get("workspace")
                .and_then(|w| w.get("package"))
                .and_then(|p| p.get("version"))
                .is_some_and(|v| v.is_str());

            if has_package_version {
                doc["package"]["version"] = toml_edit::value(new_version.to_string());
            }
            if has_workspace_version {
                doc["workspace"]["package"]["version"] = toml_edit::value(new_version.to_string());
            }
            if !has_package_version && !has_workspace_version {
                return Ok(false);
            }
            doc.to_string()
        }
        ManifestKind::PackageJson => {
            let mut json: serde_json::Value = serde_json::from_str(&content)
                .map_err(|e| update_failed(path, format!("Failed to parse JSON: {e}")))?;
            let Some(version) = json.get_mut("version").filter(|v| v.is_string()) else {
                return Ok(false);
            };
            *version = serde_json::Value::String(new_version.to_string());

            let mut rendered = serde_json::to_string_pretty(&json)?;
            if content.ends_with('\n') {
                rendered.push('\n');
            }
            rendered
        }
    };

    std::fs::write(path, updated)
        .map_err(|e| update_failed(path, format!("Failed to write file: {e}")))?;
    log::debug!("Set version {} in {}", new_version, path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cargo_edit_preserves_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cargo.toml");
        std::fs::write(
            &path,
            "[package]\nname = \"widget\" # the widget\nversion = \"1.2.3\"\n",
        )
        .unwrap();

        assert_eq!(
            read_manifest_version(ManifestKind::Cargo, &path).unwrap(),
            Some(Version::new(1, 2, 3))
        );
        assert!(update_manifest_version(ManifestKind::Cargo, &path, &Version::new(1, 2, 4)).unwrap());

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("# the widget"));
        assert!(written.contains("version = \"1.2.4\""));
    }

    #[test]
    fn cargo_workspace_inheritance_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cargo.toml");
        std::fs::write(
            &path,
            "[workspace.package]\nversion = \"0.4.0\"\n\n[package]\nname = \"w\"\nversion.workspace = true\n",
        )
        .unwrap();

        assert_eq!(
            read_manifest_version(ManifestKind::Cargo, &path).unwrap(),
            Some(Version::new(0, 4, 0))
        );
        assert!(update_manifest_version(ManifestKind::Cargo, &path, &Version::new(0, 5, 0)).unwrap());

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("version = \"0.5.0\""));
        assert!(written.contains("version.workspace = true"));
    }

    #[test]
    fn package_json_keeps_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, "{\n  \"name\": \"widget\",\n  \"version\": \"1.2.3\",\n  \"main\": \"index.js\"\n}\n").unwrap();

        assert!(
            update_manifest_version(ManifestKind::PackageJson, &path, &Version::new(1, 3, 0)).unwrap()
        );

        let written = std::fs::read_to_string(&path).unwrap();
        let name = written.find("\"name\"").unwrap();
        let version = written.find("\"version\"").unwrap();
        let main = written.find("\"main\"").unwrap();
        assert!(name < version && version < main);
        assert!(written.contains("\"version\": \"1.3.0\""));
        assert!(written.ends_with("}\n"));
    }

    #[test]
    fn absent_manifest_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = ManifestKind::Cargo.path_in(dir.path());
        assert_eq!(read_manifest_version(ManifestKind::Cargo, &path).unwrap(), None);
        assert!(!update_manifest_version(ManifestKind::Cargo, &path, &Version::new(1, 0, 0)).unwrap());
    }
}

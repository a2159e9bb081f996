//! Release notes rendering.
//!
//! Notes are a handlebars template rendered against the new version, the
//! release name and the commits since the previous release tag.

use crate::error::{NotesError, Result};
use crate::git::CommitInfo;
use anyhow::Context;
use handlebars::Handlebars;
use serde::Serialize;
use std::future::Future;
use std::path::Path;

const TEMPLATE_NAME: &str = "release_notes";

/// Built-in release notes layout
pub const DEFAULT_TEMPLATE: &str = r#"## {{version}} "{{release_name}}"

Released {{date}} for {{owner}}/{{repo}}.

{{#if previous_version}}
### Changes since {{previous_version}}
{{else}}
### Initial release
{{/if}}

{{#each commits}}
- {{summary}} ({{short_hash}}, {{author}})
{{else}}
- No changes recorded
{{/each}}
"#;

/// Values available to the notes template
#[derive(Debug, Clone, Serialize)]
pub struct NotesContext {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// New version tag
    pub version: String,
    /// Previous release tag, if any
    pub previous_version: Option<String>,
    /// Unique release name
    pub release_name: String,
    /// Release date (UTC, `YYYY-MM-DD`)
    pub date: String,
    /// Commits included in this release, newest first
    pub commits: Vec<NoteCommit>,
}

/// One commit line in the notes
#[derive(Debug, Clone, Serialize)]
pub struct NoteCommit {
    /// Abbreviated hash
    pub short_hash: String,
    /// First message line
    pub summary: String,
    /// Author name
    pub author: String,
}

impl From<&CommitInfo> for NoteCommit {
    fn from(commit: &CommitInfo) -> Self {
        Self {
            short_hash: commit.short_hash.clone(),
            summary: commit.summary.clone(),
            author: commit.author_name.clone(),
        }
    }
}

/// Produces release notes text
pub trait NotesGenerator {
    /// Render notes for one release
    fn generate(&self, context: &NotesContext) -> impl Future<Output = Result<String>>;
}

/// Handlebars-backed notes generator
#[derive(Debug)]
pub struct TemplateNotes {
    registry: Handlebars<'static>,
}

impl TemplateNotes {
    /// Generator using [`DEFAULT_TEMPLATE`]
    pub fn new() -> Result<Self> {
        Self::from_template(DEFAULT_TEMPLATE)
    }

    /// Generator using a custom template
    pub fn from_template(template: &str) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        // Notes are markdown, not HTML
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(NotesError::Template)?;
        Ok(Self { registry })
    }

    /// Generator using a template file
    pub fn from_file(path: &Path) -> Result<Self> {
        let template = std::fs::read_to_string(path)
            .with_context(|| format!("reading notes template {}", path.display()))?;
        Self::from_template(&template)
    }

    fn render(&self, context: &NotesContext) -> std::result::Result<String, NotesError> {
        let rendered = self.registry.render(TEMPLATE_NAME, context)?;
        Ok(collapse_blank_lines(&rendered))
    }
}

impl NotesGenerator for TemplateNotes {
    async fn generate(&self, context: &NotesContext) -> Result<String> {
        Ok(self.render(context)?)
    }
}

/// Squeeze runs of blank lines left behind by block helpers
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.trim().lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(commits: Vec<NoteCommit>, previous: Option<&str>) -> NotesContext {
        NotesContext {
            owner: "acme".to_string(),
            repo: "widget".to_string(),
            version: "v1.2.4".to_string(),
            previous_version: previous.map(str::to_string),
            release_name: "brave-falcon".to_string(),
            date: "2026-10-14".to_string(),
            commits,
        }
    }

    #[tokio::test]
    async fn default_template_lists_commits() {
        let notes = TemplateNotes::new().unwrap();
        let text = notes
            .generate(&context(
                vec![NoteCommit {
                    short_hash: "abc1234".to_string(),
                    summary: "Fix <overflow> in parser".to_string(),
                    author: "Dana".to_string(),
                }],
                Some("v1.2.3"),
            ))
            .await
            .unwrap();

        assert!(text.starts_with("## v1.2.4 \"brave-falcon\""));
        assert!(text.contains("### Changes since v1.2.3"));
        assert!(text.contains("- Fix <overflow> in parser (abc1234, Dana)"));
        assert!(!text.contains("\n\n\n"));
    }

    #[tokio::test]
    async fn first_release_has_no_previous_version() {
        let notes = TemplateNotes::new().unwrap();
        let text = notes.generate(&context(vec![], None)).await.unwrap();
        assert!(text.contains("### Initial release"));
        assert!(text.contains("- No changes recorded"));
    }

    #[test]
    fn malformed_template_is_rejected() {
        let err = TemplateNotes::from_template("{{#each commits}}").unwrap_err();
        assert!(matches!(
            err,
            crate::error::ReleaseError::Notes(NotesError::Template(_))
        ));
    }

    #[tokio::test]
    async fn unknown_field_fails_in_strict_mode() {
        let notes = TemplateNotes::from_template("{{codename}}").unwrap();
        let err = notes.generate(&context(vec![], None)).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::ReleaseError::Notes(NotesError::Render(_))
        ));
    }

    #[test]
    fn missing_template_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.hbs");
        let err = TemplateNotes::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("notes.hbs"));
    }

    #[tokio::test]
    async fn template_file_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.hbs");
        std::fs::write(&path, "{{repo}} {{version}}").unwrap();
        let notes = TemplateNotes::from_file(&path).unwrap();
        let text = notes.generate(&context(vec![], None)).await.unwrap();
        assert_eq!(text.trim(), "widget v1.2.4");
    }
}

//! Shared helper functions for command execution.

use crate::cli::{OutputManager, RuntimeConfig};
use crate::config::{AppConfig, Credentials};
use crate::conversation::Reporter;
use crate::error::{CliError, ConfigError, ReleaseError, Result};
use crate::git::{Git2Client, KeyPairCredentials};
use crate::github::{GitHubReleaseConfig, GitHubReleaseManager};
use crate::naming::WordListNamer;
use crate::notes::TemplateNotes;
use crate::orchestrator::Orchestrator;
use crate::version::ManifestVersionResolver;
use crate::workspace::{UuidTokens, WorkspaceManager};
use crate::ReleaseRecord;
use std::sync::Arc;

/// Fallback token variable consulted after `GH_TOKEN`
const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// The pipeline wired to libgit2 and the GitHub REST API
pub(super) type ProductionOrchestrator = Orchestrator<
    Git2Client,
    ManifestVersionResolver,
    WordListNamer<GitHubReleaseManager>,
    TemplateNotes,
    GitHubReleaseManager,
>;

/// Everything loaded before the first request is accepted
pub(super) struct Startup {
    pub config: AppConfig,
    pub credentials: Credentials,
    pub token: String,
}

/// Load configuration and credentials; any failure here is fatal.
///
/// Nothing is created on disk and no network call is made.
pub(super) fn load_startup(config: &RuntimeConfig, token_arg: Option<&str>) -> Result<Startup> {
    let paths = config.paths();
    let app_config = AppConfig::load(paths)?;
    config.verbose_println(&format!("Application root: {}", paths.root().display()));

    let credentials = Credentials::from_env(paths, &app_config.identity)?;
    credentials.verify_key_files()?;
    config.verbose_println(&format!(
        "Key pair: {}",
        credentials.private_key().display()
    ));

    let token = resolve_token(
        token_arg,
        std::env::var(GITHUB_TOKEN_VAR).ok(),
        app_config.github_token.as_deref(),
    )?;

    Ok(Startup {
        config: app_config,
        credentials,
        token,
    })
}

/// First non-empty token among the flag/`GH_TOKEN`, `GITHUB_TOKEN` and the config file
pub(super) fn resolve_token(
    from_args: Option<&str>,
    from_env: Option<String>,
    from_config: Option<&str>,
) -> std::result::Result<String, ConfigError> {
    from_args
        .map(str::to_string)
        .into_iter()
        .chain(from_env)
        .chain(from_config.map(str::to_string))
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
        .ok_or(ConfigError::MissingToken)
}

/// Assemble the production pipeline from loaded startup state
pub(super) fn build_orchestrator(
    config: &RuntimeConfig,
    startup: Startup,
) -> Result<ProductionOrchestrator> {
    let Startup {
        config: app_config,
        credentials,
        token,
    } = startup;

    let host = GitHubReleaseManager::new(GitHubReleaseConfig {
        api_url: app_config.github_api_url.clone(),
        token,
    })?;

    let notes = match &app_config.notes_template {
        Some(path) => {
            config.verbose_println(&format!("Notes template: {}", path.display()));
            TemplateNotes::from_file(path)?
        }
        None => TemplateNotes::new()?,
    };

    let repository = Git2Client::new(
        Arc::new(KeyPairCredentials::new(credentials)),
        app_config.remote_url_template.clone(),
        app_config.bot.clone(),
    );

    let workspaces = WorkspaceManager::new(config.paths().workspace_root(), Arc::new(UuidTokens));

    Ok(Orchestrator::new(
        workspaces,
        repository,
        ManifestVersionResolver,
        WordListNamer::new(host.clone()).with_max_attempts(app_config.naming_attempts),
        notes,
        host,
    )
    .with_history_limit(app_config.history_limit))
}

/// Split `owner/repo`
pub(super) fn parse_repo(repo: &str) -> Result<(String, String)> {
    match repo.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(ReleaseError::Cli(CliError::InvalidArguments {
            reason: format!("Invalid GitHub repository format: '{}'. Expected: owner/repo", repo),
        })),
    }
}

/// Conversation output on the operator console
pub(super) struct TerminalReporter<'a> {
    output: &'a OutputManager,
}

impl<'a> TerminalReporter<'a> {
    pub(super) fn new(output: &'a OutputManager) -> Self {
        Self { output }
    }
}

impl Reporter for TerminalReporter<'_> {
    fn prompt(&self, text: &str) {
        let _ = self.output.question(text);
    }

    fn released(&self, record: &ReleaseRecord) {
        let _ = self.output.success(&format!(
            "Released {} \"{}\"",
            record.version, record.release_name
        ));
        let _ = self.output.indent(&format!("Draft: {}", record.release_url));
    }

    fn failed(&self, message: &str) {
        self.output.error(&format!("Release failed: {message}"));
    }

    fn cancelled(&self) {
        let _ = self.output.warn("No release type given; nothing was released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_sources_are_tried_in_order() {
        assert_eq!(
            resolve_token(Some("flag"), Some("env".into()), Some("file")).unwrap(),
            "flag"
        );
        assert_eq!(
            resolve_token(Some("  "), Some("env".into()), Some("file")).unwrap(),
            "env"
        );
        assert_eq!(resolve_token(None, None, Some("file")).unwrap(), "file");
        assert!(matches!(
            resolve_token(None, Some(String::new()), None),
            Err(ConfigError::MissingToken)
        ));
    }

    #[test]
    fn repository_argument_splits_on_one_slash() {
        assert_eq!(
            parse_repo("acme/widget").unwrap(),
            ("acme".to_string(), "widget".to_string())
        );
        assert!(parse_repo("acme").is_err());
        assert!(parse_repo("acme/widget/x").is_err());
    }
}

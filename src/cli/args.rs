//! Command line argument parsing and validation.

use crate::ReleaseType;
use crate::config::AppPaths;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Conversational release bot for GitHub repositories
#[derive(Parser, Debug)]
#[command(
    name = "release_bot",
    version,
    about = "Conversational release bot for GitHub repositories",
    long_about = "Bump, tag, push and file a draft GitHub release after a short exchange.

Usage:
  release_bot chat
  release_bot release acme/widget
  release_bot release acme/widget --type bugfix
  release_bot check"
)]
pub struct Args {
    /// Application root holding ssh-keys/, tmp/ and release-bot.toml
    #[arg(long, global = true, env = "RELEASE_BOT_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// GitHub token (falls back to GITHUB_TOKEN, then the config file)
    #[arg(long, global = true, env = "GH_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Show verbose progress output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Listen on stdin for trigger phrases and hold release conversations
    Chat,

    /// Release one repository, asking for the release type unless given
    Release {
        /// Repository as owner/repo
        #[arg(value_name = "OWNER/REPO")]
        repo: String,

        /// Answer the release-type question up front
        #[arg(long = "type", value_enum)]
        release_type: Option<ReleaseTypeArg>,
    },

    /// Validate startup configuration without touching any repository
    Check,
}

impl Command {
    /// Command name, for messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Chat => "chat",
            Command::Release { .. } => "release",
            Command::Check => "check",
        }
    }
}

/// Release type as accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseTypeArg {
    /// Minor bump
    Feature,
    /// Patch bump
    Bugfix,
}

impl From<ReleaseTypeArg> for ReleaseType {
    fn from(arg: ReleaseTypeArg) -> Self {
        match arg {
            ReleaseTypeArg::Feature => ReleaseType::Feature,
            ReleaseTypeArg::Bugfix => ReleaseType::Bugfix,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if let Command::Release { repo, .. } = &self.command {
            let valid = repo
                .split_once('/')
                .is_some_and(|(owner, name)| {
                    !owner.is_empty() && !name.is_empty() && !name.contains('/')
                });
            if !valid {
                return Err(format!(
                    "Invalid repository '{}'. Expected: owner/repo",
                    repo
                ));
            }
        }

        if self.root.as_os_str().is_empty() {
            return Err("Application root must not be empty".to_string());
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
    paths: AppPaths,
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Application paths
    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print message only in verbose mode
    pub fn verbose_println(&self, message: &str) {
        let _ = self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose),
            paths: AppPaths::new(&args.root),
        }
    }
}

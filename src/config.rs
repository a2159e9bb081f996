//! Startup configuration: application paths, the key-pair credentials and the
//! optional `release-bot.toml` file.
//!
//! Everything here is loaded once in `main` and handed to the pipeline by
//! reference. Nothing is mutated after startup.

use crate::conversation::TriggerBinding;
use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable holding the SSH key passphrase
pub const PASSPHRASE_VAR: &str = "RELEASE_BOT_KEY_PASSPHRASE";

/// Name of the optional configuration file under the application root
pub const CONFIG_FILE_NAME: &str = "release-bot.toml";

/// Filesystem layout rooted at the application directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    /// Create paths rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Application root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parent of every release workspace: `<root>/tmp`
    pub fn workspace_root(&self) -> PathBuf {
        self.root.join("tmp")
    }

    /// Directory holding key pairs: `<root>/ssh-keys`
    pub fn key_dir(&self) -> PathBuf {
        self.root.join("ssh-keys")
    }

    /// Configuration file: `<root>/release-bot.toml`
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }
}

/// Key-pair credentials for the git transport.
///
/// The passphrase is guaranteed non-empty; construction fails otherwise.
#[derive(Clone)]
pub struct Credentials {
    passphrase: String,
    public_key: PathBuf,
    private_key: PathBuf,
}

impl Credentials {
    /// Load the passphrase from [`PASSPHRASE_VAR`] and derive the key locations
    pub fn from_env(paths: &AppPaths, identity: &str) -> Result<Self, ConfigError> {
        Self::new(std::env::var(PASSPHRASE_VAR).ok(), paths, identity)
    }

    /// Build credentials from an explicit passphrase value
    pub fn new(
        passphrase: Option<String>,
        paths: &AppPaths,
        identity: &str,
    ) -> Result<Self, ConfigError> {
        let passphrase = passphrase
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ConfigError::MissingPassphrase {
                var: PASSPHRASE_VAR.to_string(),
            })?;

        let key_dir = paths.key_dir();
        Ok(Self {
            passphrase,
            public_key: key_dir.join(format!("{identity}.pub")),
            private_key: key_dir.join(identity),
        })
    }

    /// Passphrase unlocking the private key
    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    /// Public key location
    pub fn public_key(&self) -> &Path {
        &self.public_key
    }

    /// Private key location
    pub fn private_key(&self) -> &Path {
        &self.private_key
    }

    /// Check both key files exist
    pub fn verify_key_files(&self) -> Result<(), ConfigError> {
        for path in [&self.public_key, &self.private_key] {
            if !path.is_file() {
                return Err(ConfigError::MissingKeyFile { path: path.clone() });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("passphrase", &"<redacted>")
            .field("public_key", &self.public_key)
            .field("private_key", &self.private_key)
            .finish()
    }
}

/// Author and committer of release commits
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BotIdentity {
    /// Signature name
    pub name: String,
    /// Signature email
    pub email: String,
}

impl Default for BotIdentity {
    fn default() -> Self {
        Self {
            name: "release-bot".to_string(),
            email: "release-bot@users.noreply.github.com".to_string(),
        }
    }
}

/// Contents of `release-bot.toml`. Every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Key-pair file stem under `ssh-keys/`
    pub identity: String,
    /// Commit and tag signature
    pub bot: BotIdentity,
    /// Clone URL with `{owner}` and `{repo}` placeholders
    pub remote_url_template: String,
    /// GitHub REST API base URL
    pub github_api_url: String,
    /// GitHub token (overridden by GH_TOKEN / GITHUB_TOKEN)
    pub github_token: Option<String>,
    /// Handlebars template replacing the built-in release notes layout
    pub notes_template: Option<PathBuf>,
    /// Maximum commits listed in release notes
    pub history_limit: usize,
    /// Draws attempted before giving up on an unused release name
    pub naming_attempts: usize,
    /// Chat trigger phrases and the repository each one releases
    pub triggers: Vec<TriggerBinding>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            identity: "release-bot".to_string(),
            bot: BotIdentity::default(),
            remote_url_template: "git@github.com:{owner}/{repo}.git".to_string(),
            github_api_url: "https://api.github.com".to_string(),
            github_token: None,
            notes_template: None,
            history_limit: 50,
            naming_attempts: 64,
            triggers: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load the configuration file, falling back to defaults when it is absent
    pub fn load(paths: &AppPaths) -> Result<Self, ConfigError> {
        let path = paths.config_file();
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::InvalidFile {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let mut config = Self::parse(&content).map_err(|reason| ConfigError::InvalidFile {
            path: path.clone(),
            reason,
        })?;

        // Relative template paths resolve against the application root
        if let Some(template) = config.notes_template.take() {
            config.notes_template = Some(if template.is_relative() {
                paths.root().join(template)
            } else {
                template
            });
        }

        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}

//! GitHub Release management over the REST API

use crate::error::{HostingError, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Releases fetched per page when listing
const PAGE_SIZE: usize = 100;

/// Hosting service collaborator: release listing and draft creation
pub trait ReleaseHost {
    /// Names of every existing release of `owner/repo`
    fn list_release_names(
        &self,
        owner: &str,
        repo: &str,
    ) -> impl Future<Output = Result<Vec<String>>>;

    /// File a release
    fn create_release(&self, release: &DraftRelease) -> impl Future<Output = Result<CreatedRelease>>;
}

/// Release to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRelease {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Tag the release points at
    pub tag_name: String,
    /// Release title
    pub name: String,
    /// Release notes
    pub body: String,
    /// Whether the release is a draft
    pub draft: bool,
}

/// Result of GitHub release operation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedRelease {
    /// Release ID
    pub id: u64,
    /// Release URL
    pub html_url: String,
    /// Whether this was a draft
    #[serde(default)]
    pub draft: bool,
}

/// Configuration for GitHub releases
#[derive(Debug, Clone)]
pub struct GitHubReleaseConfig {
    /// REST API base URL
    pub api_url: String,
    /// Bearer token
    pub token: String,
}

impl Default for GitHubReleaseConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token: String::new(),
        }
    }
}

/// GitHub release manager
#[derive(Debug, Clone)]
pub struct GitHubReleaseManager {
    client: reqwest::Client,
    api_url: String,
}

#[derive(Serialize)]
struct CreateReleaseBody<'a> {
    tag_name: &'a str,
    name: &'a str,
    body: &'a str,
    draft: bool,
}

#[derive(Deserialize)]
struct ListedRelease {
    name: Option<String>,
}

#[derive(Deserialize, Default)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: String,
}

impl GitHubReleaseManager {
    /// Create new GitHub release manager
    pub fn new(config: GitHubReleaseConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("release_bot/", env!("CARGO_PKG_VERSION"))),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token)).map_err(|e| {
            HostingError::Api {
                operation: "configure client".to_string(),
                status: 0,
                message: format!("invalid token: {e}"),
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|source| HostingError::Transport {
                operation: "configure client".to_string(),
                source,
            })?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn releases_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}/releases", self.api_url, owner, repo)
    }
}

impl ReleaseHost for GitHubReleaseManager {
    async fn list_release_names(&self, owner: &str, repo: &str) -> Result<Vec<String>> {
        let operation = "list releases";
        let url = self.releases_url(owner, repo);
        let mut names = Vec::new();

        for page in 1.. {
            let response = self
                .client
                .get(&url)
                .query(&[("per_page", PAGE_SIZE), ("page", page)])
                .send()
                .await
                .map_err(|source| HostingError::Transport {
                    operation: operation.to_string(),
                    source,
                })?;

            if !response.status().is_success() {
                return Err(error_for(operation, "", response).await.into());
            }

            let releases: Vec<ListedRelease> =
                response
                    .json()
                    .await
                    .map_err(|source| HostingError::Transport {
                        operation: operation.to_string(),
                        source,
                    })?;

            let count = releases.len();
            names.extend(releases.into_iter().filter_map(|r| r.name));
            if count < PAGE_SIZE {
                break;
            }
        }

        log::debug!("{}/{} has {} named release(s)", owner, repo, names.len());
        Ok(names)
    }

    async fn create_release(&self, release: &DraftRelease) -> Result<CreatedRelease> {
        let operation = "create release";
        let response = self
            .client
            .post(self.releases_url(&release.owner, &release.repo))
            .json(&CreateReleaseBody {
                tag_name: &release.tag_name,
                name: &release.name,
                body: &release.body,
                draft: release.draft,
            })
            .send()
            .await
            .map_err(|source| HostingError::Transport {
                operation: operation.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(error_for(operation, &release.tag_name, response)
                .await
                .into());
        }

        let created: CreatedRelease =
            response
                .json()
                .await
                .map_err(|source| HostingError::Transport {
                    operation: operation.to_string(),
                    source,
                })?;

        log::info!(
            "Created {} release {} at {}",
            if created.draft { "draft" } else { "published" },
            release.tag_name,
            created.html_url
        );
        Ok(created)
    }
}

/// Map a non-success response onto the hosting error taxonomy
async fn error_for(operation: &str, tag: &str, response: Response) -> HostingError {
    let status = response.status();
    let headers = response.headers().clone();
    let body: ApiErrorBody = response.json().await.unwrap_or_default();

    let header_u64 = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
    };
    let retry_after = header_u64(RETRY_AFTER.as_str()).or_else(|| {
        let reset = header_u64("x-ratelimit-reset")?;
        let now = u64::try_from(chrono::Utc::now().timestamp()).ok()?;
        Some(reset.saturating_sub(now))
    });
    let rate_limited = header_u64("x-ratelimit-remaining") == Some(0);

    match status {
        StatusCode::TOO_MANY_REQUESTS => HostingError::RateLimited {
            operation: operation.to_string(),
            retry_after_seconds: retry_after,
        },
        StatusCode::FORBIDDEN if rate_limited => HostingError::RateLimited {
            operation: operation.to_string(),
            retry_after_seconds: retry_after,
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
            HostingError::Permission {
                operation: operation.to_string(),
                message: body.message,
            }
        }
        StatusCode::UNPROCESSABLE_ENTITY
            if body.errors.iter().any(|e| e.code == "already_exists") =>
        {
            HostingError::NameCollision {
                tag: tag.to_string(),
            }
        }
        _ => HostingError::Api {
            operation: operation.to_string(),
            status: status.as_u16(),
            message: body.message,
        },
    }
}

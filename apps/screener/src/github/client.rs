use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::GithubConfig;
use crate::errors::EnrichmentError;
use crate::github::{ProfileEnricher, ProfileSearch};
use crate::models::enrichment::{CommitSummary, Enrichment, EnrichmentRecord, ProjectSummary};
use crate::screening::identity::GithubUsername;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";
const MAX_RECENT_COMMITS: usize = 3;
const SHORT_SHA_LEN: usize = 7;

#[derive(Debug, Deserialize)]
struct GithubUser {
    login: String,
    #[serde(default)]
    public_repos: u32,
    #[serde(default)]
    followers: u32,
}

#[derive(Debug, Deserialize)]
struct GithubRepo {
    name: String,
    description: Option<String>,
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u32,
}

#[derive(Debug, Deserialize)]
struct GithubCommitItem {
    sha: String,
    commit: GithubCommitDetail,
}

#[derive(Debug, Deserialize)]
struct GithubCommitDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    login: Option<String>,
    html_url: Option<String>,
}

/// REST client for the GitHub v3 API.
#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    config: GithubConfig,
}

impl GithubClient {
    pub fn new(config: GithubConfig, timeout: std::time::Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to build HTTP client"),
            config,
        }
    }

    fn get(&self, path: &str, accept: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.api_url, path);
        let request = self.client.get(url).header(ACCEPT, accept);
        match &self.config.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<(T, HeaderMap), EnrichmentError> {
        let response = self.get(path, JSON_MEDIA_TYPE).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status {
                status: status.as_u16(),
                url: path.to_string(),
            });
        }
        let headers = response.headers().clone();
        Ok((response.json::<T>().await?, headers))
    }

    async fn fetch_profile(&self, username: &GithubUsername) -> Result<EnrichmentRecord, EnrichmentError> {
        if self.config.token.is_none() {
            return Err(EnrichmentError::MissingToken);
        }

        let (user, headers) = self
            .get_json::<GithubUser>(&format!("/users/{username}"))
            .await?;
        log_rate_limit(&headers);

        let (repos, _) = self
            .get_json::<Vec<GithubRepo>>(&format!(
                "/users/{username}/repos?sort=updated&per_page={}",
                self.config.max_repos
            ))
            .await?;

        let mut projects = Vec::with_capacity(repos.len());
        for repo in repos {
            let readme_text = self.fetch_readme(&user.login, &repo.name).await;
            let recent_commits = self.fetch_recent_commits(&user.login, &repo.name).await;
            projects.push(ProjectSummary {
                name: repo.name,
                description: repo.description,
                primary_language: repo.language,
                star_count: repo.stargazers_count,
                readme_text: readme_text
                    .map(|text| truncate_chars(&text, self.config.readme_max_chars)),
                recent_commits,
            });
        }

        Ok(EnrichmentRecord {
            username: user.login,
            public_repo_count: user.public_repos,
            follower_count: user.followers,
            projects,
        })
    }

    /// README as raw text. A missing README and a failed fetch both give `None`.
    async fn fetch_readme(&self, owner: &str, repo: &str) -> Option<String> {
        let path = format!("/repos/{owner}/{repo}/readme");
        let response = match self.get(&path, RAW_MEDIA_TYPE).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("README fetch for {owner}/{repo} failed: {e}");
                return None;
            }
        };

        match response.status() {
            s if s.is_success() => response.text().await.ok(),
            StatusCode::NOT_FOUND => None,
            s => {
                warn!("README fetch for {owner}/{repo} returned {s}");
                None
            }
        }
    }

    /// An empty repository (409) has no commits rather than unknown commits.
    async fn fetch_recent_commits(&self, owner: &str, repo: &str) -> Option<Vec<CommitSummary>> {
        let path = format!("/repos/{owner}/{repo}/commits?per_page={MAX_RECENT_COMMITS}");
        match self.get_json::<Vec<GithubCommitItem>>(&path).await {
            Ok((items, _)) => Some(summarize_commits(items)),
            Err(EnrichmentError::Status { status: 409, .. }) => Some(Vec::new()),
            Err(e) => {
                warn!("Commit fetch for {owner}/{repo} failed: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl ProfileEnricher for GithubClient {
    async fn fetch_enrichment(&self, username: &GithubUsername) -> Enrichment {
        match self.fetch_profile(username).await {
            Ok(record) => {
                info!(
                    "Enriched {} with {} repositories",
                    record.username,
                    record.projects.len()
                );
                Enrichment::Profile(record)
            }
            Err(e) => {
                warn!("Enrichment for {username} failed: {e}");
                Enrichment::error(e.to_string())
            }
        }
    }
}

#[async_trait]
impl ProfileSearch for GithubClient {
    async fn search_profile_by_name(&self, query: &str) -> Option<String> {
        let path = format!("/search/users?q={query}&per_page=1");
        match self.get_json::<SearchResponse>(&path).await {
            Ok((response, _)) => first_handle(response),
            Err(e) => {
                warn!("Error during GitHub profile search: {e}");
                None
            }
        }
    }
}

fn log_rate_limit(headers: &HeaderMap) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("?")
            .to_string()
    };
    debug!(
        "GitHub API rate limit: limit={} remaining={} reset={}",
        header("x-ratelimit-limit"),
        header("x-ratelimit-remaining"),
        header("x-ratelimit-reset")
    );
}

/// Login of the first search hit, falling back to the last path segment of its profile URL.
fn first_handle(response: SearchResponse) -> Option<String> {
    let item = response.items.into_iter().next()?;
    item.login.filter(|l| !l.is_empty()).or_else(|| {
        item.html_url
            .as_deref()
            .and_then(|url| url.trim_end_matches('/').rsplit('/').next())
            .filter(|handle| !handle.is_empty())
            .map(str::to_string)
    })
}

fn summarize_commits(items: Vec<GithubCommitItem>) -> Vec<CommitSummary> {
    items
        .into_iter()
        .take(MAX_RECENT_COMMITS)
        .map(|item| CommitSummary {
            message: item.commit.message.lines().next().unwrap_or("").to_string(),
            sha: item.sha.chars().take(SHORT_SHA_LEN).collect(),
        })
        .collect()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

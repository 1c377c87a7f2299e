use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::ANTHROPIC_API_URL;

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Application configuration loaded from environment variables.
/// Built once at startup and handed to each collaborator at construction time.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub anthropic_api_url: String,
    pub llm_max_attempts: u32,
    pub github: GithubConfig,
    pub http_timeout: Duration,
    pub artifact_dir: Option<PathBuf>,
    pub s3: Option<S3Config>,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// Enrichment refuses to run unauthenticated when this is `None`.
    pub token: Option<String>,
    pub api_url: String,
    pub max_repos: u32,
    pub readme_max_chars: usize,
}

#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let s3 = match (
            get("S3_BUCKET"),
            get("S3_ENDPOINT"),
            get("AWS_ACCESS_KEY_ID"),
            get("AWS_SECRET_ACCESS_KEY"),
        ) {
            (Some(bucket), Some(endpoint), Some(access_key_id), Some(secret_access_key)) => {
                Some(S3Config {
                    bucket,
                    endpoint,
                    access_key_id,
                    secret_access_key,
                })
            }
            (None, None, None, None) => None,
            _ => bail!(
                "S3 artifacts need S3_BUCKET, S3_ENDPOINT, AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY together"
            ),
        };

        let llm_max_attempts = parse_or("LLM_MAX_ATTEMPTS", get("LLM_MAX_ATTEMPTS"), 1u32)?;
        if llm_max_attempts == 0 {
            bail!("LLM_MAX_ATTEMPTS must be at least 1");
        }

        Ok(Config {
            anthropic_api_key: get("ANTHROPIC_API_KEY").with_context(|| {
                "Required environment variable 'ANTHROPIC_API_KEY' is not set".to_string()
            })?,
            anthropic_api_url: get("ANTHROPIC_API_URL")
                .unwrap_or_else(|| ANTHROPIC_API_URL.to_string()),
            llm_max_attempts,
            github: GithubConfig {
                token: get("GITHUB_TOKEN"),
                api_url: get("GITHUB_API_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
                max_repos: parse_or("GITHUB_MAX_REPOS", get("GITHUB_MAX_REPOS"), 30u32)?,
                readme_max_chars: parse_or(
                    "GITHUB_README_MAX_CHARS",
                    get("GITHUB_README_MAX_CHARS"),
                    2000usize,
                )?,
            },
            http_timeout: Duration::from_secs(parse_or(
                "HTTP_TIMEOUT_SECS",
                get("HTTP_TIMEOUT_SECS"),
                60u64,
            )?),
            artifact_dir: get("ARTIFACT_DIR").map(PathBuf::from),
            s3,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

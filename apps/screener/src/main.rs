mod cli;
mod config;
mod errors;
mod extraction;
mod github;
mod llm_client;
mod models;
mod scoring;
mod screening;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::cli::Cli;
use crate::config::{Config, S3Config};
use crate::extraction::{LlmStructuredExtractor, PdfTextSource};
use crate::github::GithubClient;
use crate::llm_client::{LlmClient, LlmSettings};
use crate::scoring::LlmCandidateScorer;
use crate::screening::artifacts::{ArtifactStore, FsArtifactStore, S3ArtifactStore};
use crate::screening::orchestrator::Collaborators;
use crate::screening::ScreeningOrchestrator;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging; stdout is reserved for the report
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting screener v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(LlmSettings {
        api_key: config.anthropic_api_key.clone(),
        api_url: config.anthropic_api_url.clone(),
        max_attempts: config.llm_max_attempts,
        timeout: config.http_timeout,
    });
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize GitHub client
    let github = Arc::new(GithubClient::new(config.github.clone(), config.http_timeout));
    if config.github.token.is_none() {
        warn!("GITHUB_TOKEN not set; enrichment will record an error for every candidate");
    }

    let extractor = Arc::new(LlmStructuredExtractor::new(llm.clone()));
    let collaborators = Collaborators {
        text_source: Arc::new(PdfTextSource),
        extractor,
        search: github.clone(),
        enricher: github,
        scorer: Arc::new(LlmCandidateScorer::new(llm)),
    };

    let mut orchestrator = ScreeningOrchestrator::new(collaborators);
    if let Some(store) = build_artifact_store(&config).await {
        orchestrator = orchestrator.with_artifacts(store);
    }

    cli::run(cli, &orchestrator).await?;
    Ok(())
}

/// S3 when fully configured, otherwise a local directory, otherwise nothing.
async fn build_artifact_store(config: &Config) -> Option<Arc<dyn ArtifactStore>> {
    if let Some(s3) = &config.s3 {
        if config.artifact_dir.is_some() {
            warn!("Both S3 and ARTIFACT_DIR configured; writing artifacts to S3 only");
        }
        let client = build_s3_client(s3).await;
        info!("S3 artifact store initialized (bucket: {})", s3.bucket);
        return Some(Arc::new(S3ArtifactStore::new(client, s3.bucket.clone())));
    }

    config.artifact_dir.as_ref().map(|dir| {
        info!("Filesystem artifact store initialized at {}", dir.display());
        Arc::new(FsArtifactStore::new(dir.clone())) as Arc<dyn ArtifactStore>
    })
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &S3Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.access_key_id,
        &config.secret_access_key,
        None,
        None,
        "screener-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}

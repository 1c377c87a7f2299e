//! Audit artifacts: one per run (the job description) and one per candidate
//! (full intermediate pipeline state). Nothing reads them back.

use std::path::PathBuf;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::candidate::{CandidateId, CandidateResult};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact write to {path} failed: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("S3 upload failed: {0}")]
    S3(String),

    #[error("Artifact serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Write-only key/value sink for audit records.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), ArtifactError>;
}

/// Everything known about a candidate at the end of its pipeline.
#[derive(Debug, Serialize)]
pub struct CandidateArtifact<'a> {
    pub run_id: Uuid,
    #[serde(flatten)]
    pub result: &'a CandidateResult,
    pub raw_text: &'a str,
}

pub fn job_description_key(run_id: Uuid) -> String {
    format!("runs/{run_id}/job_description.txt")
}

pub fn candidate_key(run_id: Uuid, candidate_id: CandidateId) -> String {
    format!("runs/{run_id}/candidates/{candidate_id}.json")
}

pub async fn write_job_description(
    store: &dyn ArtifactStore,
    run_id: Uuid,
    job_description: &str,
) -> Result<(), ArtifactError> {
    store
        .put(
            &job_description_key(run_id),
            job_description.as_bytes().to_vec(),
            "text/plain",
        )
        .await
}

pub async fn write_candidate(
    store: &dyn ArtifactStore,
    artifact: &CandidateArtifact<'_>,
) -> Result<(), ArtifactError> {
    let body = serde_json::to_vec_pretty(artifact)?;
    store
        .put(
            &candidate_key(artifact.run_id, artifact.result.candidate_id),
            body,
            "application/json",
        )
        .await
}

/// Writes artifacts under a local directory, mirroring the key layout.
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn put(&self, key: &str, body: Vec<u8>, _content_type: &str) -> Result<(), ArtifactError> {
        let path = self.root.join(key);
        let io_err = |source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(&path, body).await.map_err(io_err)?;
        Ok(())
    }
}

/// Uploads artifacts to an S3 / MinIO bucket.
pub struct S3ArtifactStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ArtifactStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), ArtifactError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| ArtifactError::S3(e.to_string()))?;

        info!("Uploaded artifact to s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

//! Candidate scoring: the pluggable seam between the pipeline and the evaluator backend.
//!
//! Default: `LlmCandidateScorer` (Claude). The orchestrator only sees `dyn CandidateScorer`.

use async_trait::async_trait;
use tracing::debug;

use crate::errors::{ParseError, SchemaKind};
use crate::llm_client::prompts::fill_placeholders;
use crate::llm_client::LlmClient;
use crate::models::enrichment::Enrichment;
use crate::models::evaluation::Evaluation;
use crate::models::resume::ResumeRecord;

pub mod prompts;

use prompts::{EVALUATION_PROMPT_TEMPLATE, EVALUATION_SYSTEM};

#[async_trait]
pub trait CandidateScorer: Send + Sync {
    /// `enrichment` is passed through as-is, error records included.
    async fn score_candidate(
        &self,
        job_description: &str,
        resume: &ResumeRecord,
        enrichment: Option<&Enrichment>,
    ) -> Result<Evaluation, ParseError>;
}

pub struct LlmCandidateScorer {
    llm: LlmClient,
}

impl LlmCandidateScorer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl CandidateScorer for LlmCandidateScorer {
    async fn score_candidate(
        &self,
        job_description: &str,
        resume: &ResumeRecord,
        enrichment: Option<&Enrichment>,
    ) -> Result<Evaluation, ParseError> {
        let prompt = build_evaluation_prompt(job_description, resume, enrichment)?;
        let evaluation: Evaluation = self
            .llm
            .call_json(&prompt, EVALUATION_SYSTEM)
            .await
            .map_err(|e| ParseError::new(SchemaKind::Evaluation, e.to_string()))?;
        debug!("Evaluation parsed: score={}", evaluation.score.value());
        Ok(evaluation)
    }
}

fn build_evaluation_prompt(
    job_description: &str,
    resume: &ResumeRecord,
    enrichment: Option<&Enrichment>,
) -> Result<String, ParseError> {
    let serialize = |value: serde_json::Result<String>| {
        value.map_err(|e| ParseError::new(SchemaKind::Evaluation, format!("prompt input: {e}")))
    };
    let resume_json = serialize(serde_json::to_string_pretty(resume))?;
    let github_json = serialize(serde_json::to_string_pretty(&enrichment))?;

    Ok(fill_placeholders(
        EVALUATION_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description),
            ("resume_json", &resume_json),
            ("github_json", &github_json),
        ],
    ))
}

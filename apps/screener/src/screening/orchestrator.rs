//! Screening orchestrator: runs every candidate through the pipeline with
//! per-candidate failure isolation.
//!
//! Flow per candidate: extract text → extract resume fields (+ name backfill)
//! → resolve identity → enrich → score.
//!
//! No collaborator failure escapes a candidate: each one is converted to an
//! absent stage output plus a status tag, and the next candidate runs. A
//! failed resume extraction still resolves and enriches the identity; only
//! scoring needs the resume record.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::extraction::{StructuredExtractor, TextSource};
use crate::github::{ProfileEnricher, ProfileSearch};
use crate::models::candidate::{Candidate, CandidateResult, CandidateStatus, ResumeDocument};
use crate::models::enrichment::Enrichment;
use crate::scoring::CandidateScorer;
use crate::screening::artifacts::{self, ArtifactStore, CandidateArtifact};
use crate::screening::identity::IdentityResolver;
use crate::screening::report::{RunStatus, ScreeningReport};

pub const NO_TEXT_REASON: &str = "no extractable text";

/// The five external collaborators the pipeline calls.
#[derive(Clone)]
pub struct Collaborators {
    pub text_source: Arc<dyn TextSource>,
    pub extractor: Arc<dyn StructuredExtractor>,
    pub search: Arc<dyn ProfileSearch>,
    pub enricher: Arc<dyn ProfileEnricher>,
    pub scorer: Arc<dyn CandidateScorer>,
}

pub struct ScreeningOrchestrator {
    collaborators: Collaborators,
    artifacts: Option<Arc<dyn ArtifactStore>>,
}

impl ScreeningOrchestrator {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            artifacts: None,
        }
    }

    pub fn with_artifacts(mut self, store: Arc<dyn ArtifactStore>) -> Self {
        self.artifacts = Some(store);
        self
    }

    /// Screens `documents` in submission order. Always returns one result per document.
    pub async fn run_screening(
        &self,
        job_description: &str,
        documents: Vec<ResumeDocument>,
    ) -> ScreeningReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            "Screening run {run_id} started with {} resumes",
            documents.len()
        );

        if let Some(store) = &self.artifacts {
            if let Err(e) =
                artifacts::write_job_description(store.as_ref(), run_id, job_description).await
            {
                warn!("Could not persist job description for run {run_id}: {e}");
            }
        }

        let mut results = Vec::with_capacity(documents.len());
        for (index, document) in documents.iter().enumerate() {
            let (result, raw_text) = self
                .screen_candidate(index, document, job_description)
                .await;
            self.persist_candidate(run_id, &result, &raw_text).await;
            results.push(result);
        }

        let status = RunStatus::from_results(&results);
        let scored = results
            .iter()
            .filter(|r| r.status == CandidateStatus::Scored)
            .count();
        let enrichment_errors = results
            .iter()
            .filter(|r| r.enrichment.as_ref().is_some_and(Enrichment::is_error))
            .count();
        match status {
            RunStatus::Complete => info!(
                "Screening run {run_id} complete: {scored}/{} candidates scored, {enrichment_errors} without GitHub data",
                results.len()
            ),
            RunStatus::Failed => warn!(
                "Screening run {run_id} failed: none of {} candidates could be scored",
                results.len()
            ),
        }

        ScreeningReport {
            run_id,
            started_at,
            job_description: job_description.to_string(),
            status,
            results,
        }
    }

    /// Runs one candidate end to end. Returns the report entry and the raw text.
    async fn screen_candidate(
        &self,
        index: usize,
        document: &ResumeDocument,
        job_description: &str,
    ) -> (CandidateResult, String) {
        let c = &self.collaborators;
        let mut candidate = Candidate::intake(index, document);
        info!("Processing resume {} ({})", candidate.filename, candidate.id);

        // Stage 1: text
        candidate.raw_text = c.text_source.extract_text(&document.bytes).await;
        if candidate.raw_text.trim().is_empty() {
            warn!("Skipping {}: {NO_TEXT_REASON}", candidate.filename);
            return candidate.conclude(
                CandidateStatus::SkippedNoText,
                Some(NO_TEXT_REASON.to_string()),
            );
        }

        // Stage 2: resume fields
        let extraction_failure = match c.extractor.extract_resume(&candidate.raw_text).await {
            Ok(mut resume) => {
                resume.backfill_name(&candidate.filename);
                candidate.resume = Some(resume);
                None
            }
            Err(e) => {
                warn!("Resume extraction failed for {}: {e}", candidate.filename);
                Some(format!("resume extraction failed: {e}"))
            }
        };
        let candidate_name = candidate.display_name();

        // Stage 3: identity
        candidate.identity = IdentityResolver::new(c.extractor.as_ref(), c.search.as_ref())
            .resolve(&candidate.raw_text, &candidate_name)
            .await;

        // Stage 4: enrichment
        if let Some(username) = &candidate.identity {
            let enrichment = c.enricher.fetch_enrichment(username).await;
            match enrichment.profile() {
                Some(profile) => debug!(
                    "Fetched {} repositories for {username}",
                    profile.projects.len()
                ),
                None => warn!("Continuing without GitHub data for {candidate_name}"),
            }
            candidate.enrichment = Some(enrichment);
        }

        // Stage 5: score, only with a resume record
        let Some(resume) = candidate.resume.take() else {
            return candidate.conclude(CandidateStatus::FailedScoring, extraction_failure);
        };
        let outcome = c
            .scorer
            .score_candidate(job_description, &resume, candidate.enrichment.as_ref())
            .await;
        candidate.resume = Some(resume);

        match outcome {
            Ok(evaluation) => {
                info!(
                    "Scored {candidate_name}: {}/10",
                    evaluation.score.value()
                );
                candidate.evaluation = Some(evaluation);
                candidate.conclude(CandidateStatus::Scored, None)
            }
            Err(e) => {
                warn!("Scoring failed for {candidate_name}: {e}");
                candidate.conclude(
                    CandidateStatus::FailedScoring,
                    Some(format!("scoring failed: {e}")),
                )
            }
        }
    }

    async fn persist_candidate(&self, run_id: Uuid, result: &CandidateResult, raw_text: &str) {
        let Some(store) = &self.artifacts else {
            return;
        };
        let artifact = CandidateArtifact {
            run_id,
            result,
            raw_text,
        };
        if let Err(e) = artifacts::write_candidate(store.as_ref(), &artifact).await {
            warn!(
                "Could not persist artifact for candidate {}: {e}",
                result.candidate_id
            );
        }
    }
}

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::enrichment::Enrichment;
use crate::models::evaluation::Evaluation;
use crate::models::resume::{display_name_from_filename, ResumeRecord};
use crate::screening::identity::GithubUsername;

/// Namespace for deterministic candidate ids.
const CANDIDATE_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2b7e_94d3_4a51_8e0f_3c29_d7a4_b615);

/// One uploaded resume as handed to the orchestrator.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub filename: String,
    pub bytes: Bytes,
}

impl ResumeDocument {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// Opaque candidate identifier, assigned at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(Uuid);

impl CandidateId {
    /// Derived from submission position and content: unique within a run,
    /// stable across runs with identical input.
    pub fn derive(index: usize, document: &ResumeDocument) -> Self {
        let mut name = Vec::with_capacity(16 + document.filename.len() + document.bytes.len());
        name.extend_from_slice(&(index as u64).to_be_bytes());
        name.extend_from_slice(document.filename.as_bytes());
        name.push(0);
        name.extend_from_slice(&document.bytes);
        CandidateId(Uuid::new_v5(&CANDIDATE_NAMESPACE, &name))
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Scored,
    SkippedNoText,
    FailedScoring,
}

/// Mutable pipeline state for one candidate while its run is in progress.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: CandidateId,
    pub filename: String,
    pub raw_text: String,
    pub resume: Option<ResumeRecord>,
    pub identity: Option<GithubUsername>,
    pub enrichment: Option<Enrichment>,
    pub evaluation: Option<Evaluation>,
}

impl Candidate {
    pub fn intake(index: usize, document: &ResumeDocument) -> Self {
        Self {
            id: CandidateId::derive(index, document),
            filename: document.filename.clone(),
            raw_text: String::new(),
            resume: None,
            identity: None,
            enrichment: None,
            evaluation: None,
        }
    }

    /// Extracted name, or the filename stem when no resume record exists.
    pub fn display_name(&self) -> String {
        self.resume
            .as_ref()
            .and_then(|r| r.display_name())
            .map(str::to_string)
            .unwrap_or_else(|| display_name_from_filename(&self.filename))
    }

    /// Freezes the candidate into its report entry.
    pub fn conclude(self, status: CandidateStatus, reason: Option<String>) -> (CandidateResult, String) {
        let candidate_name = self.display_name();
        let result = CandidateResult {
            candidate_id: self.id,
            filename: self.filename,
            candidate_name,
            resume: self.resume,
            identity: self.identity,
            enrichment: self.enrichment,
            evaluation: self.evaluation,
            status,
            reason,
        };
        (result, self.raw_text)
    }
}

/// One entry of a screening report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub candidate_id: CandidateId,
    pub filename: String,
    pub candidate_name: String,
    pub resume: Option<ResumeRecord>,
    pub identity: Option<GithubUsername>,
    pub enrichment: Option<Enrichment>,
    pub evaluation: Option<Evaluation>,
    pub status: CandidateStatus,
    /// Why a score is missing, when it is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_id_is_stable_for_identical_input() {
        let doc = ResumeDocument::new("jane.pdf", b"%PDF-1.4 jane".to_vec());
        assert_eq!(CandidateId::derive(0, &doc), CandidateId::derive(0, &doc));
    }

    #[test]
    fn test_candidate_id_differs_by_position() {
        let doc = ResumeDocument::new("jane.pdf", b"%PDF-1.4 jane".to_vec());
        assert_ne!(CandidateId::derive(0, &doc), CandidateId::derive(1, &doc));
    }

    #[test]
    fn test_display_name_falls_back_to_filename() {
        let doc = ResumeDocument::new("bob_smith.pdf", Vec::new());
        let candidate = Candidate::intake(0, &doc);
        assert_eq!(candidate.display_name(), "bob_smith");
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(CandidateStatus::SkippedNoText).unwrap(),
            "skipped_no_text"
        );
        assert_eq!(
            serde_json::to_value(CandidateStatus::FailedScoring).unwrap(),
            "failed_scoring"
        );
    }

    #[test]
    fn test_conclude_keeps_raw_text_out_of_result() {
        let doc = ResumeDocument::new("a.pdf", Vec::new());
        let mut candidate = Candidate::intake(0, &doc);
        candidate.raw_text = "Jane Doe".to_string();
        let (result, raw_text) = candidate.conclude(CandidateStatus::FailedScoring, None);
        assert_eq!(raw_text, "Jane Doe");
        assert_eq!(result.candidate_name, "a");
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("raw_text").is_none());
        assert!(value.get("reason").is_none());
    }
}

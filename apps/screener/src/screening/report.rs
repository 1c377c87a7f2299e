use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::candidate::{CandidateResult, CandidateStatus};
use crate::models::evaluation::{FitBand, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// At least one candidate was scored.
    Complete,
    /// No candidate was scored.
    Failed,
}

impl RunStatus {
    pub fn from_results(results: &[CandidateResult]) -> Self {
        if results.iter().any(|r| r.status == CandidateStatus::Scored) {
            RunStatus::Complete
        } else {
            RunStatus::Failed
        }
    }
}

/// Output of one screening run. `results` keeps submission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub job_description: String,
    pub status: RunStatus,
    pub results: Vec<CandidateResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortlistEntry<'a> {
    pub rank: usize,
    pub candidate_name: &'a str,
    pub filename: &'a str,
    pub score: Score,
    pub band: FitBand,
}

impl ScreeningReport {
    /// Scored candidates, best first. Equal scores keep submission order.
    pub fn shortlist(&self) -> Vec<ShortlistEntry<'_>> {
        let mut scored: Vec<_> = self
            .results
            .iter()
            .filter_map(|r| r.evaluation.as_ref().map(|e| (r, e.score)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        scored
            .into_iter()
            .enumerate()
            .map(|(i, (result, score))| ShortlistEntry {
                rank: i + 1,
                candidate_name: &result.candidate_name,
                filename: &result.filename,
                score,
                band: score.band(),
            })
            .collect()
    }

    /// Candidates without a score, with the recorded reason.
    pub fn unscored(&self) -> impl Iterator<Item = &CandidateResult> {
        self.results.iter().filter(|r| r.evaluation.is_none())
    }
}

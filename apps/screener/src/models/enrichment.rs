use serde::{Deserialize, Serialize};

/// Result of one enrichment attempt. Serializes either as the profile record
/// or as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Enrichment {
    Profile(EnrichmentRecord),
    Error { error: String },
}

impl Enrichment {
    pub fn error(reason: impl Into<String>) -> Self {
        Enrichment::Error {
            error: reason.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Enrichment::Error { .. })
    }

    pub fn profile(&self) -> Option<&EnrichmentRecord> {
        match self {
            Enrichment::Profile(record) => Some(record),
            Enrichment::Error { .. } => None,
        }
    }
}

/// Public GitHub activity for one resolved username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    pub username: String,
    pub public_repo_count: u32,
    pub follower_count: u32,
    pub projects: Vec<ProjectSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub name: String,
    pub description: Option<String>,
    pub primary_language: Option<String>,
    pub star_count: u32,
    /// `None` when the repository has no README or the fetch failed.
    pub readme_text: Option<String>,
    /// Up to 3 most recent commits; `None` when the fetch failed.
    pub recent_commits: Option<Vec<CommitSummary>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub message: String,
    /// Short (7 character) sha.
    pub sha: String,
}

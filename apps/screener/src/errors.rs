use thiserror::Error;

/// Process-level error type surfaced by the CLI.
/// Per-candidate failures never reach this type; they are folded into the report.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("No candidate produced a score ({candidates} submitted)")]
    BatchExhausted { candidates: usize },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Which structured shape a text-generating collaborator was asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    ResumeFields,
    GithubIdentifier,
    Evaluation,
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SchemaKind::ResumeFields => "resume fields",
            SchemaKind::GithubIdentifier => "GitHub identifier",
            SchemaKind::Evaluation => "evaluation",
        };
        f.write_str(label)
    }
}

/// A collaborator's output did not match the expected schema.
/// Callers recover by treating the output as absent.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Could not parse {kind}: {reason}")]
pub struct ParseError {
    pub kind: SchemaKind,
    pub reason: String,
}

impl ParseError {
    pub fn new(kind: SchemaKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

/// A resolved GitHub username failed the character-class check.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid GitHub username: {0:?}")]
pub struct InvalidIdentity(pub String);

/// Upstream GitHub API failure fatal to one candidate's enrichment.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("GitHub token not set.")]
    MissingToken,

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed (status {status}) for {url}")]
    Status { status: u16, url: String },
}

use async_trait::async_trait;
use tracing::debug;

use crate::errors::{ParseError, SchemaKind};
use crate::extraction::prompts::{
    GITHUB_IDENTIFIER_PROMPT, GITHUB_IDENTIFIER_SYSTEM, RESUME_PARSE_PROMPT, RESUME_PARSE_SYSTEM,
};
use crate::llm_client::prompts::{fill_placeholders, NO_INVENTION_INSTRUCTION};
use crate::llm_client::{parse_json_output, LlmClient, LlmError};
use crate::models::resume::ResumeRecord;

/// Turns free text into structured records.
///
/// Every failure (transport included) is reported as a [`ParseError`]: the
/// caller's only recovery is to treat the output as absent.
#[async_trait]
pub trait StructuredExtractor: Send + Sync {
    /// `SchemaKind::ResumeFields`.
    async fn extract_resume(&self, text: &str) -> Result<ResumeRecord, ParseError>;

    /// `SchemaKind::GithubIdentifier`. `Ok(None)` means the model found nothing.
    async fn extract_github_identifier(&self, text: &str) -> Result<Option<String>, ParseError>;
}

/// Claude-backed extractor.
pub struct LlmStructuredExtractor {
    llm: LlmClient,
}

impl LlmStructuredExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl StructuredExtractor for LlmStructuredExtractor {
    async fn extract_resume(&self, text: &str) -> Result<ResumeRecord, ParseError> {
        let prompt = fill_placeholders(
            RESUME_PARSE_PROMPT,
            &[("no_invention", NO_INVENTION_INSTRUCTION), ("resume_text", text)],
        );
        self.llm
            .call_json::<ResumeRecord>(&prompt, RESUME_PARSE_SYSTEM)
            .await
            .map_err(|e| to_parse_error(SchemaKind::ResumeFields, e))
    }

    async fn extract_github_identifier(&self, text: &str) -> Result<Option<String>, ParseError> {
        let prompt = fill_placeholders(GITHUB_IDENTIFIER_PROMPT, &[("resume_text", text)]);
        let output = self
            .llm
            .call_text(&prompt, GITHUB_IDENTIFIER_SYSTEM)
            .await
            .map_err(|e| to_parse_error(SchemaKind::GithubIdentifier, e))?;

        let identifier = parse_identifier_response(&output)?;
        debug!("GitHub identifier extraction returned {:?}", identifier);
        Ok(identifier)
    }
}

fn to_parse_error(kind: SchemaKind, error: LlmError) -> ParseError {
    ParseError::new(kind, error.to_string())
}

/// Maps the identifier call's free-text answer onto an optional value.
///
/// The model signals "not found" with the literal `null` (any case). Quotes,
/// backticks and a JSON-style `{"github": ...}` wrapper are tolerated; a
/// multi-line answer is not an identifier.
fn parse_identifier_response(output: &str) -> Result<Option<String>, ParseError> {
    let trimmed = output.trim();

    if trimmed.starts_with('{') {
        let value: serde_json::Value = parse_json_output(trimmed)
            .map_err(|e| to_parse_error(SchemaKind::GithubIdentifier, e))?;
        let inner = value
            .as_object()
            .and_then(|obj| obj.values().next())
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        return match inner {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(s) => parse_identifier_response(&s),
            other => Err(ParseError::new(
                SchemaKind::GithubIdentifier,
                format!("expected a string identifier, got {other}"),
            )),
        };
    }

    let unquoted = trimmed
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim();

    if unquoted.is_empty() || unquoted.eq_ignore_ascii_case("null") {
        return Ok(None);
    }

    if unquoted.lines().count() > 1 {
        return Err(ParseError::new(
            SchemaKind::GithubIdentifier,
            "expected a single-line identifier",
        ));
    }

    Ok(Some(unquoted.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sentinel_any_case_is_absent() {
        assert_eq!(parse_identifier_response("null").unwrap(), None);
        assert_eq!(parse_identifier_response("NULL").unwrap(), None);
        assert_eq!(parse_identifier_response("  Null  \n").unwrap(), None);
        assert_eq!(parse_identifier_response("\"null\"").unwrap(), None);
    }

    #[test]
    fn test_empty_response_is_absent() {
        assert_eq!(parse_identifier_response("   ").unwrap(), None);
    }

    #[test]
    fn test_url_passes_through_unchanged() {
        assert_eq!(
            parse_identifier_response("https://github.com/alice").unwrap(),
            Some("https://github.com/alice".to_string())
        );
    }

    #[test]
    fn test_quotes_and_backticks_are_stripped() {
        assert_eq!(
            parse_identifier_response("`janedoe`").unwrap(),
            Some("janedoe".to_string())
        );
    }

    #[test]
    fn test_json_wrapper_is_unwrapped() {
        assert_eq!(
            parse_identifier_response(r#"{"github_url": "https://github.com/bob"}"#).unwrap(),
            Some("https://github.com/bob".to_string())
        );
        assert_eq!(
            parse_identifier_response(r#"{"github_url": null}"#).unwrap(),
            None
        );
    }

    #[test]
    fn test_multi_line_answer_is_parse_error() {
        let err = parse_identifier_response("I found:\nhttps://github.com/alice").unwrap_err();
        assert_eq!(err.kind, SchemaKind::GithubIdentifier);
    }

    #[test]
    fn test_invalid_characters_are_not_repaired_here() {
        assert_eq!(
            parse_identifier_response("john doe").unwrap(),
            Some("john doe".to_string())
        );
    }
}

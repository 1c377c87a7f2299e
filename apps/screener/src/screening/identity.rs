//! Identity resolution: turns unreliable resume text into a validated GitHub username.
//!
//! Fallback order, stopping at the first step that yields a value:
//! 1. dedicated identifier extraction over the raw text
//! 2. a `github.com` value → everything after the final `/`
//! 3. any other value → the whole value as a bare username
//! 4. nothing extracted → name search with the candidate's name, first hit
//!
//! Whatever comes out is validated against `^[A-Za-z0-9-]+$`. Invalid values
//! are discarded, never repaired.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::InvalidIdentity;
use crate::extraction::StructuredExtractor;
use crate::github::ProfileSearch;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("username pattern is valid"));

/// Join token placed between name parts in a profile search query.
const NAME_QUERY_JOIN: &str = "+";

/// A GitHub username that passed the character-class check.
/// The only way to build one is [`GithubUsername::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GithubUsername(String);

impl GithubUsername {
    pub fn parse(value: &str) -> Result<Self, InvalidIdentity> {
        if USERNAME_RE.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(InvalidIdentity(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GithubUsername {
    type Error = InvalidIdentity;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        GithubUsername::parse(&value)
    }
}

impl From<GithubUsername> for String {
    fn from(username: GithubUsername) -> Self {
        username.0
    }
}

impl std::fmt::Display for GithubUsername {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an unvalidated username came from. Used for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdentitySource {
    ProfileUrl,
    BareValue,
    NameSearch,
}

pub struct IdentityResolver<'a> {
    extractor: &'a dyn StructuredExtractor,
    search: &'a dyn ProfileSearch,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(extractor: &'a dyn StructuredExtractor, search: &'a dyn ProfileSearch) -> Self {
        Self { extractor, search }
    }

    /// Makes at most one extraction call and at most one search call. Never fails.
    pub async fn resolve(&self, raw_text: &str, candidate_name: &str) -> Option<GithubUsername> {
        let extracted = match self.extractor.extract_github_identifier(raw_text).await {
            Ok(value) => value,
            Err(e) => {
                warn!("GitHub identifier extraction failed for {candidate_name}: {e}");
                None
            }
        };

        let (candidate, source) = match extracted {
            Some(value) => username_from_value(&value),
            None => {
                let query = name_search_query(candidate_name)?;
                debug!("No GitHub identifier in resume; searching profiles for {query}");
                let handle = self.search.search_profile_by_name(&query).await?;
                (handle, IdentitySource::NameSearch)
            }
        };

        match GithubUsername::parse(&candidate) {
            Ok(username) => {
                info!("Resolved {candidate_name} to GitHub user {username} via {source:?}");
                Some(username)
            }
            Err(e) => {
                warn!("Discarding identity for {candidate_name}: {e}");
                None
            }
        }
    }
}

/// Steps 2 and 3: a profile link yields its final path segment, anything else is taken whole.
/// Surrounding whitespace and trailing slashes are dropped; nothing else is touched.
fn username_from_value(value: &str) -> (String, IdentitySource) {
    let value = value.trim();
    if value.to_ascii_lowercase().contains("github.com") {
        let segment = value
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        (segment.to_string(), IdentitySource::ProfileUrl)
    } else {
        (value.to_string(), IdentitySource::BareValue)
    }
}

/// Name parts joined with `+`. Characters that would alter the query string
/// are dropped; an empty result means there is nothing to search for.
pub fn name_search_query(name: &str) -> Option<String> {
    let parts: Vec<String> = name
        .split_whitespace()
        .map(|part| {
            part.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '.')
                .collect::<String>()
        })
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(NAME_QUERY_JOIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ParseError, SchemaKind};
    use crate::models::resume::ResumeRecord;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeExtractor {
        identifier: Result<Option<String>, ParseError>,
        calls: Mutex<u32>,
    }

    impl FakeExtractor {
        fn returning(identifier: Result<Option<&str>, ParseError>) -> Self {
            Self {
                identifier: identifier.map(|o| o.map(str::to_string)),
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl StructuredExtractor for FakeExtractor {
        async fn extract_resume(&self, _text: &str) -> Result<ResumeRecord, ParseError> {
            Ok(ResumeRecord::default())
        }

        async fn extract_github_identifier(&self, _text: &str) -> Result<Option<String>, ParseError> {
            *self.calls.lock().unwrap() += 1;
            self.identifier.clone()
        }
    }

    struct FakeSearch {
        hit: Option<String>,
        queries: Mutex<Vec<String>>,
    }

    impl FakeSearch {
        fn returning(hit: Option<&str>) -> Self {
            Self {
                hit: hit.map(str::to_string),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProfileSearch for FakeSearch {
        async fn search_profile_by_name(&self, query: &str) -> Option<String> {
            self.queries.lock().unwrap().push(query.to_string());
            self.hit.clone()
        }
    }

    async fn resolve(
        extractor: &FakeExtractor,
        search: &FakeSearch,
        name: &str,
    ) -> Option<GithubUsername> {
        IdentityResolver::new(extractor, search)
            .resolve("resume text", name)
            .await
    }

    #[test]
    fn test_username_validation() {
        assert!(GithubUsername::parse("alice").is_ok());
        assert!(GithubUsername::parse("jane-doe-42").is_ok());
        assert!(GithubUsername::parse("john@doe").is_err());
        assert!(GithubUsername::parse("john doe").is_err());
        assert!(GithubUsername::parse("git.hub/john").is_err());
        assert!(GithubUsername::parse("").is_err());
        assert!(GithubUsername::parse("alice\n").is_err());
    }

    #[test]
    fn test_username_deserialization_validates() {
        assert!(serde_json::from_str::<GithubUsername>(r#""alice""#).is_ok());
        assert!(serde_json::from_str::<GithubUsername>(r#""john doe""#).is_err());
    }

    #[test]
    fn test_username_from_profile_url() {
        assert_eq!(
            username_from_value("https://github.com/alice"),
            ("alice".to_string(), IdentitySource::ProfileUrl)
        );
        assert_eq!(username_from_value("github.com/janedoe/").0, "janedoe");
        assert_eq!(username_from_value("www.GitHub.com/Bob").0, "Bob");
    }

    #[test]
    fn test_username_from_bare_value() {
        assert_eq!(
            username_from_value("  janedoe "),
            ("janedoe".to_string(), IdentitySource::BareValue)
        );
    }

    #[test]
    fn test_name_search_query_joins_with_plus() {
        assert_eq!(name_search_query("Bob Smith"), Some("Bob+Smith".to_string()));
        assert_eq!(
            name_search_query("  Mary   Ann  Lee "),
            Some("Mary+Ann+Lee".to_string())
        );
        assert_eq!(name_search_query("O'Brien & Co"), Some("OBrien+Co".to_string()));
        assert_eq!(name_search_query("   "), None);
    }

    #[tokio::test]
    async fn test_profile_url_resolves_without_name_search() {
        let extractor = FakeExtractor::returning(Ok(Some("https://github.com/alice")));
        let search = FakeSearch::returning(Some("someone-else"));

        let resolved = resolve(&extractor, &search, "Alice Example").await;

        assert_eq!(resolved.unwrap().as_str(), "alice");
        assert!(search.queries().is_empty());
        assert_eq!(*extractor.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_bare_username_resolves() {
        let extractor = FakeExtractor::returning(Ok(Some("janedoe")));
        let search = FakeSearch::returning(None);

        let resolved = resolve(&extractor, &search, "Jane Doe").await;

        assert_eq!(resolved.unwrap().as_str(), "janedoe");
        assert!(search.queries().is_empty());
    }

    #[tokio::test]
    async fn test_no_identifier_falls_back_to_name_search() {
        let extractor = FakeExtractor::returning(Ok(None));
        let search = FakeSearch::returning(Some("bobsmith"));

        let resolved = resolve(&extractor, &search, "Bob Smith").await;

        assert_eq!(resolved.unwrap().as_str(), "bobsmith");
        assert_eq!(search.queries(), vec!["Bob+Smith".to_string()]);
    }

    #[tokio::test]
    async fn test_extraction_parse_error_falls_back_to_name_search() {
        let extractor = FakeExtractor::returning(Err(ParseError::new(
            SchemaKind::GithubIdentifier,
            "garbled",
        )));
        let search = FakeSearch::returning(Some("bobsmith"));

        let resolved = resolve(&extractor, &search, "Bob Smith").await;

        assert_eq!(resolved.unwrap().as_str(), "bobsmith");
        assert_eq!(search.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_extracted_values_are_discarded() {
        for bad in ["john@doe", "john doe", "git.hub/john", "https://github.com/alice?tab=repos"] {
            let extractor = FakeExtractor::returning(Ok(Some(bad)));
            let search = FakeSearch::returning(Some("fallback"));

            let resolved = resolve(&extractor, &search, "John Doe").await;

            assert!(resolved.is_none(), "{bad:?} should not resolve");
            assert!(
                search.queries().is_empty(),
                "an invalid extracted value must not trigger name search"
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_search_hit_is_discarded() {
        let extractor = FakeExtractor::returning(Ok(None));
        let search = FakeSearch::returning(Some("not valid!"));

        assert!(resolve(&extractor, &search, "Bob Smith").await.is_none());
    }

    #[tokio::test]
    async fn test_nothing_found_is_absent() {
        let extractor = FakeExtractor::returning(Ok(None));
        let search = FakeSearch::returning(None);

        assert!(resolve(&extractor, &search, "Bob Smith").await.is_none());
        assert_eq!(search.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_unsearchable_name_skips_search() {
        let extractor = FakeExtractor::returning(Ok(None));
        let search = FakeSearch::returning(Some("bobsmith"));

        assert!(resolve(&extractor, &search, "  ").await.is_none());
        assert!(search.queries().is_empty());
    }
}

//! GitHub collaborators: name-based profile search and profile enrichment.
//!
//! Both are served by [`GithubClient`]; the orchestrator depends on the traits
//! so tests can substitute fakes.

use async_trait::async_trait;

use crate::models::enrichment::Enrichment;
use crate::screening::identity::GithubUsername;

pub mod client;

pub use client::GithubClient;

/// Looks a person up by name and returns the first matching profile handle.
#[async_trait]
pub trait ProfileSearch: Send + Sync {
    /// `query` is already joined with `+` between name parts.
    async fn search_profile_by_name(&self, query: &str) -> Option<String>;
}

/// Fetches public profile and repository data for a validated username.
///
/// Only the user and repository-list fetches can fail the whole enrichment;
/// the result is then `Enrichment::Error`.
#[async_trait]
pub trait ProfileEnricher: Send + Sync {
    async fn fetch_enrichment(&self, username: &GithubUsername) -> Enrichment;
}

//! Configuration for the knowledge-base adapter (`[source]` section)

use crate::SourceError;
use serde::{Deserialize, Serialize};

/// Default public SPARQL endpoint
pub const DEFAULT_ENDPOINT: &str = "https://query.wikidata.org/sparql";

/// Connection and pacing settings for [`KnowledgeBaseClient`](crate::KnowledgeBaseClient)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// SPARQL endpoint URL
    pub endpoint: String,

    /// User-Agent header; public endpoints throttle anonymous clients
    pub user_agent: String,

    /// Pause between consecutive slice requests
    pub request_delay_ms: u64,

    /// Retries after the first attempt for transient failures
    pub max_retries: u32,

    /// Backoff before retry `n` is `base_backoff_ms * 2^n`
    pub base_backoff_ms: u64,

    /// Per-request timeout
    pub timeout_secs: u64,

    /// Row limit per query
    pub row_limit: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: concat!("lineage/", env!("CARGO_PKG_VERSION"), " (dataset curation)").to_string(),
            request_delay_ms: 1_000,
            max_retries: 3,
            base_backoff_ms: 2_000,
            timeout_secs: 60,
            row_limit: 10_000,
        }
    }
}

impl SourceConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SourceError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(SourceError::Config(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(SourceError::Config("user_agent cannot be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(SourceError::Config("timeout_secs must be greater than 0".to_string()));
        }
        if self.row_limit == 0 {
            return Err(SourceError::Config("row_limit must be greater than 0".to_string()));
        }
        Ok(())
    }
}

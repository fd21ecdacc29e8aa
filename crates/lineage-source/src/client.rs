//! Async client for the knowledge-base SPARQL endpoint

use crate::sparql::{build_query, parse_results};
use crate::{SourceConfig, SourceError};
use lineage_domain::{FetchSlice, PersonRecord};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A slice that could not be fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedSlice {
    /// The slice that was given up on
    pub slice: FetchSlice,

    /// Last error seen for it
    pub reason: String,
}

/// Result of fetching a batch of slices
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOutcome {
    /// Records from every slice that succeeded, in slice order
    pub records: Vec<PersonRecord>,

    /// Slices skipped after exhausting retries or failing outright
    pub skipped: Vec<SkippedSlice>,
}

impl FetchOutcome {
    /// Human-readable summary
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Fetched {} records", self.records.len())];
        if !self.skipped.is_empty() {
            lines.push(format!("Skipped {} slices:", self.skipped.len()));
            for skipped in &self.skipped {
                lines.push(format!("  {}: {}", skipped.slice, skipped.reason));
            }
        }
        lines.join("\n")
    }
}

/// One attempt's failure, tagged with whether another attempt may help
enum AttemptError {
    Transient(SourceError),
    Fatal(SourceError),
}

/// Client for the knowledge-base SPARQL endpoint
///
/// Requests are paced by `request_delay_ms`. Transient failures (HTTP 429,
/// 5xx, timeouts, connection errors) are retried with exponential backoff;
/// a slice that still fails is skipped and reported.
pub struct KnowledgeBaseClient {
    config: SourceConfig,
    client: reqwest::Client,
}

impl KnowledgeBaseClient {
    /// Create a client from a validated configuration
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SourceError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Get the configuration
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Delay before retry number `retry` (0-based)
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let factor = 2u64.checked_pow(retry).unwrap_or(u64::MAX);
        Duration::from_millis(self.config.base_backoff_ms.saturating_mul(factor))
    }

    /// Fetch one slice, retrying transient failures
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Unavailable`] once retries are exhausted, or the
    /// underlying error when the endpoint rejects the request or answers
    /// with an unparseable body.
    pub async fn fetch_slice(&self, slice: &FetchSlice) -> Result<Vec<PersonRecord>, SourceError> {
        if !slice.is_valid() {
            return Err(SourceError::Config(format!("empty slice {}", slice)));
        }

        let query = build_query(slice, self.config.row_limit);
        let mut retry = 0;

        loop {
            match self.attempt(&query).await {
                Ok(body) => {
                    let records = parse_results(&body)?;
                    debug!(slice = %slice, records = records.len(), "Slice fetched");
                    return Ok(records);
                }
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Transient(e)) => {
                    if retry >= self.config.max_retries {
                        return Err(SourceError::Unavailable(format!(
                            "{} after {} attempts: {}",
                            slice,
                            retry + 1,
                            e
                        )));
                    }
                    let delay = self.backoff_delay(retry);
                    warn!(
                        slice = %slice,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "Transient failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
            }
        }
    }

    /// Fetch every slice in order, skipping the ones that fail
    pub async fn fetch_slices(&self, slices: &[FetchSlice]) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();
        let delay = Duration::from_millis(self.config.request_delay_ms);

        for (i, slice) in slices.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            info!(slice = %slice, "Fetching slice {}/{}", i + 1, slices.len());
            match self.fetch_slice(slice).await {
                Ok(records) => outcome.records.extend(records),
                Err(e) => {
                    warn!(slice = %slice, error = %e, "Skipping slice");
                    outcome.skipped.push(SkippedSlice {
                        slice: *slice,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            records = outcome.records.len(),
            skipped = outcome.skipped.len(),
            "Fetch complete"
        );
        outcome
    }

    async fn attempt(&self, query: &str) -> Result<String, AttemptError> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[("query", query), ("format", "json")])
            .header(reqwest::header::ACCEPT, "application/sparql-results+json")
            .send()
            .await
            .map_err(|e| {
                let error = SourceError::Communication(format!("Request failed: {}", e));
                if e.is_timeout() || e.is_connect() || e.is_request() {
                    AttemptError::Transient(error)
                } else {
                    AttemptError::Fatal(error)
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return response.text().await.map_err(|e| {
                AttemptError::Transient(SourceError::Communication(format!("Failed to read body: {}", e)))
            });
        }

        let message = response
            .text()
            .await
            .map(|text| text.chars().take(200).collect::<String>())
            .unwrap_or_else(|_| "Unknown error".to_string());
        let error = SourceError::Rejected {
            status: status.as_u16(),
            message,
        };

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Err(AttemptError::Transient(error))
        } else {
            Err(AttemptError::Fatal(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const BODY: &str = r#"{"results": {"bindings": [
        {"item": {"value": "http://www.wikidata.org/entity/Q7259"},
         "itemLabel": {"value": "Ada Lovelace"},
         "birth": {"value": "1815-12-10T00:00:00Z"},
         "sitelinks": {"value": "140"}}
    ]}}"#;

    fn fast_config(endpoint: String) -> SourceConfig {
        SourceConfig {
            endpoint,
            request_delay_ms: 0,
            max_retries: 2,
            base_backoff_ms: 1,
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Serve canned responses, one per connection, in order
    async fn serve(responses: Vec<(u16, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                let response = format!(
                    "HTTP/1.1 {} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
        });

        format!("http://{}/sparql", addr)
    }

    #[test]
    fn test_backoff_doubles() {
        let client = KnowledgeBaseClient::new(SourceConfig {
            base_backoff_ms: 500,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.backoff_delay(0), Duration::from_millis(500));
        assert_eq!(client.backoff_delay(1), Duration::from_millis(1_000));
        assert_eq!(client.backoff_delay(3), Duration::from_millis(4_000));
        assert_eq!(client.backoff_delay(200), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_invalid_config_is_refused() {
        let config = SourceConfig {
            row_limit: 0,
            ..Default::default()
        };
        assert!(matches!(KnowledgeBaseClient::new(config), Err(SourceError::Config(_))));
    }

    #[tokio::test]
    async fn test_retries_transient_then_succeeds() {
        let endpoint = serve(vec![(503, "busy"), (429, "slow down"), (200, BODY)]).await;
        let client = KnowledgeBaseClient::new(fast_config(endpoint)).unwrap();

        let records = client.fetch_slice(&FetchSlice::new(1801, 1900, 40)).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let endpoint = serve(vec![(400, "bad query"), (200, BODY)]).await;
        let client = KnowledgeBaseClient::new(fast_config(endpoint)).unwrap();

        let result = client.fetch_slice(&FetchSlice::new(1801, 1900, 40)).await;
        assert!(matches!(result, Err(SourceError::Rejected { status: 400, .. })));
    }

    #[tokio::test]
    async fn test_exhausted_slice_is_skipped_and_run_continues() {
        let endpoint = serve(vec![(503, "busy"), (503, "busy"), (503, "busy"), (200, BODY)]).await;
        let client = KnowledgeBaseClient::new(fast_config(endpoint)).unwrap();

        let slices = [FetchSlice::new(-500, -401, 5), FetchSlice::new(1801, 1900, 40)];
        let outcome = client.fetch_slices(&slices).await;

        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].slice, slices[0]);
        assert!(outcome.skipped[0].reason.contains("unavailable"));
        assert_eq!(outcome.records.len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/sparql", listener.local_addr().unwrap());
        drop(listener);

        let client = KnowledgeBaseClient::new(fast_config(endpoint)).unwrap();
        let result = client.fetch_slice(&FetchSlice::new(1801, 1900, 40)).await;
        assert!(matches!(result, Err(SourceError::Unavailable(_))));
    }
}

use std::time::Duration;

use async_trait::async_trait;
use common::{Error, Result};

use crate::models::RawMetadata;

/// Source of token metadata documents, keyed by resolved URL. The
/// aggregator only sees this trait, so tests can script outcomes
/// without a network.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawMetadata>;
}

/// Fetches metadata documents over HTTP. A single attempt per call;
/// retry policy, if any, belongs to the caller.
pub struct HttpMetadataFetcher {
    client: rquest::Client,
    timeout: Duration,
}

impl HttpMetadataFetcher {
    pub fn new(client: rquest::Client, timeout_ms: u64) -> Self {
        Self {
            client,
            timeout: Duration::from_millis(timeout_ms),
        }
    }
}

#[async_trait]
impl MetadataSource for HttpMetadataFetcher {
    async fn fetch(&self, url: &str) -> Result<RawMetadata> {
        let attempt = async {
            let response = self
                .client
                .get(url)
                .header("Accept", "application/json")
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(Error::FetchHttp(status.as_u16()));
            }

            let body = response.text().await?;
            serde_json::from_str::<RawMetadata>(&body)
                .map_err(|e| Error::FetchParse(e.to_string()))
        };

        // The deadline covers the whole request, headers and body both,
        // so one stalled gateway cannot hold a batch open.
        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(outcome) => outcome,
            Err(_) => Err(Error::FetchTimeout(url.to_string())),
        }
    }
}

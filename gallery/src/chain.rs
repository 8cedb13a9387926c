use std::time::Duration;

use async_trait::async_trait;
use common::config::ChainConfig;
use common::{Error, Result};
use pipeline::TokenRecord;
use url::Url;

/// Read-only view of the deployed marketplace contract. Failures map to
/// `ChainUnavailable`, which propagates to the caller; there is nothing
/// to aggregate without the token list.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn get_all_listed_tokens(&self) -> Result<Vec<TokenRecord>>;
    async fn get_tokens_owned_by(&self, owner: &str) -> Result<Vec<TokenRecord>>;
    async fn get_listed_token(&self, token_id: u64) -> Result<TokenRecord>;
}

/// Chain reader backed by the contract query service, which evaluates
/// the marketplace contract's read methods and returns token records
/// (token URI included) as JSON.
pub struct HttpChainReader {
    client: rquest::Client,
    endpoint: String,
    contract_address: String,
    timeout: Duration,
}

impl HttpChainReader {
    pub fn new(client: rquest::Client, config: &ChainConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            contract_address: config.contract_address.clone(),
            timeout: Duration::from_millis(config.request_timeout_ms),
        }
    }

    fn tokens_url(&self) -> Result<Url> {
        let url = Url::parse(&format!(
            "{}/contracts/{}/tokens",
            self.endpoint, self.contract_address
        ))?;
        Ok(url)
    }

    /// Issues one GET and returns status and body. The deadline covers
    /// headers and body both, so a chain endpoint that stalls
    /// mid-response cannot hold a request open.
    async fn get_text(&self, url: &str) -> Result<(u16, String)> {
        let attempt = async {
            let response = self
                .client
                .get(url)
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(|e| Error::ChainUnavailable(e.to_string()))?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| Error::ChainUnavailable(e.to_string()))?;

            Ok((status, body))
        };

        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(outcome) => outcome,
            Err(_) => Err(Error::ChainUnavailable(format!("timed out querying {}", url))),
        }
    }

    async fn fetch_records(&self, url: &str) -> Result<Vec<TokenRecord>> {
        let (status, body) = self.get_text(url).await?;
        if !(200..300).contains(&status) {
            return Err(Error::ChainUnavailable(format!(
                "{} returned HTTP {}",
                url, status
            )));
        }

        serde_json::from_str::<Vec<TokenRecord>>(&body)
            .map_err(|e| Error::ChainUnavailable(format!("bad token record payload: {}", e)))
    }
}

#[async_trait]
impl ChainReader for HttpChainReader {
    async fn get_all_listed_tokens(&self) -> Result<Vec<TokenRecord>> {
        let url = self.tokens_url()?;
        self.fetch_records(url.as_str()).await
    }

    async fn get_tokens_owned_by(&self, owner: &str) -> Result<Vec<TokenRecord>> {
        let mut url = self.tokens_url()?;
        url.query_pairs_mut().append_pair("owner", owner);
        self.fetch_records(url.as_str()).await
    }

    async fn get_listed_token(&self, token_id: u64) -> Result<TokenRecord> {
        let url = Url::parse(&format!(
            "{}/contracts/{}/tokens/{}",
            self.endpoint, self.contract_address, token_id
        ))?;

        let (status, body) = self.get_text(url.as_str()).await?;
        if status == 404 {
            return Err(Error::TokenNotListed(token_id));
        }
        if !(200..300).contains(&status) {
            return Err(Error::ChainUnavailable(format!(
                "{} returned HTTP {}",
                url, status
            )));
        }

        serde_json::from_str::<TokenRecord>(&body)
            .map_err(|e| Error::ChainUnavailable(format!("bad token record payload: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const CONTRACT: &str = "0x6AeD57D577542A04646eA9b1780adB6288768242";

    fn reader(endpoint: &str) -> HttpChainReader {
        HttpChainReader::new(
            rquest::Client::new(),
            &ChainConfig {
                endpoint: endpoint.to_string(),
                contract_address: CONTRACT.to_string(),
                request_timeout_ms: 5_000,
            },
        )
    }

    #[tokio::test]
    async fn decodes_token_records() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", format!("/contracts/{}/tokens", CONTRACT).as_str())
            .with_status(200)
            .with_body(
                r#"[{
                    "token_id": 1,
                    "token_uri": "ipfs://QmToken",
                    "price_wei": "1000000000000000000",
                    "owner": "0x1111111111111111111111111111111111111111",
                    "seller": "0x2222222222222222222222222222222222222222"
                }]"#,
            )
            .create_async()
            .await;

        let records = reader(&server.url()).get_all_listed_tokens().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].token_id, 1);
        assert_eq!(records[0].token_uri, "ipfs://QmToken");
    }

    #[tokio::test]
    async fn owner_filter_is_passed_through() {
        let mut server = Server::new_async().await;
        let owner = "0x3333333333333333333333333333333333333333";
        let mock = server
            .mock("GET", format!("/contracts/{}/tokens", CONTRACT).as_str())
            .match_query(mockito::Matcher::UrlEncoded("owner".into(), owner.into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let records = reader(&server.url())
            .get_tokens_owned_by(owner)
            .await
            .unwrap();

        assert!(records.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_failure_is_chain_unavailable() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", format!("/contracts/{}/tokens", CONTRACT).as_str())
            .with_status(502)
            .create_async()
            .await;

        let err = reader(&server.url())
            .get_all_listed_tokens()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ChainUnavailable(_)));
    }

    #[tokio::test]
    async fn decodes_a_single_token_record() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", format!("/contracts/{}/tokens/7", CONTRACT).as_str())
            .with_status(200)
            .with_body(
                r#"{
                    "token_id": 7,
                    "token_uri": "ipfs://QmToken",
                    "price_wei": "500000000000000000",
                    "owner": "0x1111111111111111111111111111111111111111",
                    "seller": "0x2222222222222222222222222222222222222222"
                }"#,
            )
            .create_async()
            .await;

        let record = reader(&server.url()).get_listed_token(7).await.unwrap();

        assert_eq!(record.token_id, 7);
        assert_eq!(record.price_wei, "500000000000000000");
    }

    #[tokio::test]
    async fn missing_token_is_not_listed() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", format!("/contracts/{}/tokens/9", CONTRACT).as_str())
            .with_status(404)
            .create_async()
            .await;

        let err = reader(&server.url()).get_listed_token(9).await.unwrap_err();

        assert!(matches!(err, Error::TokenNotListed(9)));
    }

    #[tokio::test]
    async fn stalled_response_body_is_cut_by_the_deadline() {
        use tokio::io::AsyncWriteExt;

        // Sends headers, then leaves the promised body hanging.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hold = tokio::spawn(async move {
            let mut sockets = Vec::new();
            loop {
                if let Ok((mut socket, _)) = listener.accept().await {
                    let _ = socket
                        .write_all(
                            b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 512\r\n\r\n",
                        )
                        .await;
                    sockets.push(socket);
                }
            }
        });

        let reader = HttpChainReader::new(
            rquest::Client::new(),
            &ChainConfig {
                endpoint: format!("http://{}", addr),
                contract_address: CONTRACT.to_string(),
                request_timeout_ms: 200,
            },
        );

        let err = tokio::time::timeout(Duration::from_secs(2), reader.get_all_listed_tokens())
            .await
            .expect("deadline must cover the response body")
            .unwrap_err();

        assert!(matches!(err, Error::ChainUnavailable(_)));
        hold.abort();
    }

    #[tokio::test]
    async fn malformed_payload_is_chain_unavailable() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", format!("/contracts/{}/tokens", CONTRACT).as_str())
            .with_status(200)
            .with_body(r#"{"not":"an array"}"#)
            .create_async()
            .await;

        let err = reader(&server.url())
            .get_all_listed_tokens()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ChainUnavailable(_)));
    }
}

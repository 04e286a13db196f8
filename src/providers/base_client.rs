use crate::core::error::ChatError;
use crate::providers::Transport;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// reqwest-backed transport. Uses the client's default timeouts; nothing is
/// retried.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self, ChatError> {
        let client = Client::builder()
            .user_agent(concat!("shopchat/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn post_json(&self, url: &str, body: &Value) -> Result<String, ChatError> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::debug!(%status, "endpoint returned non-success status");
        }
        Ok(text)
    }
}

use crate::core::error::ChatError;
use crate::providers::{InferenceClient, MISSING_CREDENTIAL_MESSAGE, NETWORK_ERROR_MESSAGE};
use async_trait::async_trait;

mod client;
mod types;

pub use client::GeminiClient;

#[async_trait]
impl InferenceClient for GeminiClient {
    async fn infer(&self, prompt: &str) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("no API key configured; skipping request");
            return MISSING_CREDENTIAL_MESSAGE.to_string();
        };

        match self.generate_content(api_key, prompt).await {
            Ok(text) => text,
            Err(ChatError::Api { code, message }) => {
                tracing::debug!(code, "inference endpoint rejected the request");
                format!("API Error: {}", message)
            }
            Err(e) => {
                tracing::debug!(error = %e, "inference request failed");
                NETWORK_ERROR_MESSAGE.to_string()
            }
        }
    }
}

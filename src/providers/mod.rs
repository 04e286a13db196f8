use crate::core::error::ChatError;
use async_trait::async_trait;
use serde_json::Value;

pub mod base_client;
pub mod gemini;
#[cfg(test)]
pub(crate) mod testing;

/// Shown in place of a reply when no credential has been configured.
pub const MISSING_CREDENTIAL_MESSAGE: &str = "Gemini API key is not configured. \
Set GEMINI_API_KEY or add api_key to ~/.shopchat/config.yaml.";

/// Shown in place of a reply when the endpoint could not be reached or
/// answered with something that is not a usable response.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error: unable to reach the assistant. Please try again.";

/// Turns a prompt into the text of an assistant message.
///
/// Implementations always resolve: every failure is folded into the returned
/// text, so callers never need an error branch of their own.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn infer(&self, prompt: &str) -> String;
}

/// Sends one JSON POST and hands back the raw response body.
///
/// Non-2xx statuses are not errors at this level; the body is returned so the
/// caller can read the endpoint's structured error object.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value) -> Result<String, ChatError>;
}

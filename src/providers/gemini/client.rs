use crate::config::Settings;
use crate::core::error::ChatError;
use crate::providers::Transport;
use crate::providers::gemini::types::*;
use reqwest::Url;
use std::sync::Arc;

#[derive(Clone)]
pub struct GeminiClient {
    pub model: String,
    base_url: Url,
    pub(super) api_key: Option<String>,
    transport: Arc<dyn Transport>,
}

impl GeminiClient {
    /// Builds a client from resolved settings. The credential is taken as given;
    /// a missing one is reported per request, not here.
    pub fn new(settings: Settings, transport: Arc<dyn Transport>) -> Result<Self, ChatError> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            ChatError::Config(format!("Invalid base URL '{}': {}", settings.base_url, e))
        })?;

        Ok(Self {
            model: settings.model,
            base_url,
            api_key: settings.api_key,
            transport,
        })
    }

    pub fn host(&self) -> &str {
        self.base_url.host_str().unwrap_or("")
    }

    fn endpoint(&self, api_key: &str) -> Result<Url, ChatError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let raw = format!("{}/v1beta/models/{}:generateContent", base, self.model);
        Url::parse_with_params(&raw, &[("key", api_key)])
            .map_err(|e| ChatError::Config(format!("Invalid endpoint '{}': {}", raw, e)))
    }

    /// One POST, one parse. No retries.
    pub async fn generate_content(&self, api_key: &str, prompt: &str) -> Result<String, ChatError> {
        let url = self.endpoint(api_key)?;
        let payload = serde_json::to_value(GeminiRequest::single(prompt))?;

        let response_body = self.transport.post_json(url.as_str(), &payload).await?;
        let parsed: GeminiResponse = serde_json::from_str(&response_body).map_err(|e| {
            ChatError::Serialization(format!("Failed to parse Gemini response: {}", e))
        })?;

        if let Some(error) = parsed.error {
            return Err(ChatError::Api {
                code: error.code.unwrap_or_default(),
                message: error.message.unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        parsed.first_text().ok_or_else(|| {
            ChatError::Serialization("Gemini response has no candidate text".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::testing::{StubTransport, settings};
    use serde_json::json;

    #[tokio::test]
    async fn posts_prompt_as_sole_content_with_key_in_query() {
        let transport = StubTransport::replying(json!({
            "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
        }));
        let client = GeminiClient::new(settings(Some("secret")), transport.clone()).unwrap();

        let reply = client.generate_content("secret", "  keep my spacing \n").await.unwrap();
        assert_eq!(reply, "ok");

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (url, body) = &requests[0];
        assert_eq!(
            url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent?key=secret"
        );
        assert_eq!(
            body,
            &json!({ "contents": [{ "parts": [{ "text": "  keep my spacing \n" }] }] })
        );
    }

    #[tokio::test]
    async fn error_object_becomes_api_error() {
        let transport = StubTransport::replying(json!({
            "error": { "code": 429, "message": "Quota exceeded" }
        }));
        let client = GeminiClient::new(settings(Some("k")), transport).unwrap();

        let err = client.generate_content("k", "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Api { code: 429, ref message } if message == "Quota exceeded"));
    }

    #[tokio::test]
    async fn missing_candidate_fields_are_a_shape_error() {
        for body in [
            json!({}),
            json!({ "candidates": [] }),
            json!({ "candidates": [{ "content": { "parts": [] } }] }),
            json!({ "candidates": [{ "content": { "parts": [{ "inlineData": {} }] } }] }),
        ] {
            let client = GeminiClient::new(settings(Some("k")), StubTransport::replying(body)).unwrap();
            let err = client.generate_content("k", "hi").await.unwrap_err();
            assert!(matches!(err, ChatError::Serialization(_)), "{err:?}");
        }
    }

    #[tokio::test]
    async fn non_json_body_is_a_shape_error() {
        let client =
            GeminiClient::new(settings(Some("k")), StubTransport::raw("<html>bad gateway</html>"))
                .unwrap();
        let err = client.generate_content("k", "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Serialization(_)));
    }

    #[test]
    fn rejects_unparsable_base_url() {
        let mut bad = settings(Some("k"));
        bad.base_url = "not a url".to_string();
        let result = GeminiClient::new(bad, StubTransport::raw("{}"));
        assert!(matches!(result, Err(ChatError::Config(_))));
    }
}

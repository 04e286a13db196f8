use crate::config::Settings;
use crate::core::error::ChatError;
use crate::providers::Transport;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Records every request and answers with a canned body or failure.
pub(crate) struct StubTransport {
    calls: AtomicUsize,
    pub requests: Mutex<Vec<(String, Value)>>,
    reply: Result<String, String>,
}

impl StubTransport {
    fn with_reply(reply: Result<String, String>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            reply,
        })
    }

    pub(crate) fn replying(body: Value) -> Arc<Self> {
        Self::with_reply(Ok(body.to_string()))
    }

    pub(crate) fn raw(body: &str) -> Arc<Self> {
        Self::with_reply(Ok(body.to_string()))
    }

    pub(crate) fn failing(reason: &str) -> Arc<Self> {
        Self::with_reply(Err(reason.to_string()))
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<String, ChatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));
        self.reply.clone().map_err(ChatError::Network)
    }
}

pub(crate) fn settings(api_key: Option<&str>) -> Settings {
    Settings {
        api_key: api_key.map(str::to_string),
        base_url: "https://generativelanguage.googleapis.com".to_string(),
        model: "gemini-2.0-flash".to_string(),
    }
}

//! The chat widget: conversation, input controller and inference client tied
//! into one `Idle -> AwaitingResponse -> Idle` cycle per submission.

pub mod controller;
pub mod transcript;

use crate::conversation::{Conversation, Message};
use crate::providers::InferenceClient;
use controller::{InputController, Rejection};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Arc;
use transcript::Transcript;

/// The single request a dispatched submission is waiting on.
pub type PendingReply = BoxFuture<'static, String>;

pub struct ChatWidget {
    conversation: Conversation,
    controller: InputController,
    client: Arc<dyn InferenceClient>,
}

impl ChatWidget {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self {
            conversation: Conversation::new(),
            controller: InputController::new(),
            client,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn draft(&self) -> &str {
        self.controller.draft()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.controller.set_draft(text);
    }

    pub fn is_busy(&self) -> bool {
        self.controller.is_busy()
    }

    /// A renderer observing this widget's conversation and busy flag.
    pub fn transcript(&self) -> Transcript {
        Transcript::new(
            self.conversation.subscribe(),
            self.controller.subscribe_busy(),
        )
    }

    /// First half of a submission. On success the user message is already in
    /// the conversation and the draft is empty; the returned future has not
    /// contacted the endpoint yet.
    pub fn dispatch(&mut self) -> Result<PendingReply, Rejection> {
        let prompt = self.controller.take_draft().inspect_err(|reason| {
            tracing::debug!(?reason, "submit ignored");
        })?;

        self.conversation.append(Message::user(prompt.clone()));
        tracing::debug!(messages = self.conversation.len(), "awaiting response");

        let client = Arc::clone(&self.client);
        Ok(async move { client.infer(&prompt).await }.boxed())
    }

    /// Second half: record the reply and return to idle.
    pub fn settle(&mut self, reply: String) {
        if !self.controller.is_busy() {
            tracing::warn!("reply arrived with no request in flight; dropped");
            return;
        }
        self.conversation.append(Message::assistant(reply));
        self.controller.release();
        tracing::debug!(messages = self.conversation.len(), "idle");
    }

    pub async fn submit(&mut self) -> Result<(), Rejection> {
        let pending = self.dispatch()?;
        let reply = pending.await;
        self.settle(reply);
        Ok(())
    }
}

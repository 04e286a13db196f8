use std::mem;
use tokio::sync::watch;

/// Why a submit attempt was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The draft is empty or whitespace only.
    EmptyDraft,
    /// A request is already in flight.
    Busy,
}

/// Draft text plus the busy flag that gates submission.
#[derive(Debug)]
pub struct InputController {
    draft: String,
    busy_tx: watch::Sender<bool>,
}

impl InputController {
    pub fn new() -> Self {
        let (busy_tx, _) = watch::channel(false);
        Self {
            draft: String::new(),
            busy_tx,
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn is_busy(&self) -> bool {
        *self.busy_tx.borrow()
    }

    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.busy_tx.subscribe()
    }

    /// Hands out the draft as typed and raises the busy flag, or leaves
    /// everything untouched.
    pub fn take_draft(&mut self) -> Result<String, Rejection> {
        if self.is_busy() {
            return Err(Rejection::Busy);
        }
        if self.draft.trim().is_empty() {
            return Err(Rejection::EmptyDraft);
        }
        self.busy_tx.send_replace(true);
        Ok(mem::take(&mut self.draft))
    }

    pub fn release(&mut self) {
        self.busy_tx.send_replace(false);
    }
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_draft_clears_and_raises_busy() {
        let mut controller = InputController::new();
        let mut busy = controller.subscribe_busy();
        controller.set_draft(" spaced out ");

        assert_eq!(controller.take_draft(), Ok(" spaced out ".to_string()));
        assert_eq!(controller.draft(), "");
        assert!(controller.is_busy());
        assert!(*busy.borrow_and_update());
    }

    #[test]
    fn whitespace_draft_is_rejected_and_kept() {
        let mut controller = InputController::new();
        controller.set_draft(" \t\n");

        assert_eq!(controller.take_draft(), Err(Rejection::EmptyDraft));
        assert_eq!(controller.draft(), " \t\n");
        assert!(!controller.is_busy());
    }

    #[test]
    fn busy_rejects_until_released() {
        let mut controller = InputController::new();
        controller.set_draft("first");
        controller.take_draft().unwrap();

        controller.set_draft("second");
        assert_eq!(controller.take_draft(), Err(Rejection::Busy));
        assert_eq!(controller.draft(), "second");

        controller.release();
        assert_eq!(controller.take_draft(), Ok("second".to_string()));
    }
}

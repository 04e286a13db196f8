use crate::conversation::Message;
use tokio::sync::watch;

pub const PENDING_TEXT: &str = "Thinking…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    User,
    Assistant,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub kind: RowKind,
    pub text: String,
}

/// One row per message, plus a trailing pending row while a request is in flight.
pub fn project(messages: &[Message], busy: bool) -> Vec<Row> {
    let mut rows: Vec<Row> = messages
        .iter()
        .map(|m| Row {
            kind: if m.is_user {
                RowKind::User
            } else {
                RowKind::Assistant
            },
            text: m.text.clone(),
        })
        .collect();

    if busy {
        rows.push(Row {
            kind: RowKind::Pending,
            text: PENDING_TEXT.to_string(),
        });
    }
    rows
}

/// How far the view has been scrolled: message rows already on screen, and
/// whether the pending row is currently showing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrollAnchor {
    pub rows: usize,
    pub pending: bool,
}

/// Read-only observer of the conversation length and busy flag.
pub struct Transcript {
    len_rx: watch::Receiver<usize>,
    busy_rx: watch::Receiver<bool>,
    anchor: ScrollAnchor,
}

impl Transcript {
    pub fn new(len_rx: watch::Receiver<usize>, busy_rx: watch::Receiver<bool>) -> Self {
        Self {
            len_rx,
            busy_rx,
            anchor: ScrollAnchor::default(),
        }
    }

    #[cfg(test)]
    pub fn anchor(&self) -> ScrollAnchor {
        self.anchor
    }

    /// Resolves when either observed cell changes. Returns `false` once the
    /// widget that owns them is gone.
    pub async fn changed(&mut self) -> bool {
        tokio::select! {
            r = self.len_rx.changed() => r.is_ok(),
            r = self.busy_rx.changed() => r.is_ok(),
        }
    }

    /// Returns the rows not yet on screen and scrolls to the newest one.
    pub fn reveal(&mut self, messages: &[Message]) -> Vec<Row> {
        self.len_rx.borrow_and_update();
        let busy = *self.busy_rx.borrow_and_update();

        let mut view = project(messages, busy);
        let message_rows = messages.len();
        let start = self.anchor.rows.min(message_rows);

        let pending = if busy { view.pop() } else { None };
        let mut fresh: Vec<Row> = view.drain(start..).collect();
        if let Some(row) = pending {
            if !self.anchor.pending {
                fresh.push(row);
            }
        }

        self.anchor = ScrollAnchor {
            rows: message_rows,
            pending: busy,
        };
        fresh
    }
}

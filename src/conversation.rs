use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub is_user: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: true,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: false,
        }
    }
}

/// Append-only transcript. Every append publishes the new length to subscribers.
#[derive(Debug)]
pub struct Conversation {
    messages: Vec<Message>,
    len_tx: watch::Sender<usize>,
}

impl Conversation {
    pub fn new() -> Self {
        let (len_tx, _) = watch::channel(0);
        Self {
            messages: Vec::new(),
            len_tx,
        }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.len_tx.send_replace(self.messages.len());
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.len_tx.subscribe()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_and_duplicates() {
        let mut conversation = Conversation::new();
        conversation.append(Message::user("hi"));
        conversation.append(Message::assistant("hello"));
        conversation.append(Message::user("hi"));

        assert_eq!(
            conversation.messages(),
            &[
                Message::user("hi"),
                Message::assistant("hello"),
                Message::user("hi"),
            ]
        );
    }

    #[test]
    fn append_notifies_subscribers() {
        let mut conversation = Conversation::new();
        let mut rx = conversation.subscribe();
        assert!(!rx.has_changed().unwrap());

        conversation.append(Message::user("one"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 1);

        conversation.append(Message::assistant("two"));
        assert_eq!(*rx.borrow_and_update(), 2);
    }
}

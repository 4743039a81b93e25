//! # Co-Pilot Chat State
//!
//! The transcript and the single in-flight flag.

use std::sync::{Arc, Mutex, PoisonError};

use udyamx_core::{ChatMessage, Sender};

#[derive(Debug, Default)]
struct Inner {
    messages: Vec<ChatMessage>,
    loading: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ChatState {
    inner: Arc<Mutex<Inner>>,
}

impl ChatState {
    /// A transcript that opens with the bot's welcome line.
    pub fn with_welcome(welcome: impl Into<String>) -> Self {
        let state = ChatState::default();
        state.append(ChatMessage::new(welcome, Sender::Bot));
        state
    }

    fn with_inner<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Inner) -> R,
    {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut inner)
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.with_inner(|inner| inner.messages.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.with_inner(|inner| inner.loading)
    }

    pub fn append(&self, message: ChatMessage) {
        self.with_inner(|inner| inner.messages.push(message));
    }

    /// Appends the user's message and marks a request in flight.
    ///
    /// Returns `false` (and appends nothing) when a request is already in
    /// flight.
    pub fn begin_request(&self, message: ChatMessage) -> bool {
        self.with_inner(|inner| {
            if inner.loading {
                return false;
            }
            inner.loading = true;
            inner.messages.push(message);
            true
        })
    }

    /// Clears the in-flight flag without a reply, for a request that was
    /// dropped before the gateway answered. The user's message stays.
    pub fn cancel_request(&self) {
        self.with_inner(|inner| inner.loading = false);
    }

    /// Appends the bot reply and clears the in-flight flag.
    pub fn finish_request(&self, reply: ChatMessage) {
        self.with_inner(|inner| {
            inner.messages.push(reply);
            inner.loading = false;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_request_in_flight() {
        let chat = ChatState::with_welcome("hello");
        assert_eq!(chat.messages()[0].sender, Sender::Bot);

        assert!(chat.begin_request(ChatMessage::new("first", Sender::User)));
        assert!(!chat.begin_request(ChatMessage::new("second", Sender::User)));
        assert!(chat.is_loading());

        chat.finish_request(ChatMessage::new("answer", Sender::Bot));
        assert!(!chat.is_loading());

        let texts: Vec<_> = chat.messages().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["hello", "first", "answer"]);

        assert!(chat.begin_request(ChatMessage::new("third", Sender::User)));
        chat.cancel_request();
        assert!(!chat.is_loading());
        assert_eq!(chat.messages().len(), 4);
    }
}

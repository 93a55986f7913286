//! Conversation state: an append-only, ordered log of chat messages.
//!
//! There is no way to edit or remove a message. The engine borrows the
//! transcript mutably for a whole request, so the user's message always
//! lands before the reply it triggers.

use domain::ChatMessage;
use serde::Serialize;

/// Opening line shown before the user has asked for anything
pub const GREETING: &str = "Hi! I'm your movie recommendation assistant. Tell me about your mood, \
                            favorite genres, or any specific preferences you have in mind!";

#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript that opens with the assistant greeting
    pub fn with_greeting() -> Self {
        let mut transcript = Self::new();
        transcript.append(ChatMessage::assistant(GREETING));
        transcript
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Owned copy of every message in creation order
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

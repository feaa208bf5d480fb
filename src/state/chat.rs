#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use serde::Serialize;

/// Greeting seeded into every new transcript.
pub const DEFAULT_GREETING: &str = "Hello! How can I help you today?";

/// Canned text appended after each accepted submission.
pub const DEFAULT_AUTO_REPLY: &str = "Thank you for your message! Our team will assist you shortly.";

/// State for the chat widget panel.
///
/// Mutated only through the methods below; the transcript is append-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatWidgetState {
    pub visible: bool,
    pub pending_input: String,
    transcript: Vec<ChatEntry>,
}

impl Default for ChatWidgetState {
    fn default() -> Self {
        Self::with_greeting(DEFAULT_GREETING)
    }
}

impl ChatWidgetState {
    /// Hidden panel, empty input, transcript seeded with one bot entry.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            visible: false,
            pending_input: String::new(),
            transcript: vec![ChatEntry::bot(greeting)],
        }
    }

    pub fn transcript(&self) -> &[ChatEntry] {
        &self.transcript
    }

    /// Flip panel visibility and return the new value.
    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// Whether the current input would be accepted by [`Self::take_submission`].
    pub fn can_send(&self) -> bool {
        !self.pending_input.trim().is_empty()
    }

    /// Accept the pending input as a user entry.
    ///
    /// Blank input (empty or whitespace only) leaves the state untouched and
    /// returns `None`. Otherwise the untrimmed text is appended, the input is
    /// cleared, and the text is returned so the caller can schedule a reply.
    pub fn take_submission(&mut self) -> Option<String> {
        if !self.can_send() {
            return None;
        }
        let text = std::mem::take(&mut self.pending_input);
        self.transcript.push(ChatEntry::user(text.clone()));
        Some(text)
    }

    pub fn push_reply(&mut self, text: impl Into<String>) {
        self.transcript.push(ChatEntry::bot(text));
    }
}

/// A single transcript entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatEntry {
    pub text: String,
    pub is_bot: bool,
}

impl ChatEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_bot: false }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_bot: true }
    }
}

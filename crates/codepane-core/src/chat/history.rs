use crate::chat::accumulator::{accumulate, finalize};
use crate::chat::message::ChatMessage;
use crate::constants::defaults::MAX_MESSAGES;
use crate::llm::Message;
use crate::project::IdSource;

/// The chat pane's message list plus the optional system prompt.
///
/// Every mutation replaces the list whole through the accumulator
/// functions; nothing edits a message behind the list's back.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    messages: Vec<ChatMessage>,
    max_messages: usize,
    system_prompt: Option<String>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            max_messages: MAX_MESSAGES,
            system_prompt: None,
        }
    }

    pub fn with_max_messages(mut self, max: usize) -> Self {
        self.max_messages = max.max(1);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn set_system_prompt(&mut self, prompt: Option<String>) {
        self.system_prompt = prompt;
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    /// Record a user submission and return its id.
    pub fn add_user_message(
        &mut self,
        ids: &mut impl IdSource,
        content: impl Into<String>,
    ) -> String {
        let message = ChatMessage::user(ids, content);
        let id = message.id.clone();
        self.messages.push(message);
        self.trim_if_needed();
        id
    }

    /// Apply one streamed chunk to the in-flight assistant reply.
    pub fn push_chunk(&mut self, ids: &mut impl IdSource, chunk: &str) {
        let messages = std::mem::take(&mut self.messages);
        self.messages = accumulate(messages, chunk, ids);
        self.trim_if_needed();
    }

    /// Freeze the in-flight reply with its final content.
    pub fn finish_turn(&mut self, ids: &mut impl IdSource, content: &str) {
        let messages = std::mem::take(&mut self.messages);
        self.messages = finalize(messages, content, ids);
        self.trim_if_needed();
    }

    /// Drop a partial assistant reply after a failed or cancelled turn.
    pub fn discard_in_flight(&mut self) -> Option<ChatMessage> {
        if self.messages.last().is_some_and(|m| m.is_assistant()) {
            self.messages.pop()
        } else {
            None
        }
    }

    /// Messages sent for a prompt: the system prompt, if any, then the prompt.
    pub fn request_messages(&self, prompt: &str) -> Vec<Message> {
        let mut messages = Vec::new();
        if let Some(ref system) = self.system_prompt {
            messages.push(Message::system(system));
        }
        messages.push(Message::user(prompt));
        messages
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    fn trim_if_needed(&mut self) {
        if self.messages.len() > self.max_messages {
            let excess = self.messages.len() - self.max_messages;
            self.messages.drain(..excess);
        }
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}

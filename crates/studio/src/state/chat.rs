use shared::{AiChatResponse, ChatRole, PromptMessage};

/// Conversation log size used when no config is given
pub const DEFAULT_MAX_MESSAGES: usize = 50;

/// A single chat message
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub is_error: bool,
    /// Provider that produced an assistant message
    pub provider: Option<String>,
}

/// Chat panel state: conversation log, pending input and retry slot
#[derive(Debug, Clone)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub is_loading: bool,
    pub last_failed_input: Option<String>,
    pub max_messages: usize,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::with_limit(DEFAULT_MAX_MESSAGES)
    }
}

impl ChatState {
    pub fn with_limit(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            is_loading: false,
            last_failed_input: None,
            max_messages,
        }
    }

    /// Take the pending input and log it as a user message.
    ///
    /// Returns the text to send plus the conversation history that preceded it,
    /// or `None` when the input is blank or a request is already in flight.
    pub fn begin_send(&mut self) -> Option<(String, Vec<PromptMessage>)> {
        let text = self.input.trim().to_string();
        if text.is_empty() || self.is_loading {
            return None;
        }
        let history = self.history();

        self.push(ChatMessage {
            role: ChatRole::User,
            text: text.clone(),
            is_error: false,
            provider: None,
        });
        self.input.clear();
        self.is_loading = true;
        self.last_failed_input = Some(text.clone());
        Some((text, history))
    }

    /// Log the reply to the message started with [`Self::begin_send`]
    pub fn receive(&mut self, response: &AiChatResponse) {
        self.is_loading = false;
        if response.success {
            self.last_failed_input = None;
        }
        self.push(ChatMessage {
            role: ChatRole::Assistant,
            text: response.content.clone(),
            is_error: !response.success,
            provider: Some(response.provider.clone()),
        });
    }

    /// Put the last failed input back so it can be sent again
    pub fn retry_input(&mut self) -> bool {
        match self.last_failed_input.take() {
            Some(text) if !self.is_loading => {
                self.input = text;
                true
            }
            other => {
                self.last_failed_input = other;
                false
            }
        }
    }

    /// Non-error messages as prompt history
    pub fn history(&self) -> Vec<PromptMessage> {
        self.messages
            .iter()
            .filter(|m| !m.is_error)
            .map(|m| PromptMessage::new(m.role, m.text.clone()))
            .collect()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.input.clear();
        self.is_loading = false;
        self.last_failed_input = None;
    }

    fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if self.messages.len() > self.max_messages {
            let excess = self.messages.len() - self.max_messages;
            self.messages.drain(..excess);
        }
    }
}

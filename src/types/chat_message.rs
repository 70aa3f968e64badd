use serde::{Deserialize, Serialize};

/// The author of one turn in a chat-completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instruction that steers the model's behavior.
    System,
    /// Text typed by the user.
    User,
}

/// One turn of the instruction set sent to the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who authored this turn.
    pub role: ChatRole,
    /// The turn's text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Creates a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

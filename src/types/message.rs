use serde::{Deserialize, Serialize};

use crate::utils::time::display_now;

/// Which way a logged message travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Sent by the local user.
    Outgoing,
}

/// Who authored a logged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The local user.
    User,
}

/// An entry in the session's append-only message log.
///
/// Only outgoing user messages are logged; replies go straight to export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The submitted text, possibly empty.
    pub text: String,
    /// Always [`Direction::Outgoing`].
    pub direction: Direction,
    /// Always [`Sender::User`].
    pub sender: Sender,
    /// Local submission time, formatted for display.
    #[serde(rename = "sentTime")]
    pub sent_time: String,
}

impl Message {
    /// Creates an outgoing user message stamped with the current time.
    pub fn outgoing(text: impl Into<String>) -> Self {
        Self::outgoing_at(text, display_now())
    }

    /// Creates an outgoing user message with an explicit display timestamp.
    pub fn outgoing_at(text: impl Into<String>, sent_time: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            direction: Direction::Outgoing,
            sender: Sender::User,
            sent_time: sent_time.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialized_shape() {
        let message = Message::outgoing_at("hi", "2024-01-02 03:04:05");
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "text": "hi",
                "direction": "outgoing",
                "sender": "user",
                "sentTime": "2024-01-02 03:04:05"
            })
        );
    }

    #[test]
    fn outgoing_stamps_time() {
        let message = Message::outgoing("");
        assert!(message.text.is_empty());
        assert!(!message.sent_time.is_empty());
    }
}

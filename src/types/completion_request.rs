use serde::{Deserialize, Serialize};

use crate::types::{ChatMessage, GenerationParameters, Model};

/// The JSON body of one chat-completion request.
///
/// The body carries only the fixed system instruction and a single user
/// turn; no prior conversation is included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Target model identifier.
    pub model: Model,

    /// The system turn followed by the user turn.
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,

    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

impl ChatCompletionRequest {
    /// Builds the two-turn request for `message`.
    pub fn new(
        model: Model,
        system_prompt: &str,
        message: &str,
        params: &GenerationParameters,
    ) -> Self {
        Self {
            model,
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(message)],
            temperature: params.temperature(),
            max_tokens: params.max_tokens(),
        }
    }
}

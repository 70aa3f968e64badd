use serde::{Deserialize, Serialize};

/// The path of a chat-completion response body that amadeus reads:
/// `choices[0].message.content`.
///
/// Nothing else in the body is declared, so extra or oddly typed fields never
/// reject an otherwise usable reply. Every field is optional so that error
/// bodies and truncated payloads still deserialize; callers decide what
/// counts as malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// Candidate completions, best first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
}

/// One candidate completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// The generated assistant turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ChoiceMessage>,
}

/// The assistant turn inside a [`Choice`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    /// Generated text. `null` when the model produced no text.
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Returns the first choice's text, if the response carries one.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .as_ref()?
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_content_of_well_formed_body() {
        let body = r#"{
            "id": "chatcmpl-1",
            "model": "gpt-3.5-turbo",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "  X  "}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "Y"}}
            ]
        }"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_content(), Some("  X  "));
    }

    #[test]
    fn unexpected_field_types_are_ignored() {
        let body = r#"{
            "id": 42,
            "model": ["gpt-3.5-turbo"],
            "created": "yesterday",
            "choices": [
                {"index": "zero", "finish_reason": 7, "message": {"role": 1, "content": "X"}}
            ]
        }"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_content(), Some("X"));
    }

    #[test]
    fn error_body_deserializes_without_choices() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert!(response.choices.is_none());
        assert_eq!(response.first_content(), None);
    }

    #[test]
    fn empty_choices_and_null_content() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(response.first_content(), None);

        let response: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert_eq!(response.first_content(), None);
    }
}

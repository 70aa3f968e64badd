// Public modules
pub mod chat_message;
pub mod completion_request;
pub mod completion_response;
pub mod credential;
pub mod generation_parameters;
pub mod message;
pub mod model;
pub mod reply;
pub mod request_status;

// Re-exports
pub use chat_message::{ChatMessage, ChatRole};
pub use completion_request::ChatCompletionRequest;
pub use completion_response::{ChatCompletionResponse, Choice, ChoiceMessage};
pub use credential::Credential;
pub use generation_parameters::{
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationParameters, MAX_TEMPERATURE,
    MIN_TEMPERATURE,
};
pub use message::{Direction, Message, Sender};
pub use model::{KnownModel, Model};
pub use reply::{MALFORMED_REPLY, Reply};
pub use request_status::RequestStatus;

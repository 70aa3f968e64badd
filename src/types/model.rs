use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a chat-completion model identifier.
///
/// This can be a predefined model version or a custom string value for
/// models the endpoint serves that are not listed here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier
    Custom(String),
}

/// Known chat-completion model versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// GPT-3.5 Turbo, the model every completion request targets by default.
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,

    /// GPT-4o mini
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,

    /// GPT-4o
    #[serde(rename = "gpt-4o")]
    Gpt4o,
}

impl Default for Model {
    fn default() -> Self {
        Model::Known(KnownModel::Gpt35Turbo)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{}", known_model),
            Model::Custom(custom) => write!(f, "{}", custom),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnownModel::Gpt35Turbo => write!(f, "gpt-3.5-turbo"),
            KnownModel::Gpt4oMini => write!(f, "gpt-4o-mini"),
            KnownModel::Gpt4o => write!(f, "gpt-4o"),
        }
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        match model {
            "gpt-3.5-turbo" => Model::Known(KnownModel::Gpt35Turbo),
            "gpt-4o-mini" => Model::Known(KnownModel::Gpt4oMini),
            "gpt-4o" => Model::Known(KnownModel::Gpt4o),
            other => Model::Custom(other.to_string()),
        }
    }
}

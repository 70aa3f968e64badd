//! Configuration types for the chat front end.
//!
//! This module provides CLI argument parsing via `arrrg` and the resolved
//! configuration the binary builds its components from.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use arrrg_derive::CommandLine;

use crate::client::SYSTEM_PROMPT;
use crate::cue::{CommandCue, Cue, TerminalBell};
use crate::types::{
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationParameters, MAX_TEMPERATURE,
    MIN_TEMPERATURE, Model,
};

/// Command-line arguments for the amadeus tool.
#[derive(CommandLine, Debug, Default, Eq, PartialEq)]
pub struct ChatArgs {
    /// File the credential is persisted in.
    #[arrrg(optional, "Credential storage file (default: <config dir>/amadeus/storage.json)", "PATH")]
    pub key_file: Option<String>,

    /// Name of the exported document.
    #[arrrg(optional, "File name for exported replies (default: response.pdf)", "FILE")]
    pub output: Option<String>,

    /// Directory exported documents are written to.
    #[arrrg(optional, "Directory for exported replies (default: current directory)", "DIR")]
    pub output_dir: Option<String>,

    /// Audio asset played on submission.
    #[arrrg(optional, "Audio file played when a message is sent", "PATH")]
    pub sound: Option<String>,

    /// Program used to play the audio asset.
    #[arrrg(optional, "Audio player command (default: paplay or afplay)", "CMD")]
    pub player: Option<String>,

    /// Initial sampling temperature.
    #[arrrg(optional, "Sampling temperature 0.0-1.0 (default: 0.7)", "TEMP")]
    pub temperature: Option<String>,

    /// Initial token limit.
    #[arrrg(optional, "Max tokens per reply (default: 50)", "TOKENS")]
    pub max_tokens: Option<u32>,

    /// Model to request.
    #[arrrg(optional, "Model to use (default: gpt-3.5-turbo)", "MODEL")]
    pub model: Option<String>,

    /// API root of an OpenAI-compatible endpoint.
    #[arrrg(optional, "API base URL (default: https://api.openai.com/v1/)", "URL")]
    pub base_url: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Rejected command-line values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatArgsError {
    /// Temperature that is not a number or lies outside `[0, 1]`.
    Temperature(String),
    /// Token limit below one.
    MaxTokens(u32),
}

impl fmt::Display for ChatArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatArgsError::Temperature(value) => write!(
                f,
                "--temperature expects a value between {MIN_TEMPERATURE} and {MAX_TEMPERATURE}, got {value}"
            ),
            ChatArgsError::MaxTokens(value) => {
                write!(f, "--max-tokens expects a positive integer, got {value}")
            }
        }
    }
}

impl std::error::Error for ChatArgsError {}

/// Resolved configuration for a chat front end.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The model completions are requested from.
    pub model: Model,

    /// Instruction sent ahead of every user message.
    pub system_prompt: String,

    /// Initial generation parameters.
    pub parameters: GenerationParameters,

    /// Credential storage file; `None` selects the default location.
    pub key_file: Option<PathBuf>,

    /// Export file name; `None` selects `response.pdf`.
    pub output: Option<String>,

    /// Directory exports are written to.
    pub output_dir: PathBuf,

    /// Audio asset played on submission.
    pub sound: Option<PathBuf>,

    /// Player command for the audio asset.
    pub player: Option<String>,

    /// API root override.
    pub base_url: Option<String>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gpt-3.5-turbo
    /// - Temperature: 0.7, max tokens: 50
    /// - Export: `./response.pdf`
    /// - Cue: terminal bell
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            parameters: GenerationParameters::default(),
            key_file: None,
            output: None,
            output_dir: PathBuf::from("."),
            sound: None,
            player: None,
            base_url: None,
            use_color: true,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the generation parameters.
    pub fn with_parameters(mut self, parameters: GenerationParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Sets the credential storage file.
    pub fn with_key_file(mut self, path: Option<PathBuf>) -> Self {
        self.key_file = path;
        self
    }

    /// Sets the export file name.
    pub fn with_output(mut self, output: Option<String>) -> Self {
        self.output = output;
        self
    }

    /// Sets the export directory.
    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    /// Sets the audio asset and player.
    pub fn with_sound(mut self, sound: Option<PathBuf>, player: Option<String>) -> Self {
        self.sound = sound;
        self.player = player;
        self
    }

    /// Sets the API root.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Builds the notification cue this configuration describes.
    ///
    /// An audio asset with a usable player becomes a [`CommandCue`];
    /// otherwise the terminal bell rings.
    pub fn cue(&self) -> Arc<dyn Cue> {
        let Some(sound) = &self.sound else {
            return Arc::new(TerminalBell);
        };
        match &self.player {
            Some(player) => Arc::new(CommandCue::new(player.clone(), sound.clone())),
            None => match CommandCue::with_default_player(sound.clone()) {
                Some(cue) => Arc::new(cue),
                None => Arc::new(TerminalBell),
            },
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<ChatArgs> for ChatConfig {
    type Error = ChatArgsError;

    fn try_from(args: ChatArgs) -> Result<Self, Self::Error> {
        let (temperature, raw_temperature) = match args.temperature {
            Some(raw) => match raw.trim().parse::<f32>() {
                Ok(value) => (value, raw),
                Err(_) => return Err(ChatArgsError::Temperature(raw)),
            },
            None => (DEFAULT_TEMPERATURE, DEFAULT_TEMPERATURE.to_string()),
        };
        let max_tokens = args.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
        let mut parameters = GenerationParameters::default();
        parameters
            .set_temperature(temperature)
            .map_err(|_| ChatArgsError::Temperature(raw_temperature))?;
        parameters
            .set_max_tokens(max_tokens)
            .map_err(|_| ChatArgsError::MaxTokens(max_tokens))?;

        Ok(ChatConfig {
            model: args.model.as_deref().map(Model::from).unwrap_or_default(),
            parameters,
            key_file: args.key_file.map(PathBuf::from),
            output: args.output,
            output_dir: args
                .output_dir
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            sound: args.sound.map(PathBuf::from),
            player: args.player,
            base_url: args.base_url,
            use_color: !args.no_color,
            ..ChatConfig::new()
        })
    }
}

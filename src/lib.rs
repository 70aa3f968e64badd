// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod credential_store;
pub mod cue;
pub mod error;
pub mod export;
pub mod observability;
pub mod render;
pub mod types;
pub mod utils;

// Re-exports
pub use client::{Completion, OpenAi, SYSTEM_PROMPT, parse_reply};
pub use client_logger::{ClientLogger, NullLogger, StderrLogger};
pub use credential_store::{CREDENTIAL_KEY, CredentialStore};
pub use cue::{CommandCue, Cue, SilentCue, TerminalBell};
pub use error::{Error, Result};
pub use export::{DEFAULT_FILENAME, Exporter, PdfExporter};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
pub use types::*;

//! Chat front end: the interaction controller and its terminal controls.
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`controller`]: front-end state and the submit/export flow
//! - [`commands`]: slash command parsing

mod commands;
mod config;
mod controller;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatArgsError, ChatConfig};
pub use controller::{Controller, Submission, SubmissionOutcome};

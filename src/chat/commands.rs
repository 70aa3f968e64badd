//! Slash command parsing for the chat front end.
//!
//! This module handles parsing of special commands that start with `/`,
//! which drive the controls of the front end (credential, settings,
//! parameters) without submitting a message.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Save the credential. An empty string is a valid credential.
    Key(String),

    /// Submit the current draft as-is.
    Send,

    /// Submit text that itself begins with `/`, written with a doubled slash.
    Message(String),

    /// Show or hide the settings panel. `None` toggles.
    Settings(Option<bool>),

    /// Set the sampling temperature.
    Temperature(f32),

    /// Set the maximum tokens per reply.
    MaxTokens(u32),

    /// Show the request status and configuration.
    Status,

    /// Show the messages sent this session.
    History,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be submitted as a message. Only input whose first character is `/`
/// is a command; `//` escapes a message that starts with a slash. The `/key`
/// argument is everything after the first space, kept verbatim.
///
/// # Examples
///
/// ```
/// # use amadeus::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/temperature 0.4").is_some());
/// assert!(parse_command("Tell me about my project").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let rest = input.strip_prefix('/')?;
    if rest.starts_with('/') {
        return Some(ChatCommand::Message(rest.to_string()));
    }

    let (command, raw_argument) = match rest.split_once(' ') {
        Some((command, argument)) => (command, Some(argument)),
        None => (rest, None),
    };
    let command = command.trim_end().to_lowercase();
    let argument = raw_argument.map(str::trim).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "key" => ChatCommand::Key(raw_argument.unwrap_or_default().to_string()),
        "send" => ChatCommand::Send,
        "settings" => match argument {
            None => ChatCommand::Settings(None),
            Some(arg) => match parse_on_off(arg) {
                Some(value) => ChatCommand::Settings(Some(value)),
                None => ChatCommand::Invalid("/settings expects 'on' or 'off'".to_string()),
            },
        },
        "temperature" => match argument {
            Some(arg) => match parse_f32_in_range(arg, 0.0, 1.0) {
                Ok(value) => ChatCommand::Temperature(value),
                Err(err) => ChatCommand::Invalid(format!("/temperature {err}")),
            },
            None => ChatCommand::Invalid("/temperature requires a value".to_string()),
        },
        "max_tokens" => match argument {
            Some(arg) => match arg.parse::<u32>() {
                Ok(value) if value >= 1 => ChatCommand::MaxTokens(value),
                _ => ChatCommand::Invalid("/max_tokens expects a positive integer".to_string()),
            },
            None => ChatCommand::Invalid("/max_tokens requires a value".to_string()),
        },
        "status" | "stats" => ChatCommand::Status,
        "history" => ChatCommand::History,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_f32_in_range(value: &str, min: f32, max: f32) -> Result<f32, String> {
    let parsed: f32 = value
        .parse()
        .map_err(|_| format!("expects a value between {min} and {max}"))?;
    if parsed.is_finite() && parsed >= min && parsed <= max {
        Ok(parsed)
    } else {
        Err(format!("expects a value between {min} and {max}"))
    }
}

fn parse_on_off(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Type a message and press Enter to send it; the reply is saved as a PDF.
Available commands:
  /key [value]           Save the API key (no argument saves an empty key)
  /send                  Send the current draft as-is (may be empty)
  //text                 Send a message that starts with /text
  /settings [on|off]     Show or hide generation settings (no argument toggles)
  /temperature <v>       Set temperature 0.0-1.0 (settings must be shown)
  /max_tokens <n>        Set maximum reply tokens (settings must be shown)
  /status                Show request status and configuration
  /history               Show messages sent this session
  /help                  Show this help message
  /quit                  Exit"#
}

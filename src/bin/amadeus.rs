//! Terminal chat front end that turns each reply into a PDF.
//!
//! Every line typed is sent as one message to the chat-completion endpoint
//! together with a fixed system instruction. A notification cue plays when
//! the message is sent, and the reply is written to `response.pdf`.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings
//! amadeus
//!
//! # Play a sound on send and write replies elsewhere
//! amadeus --sound assets/sent.flac --output-dir ~/Downloads
//!
//! # Longer replies
//! amadeus --max-tokens 400
//! ```
//!
//! # Commands
//!
//! - `/key [value]` - Save the API key
//! - `//text` - Send a message that starts with `/text`
//! - `/settings [on|off]` - Show or hide generation settings
//! - `/temperature <v>`, `/max_tokens <n>` - Edit settings while shown
//! - `/status`, `/history` - Inspect the session
//! - `/quit` - Exit the application

use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::task::JoinSet;

use amadeus::chat::{ChatArgs, ChatCommand, ChatConfig, Controller, help_text, parse_command};
use amadeus::{CredentialStore, OpenAi, PdfExporter, PlainTextRenderer, Renderer};

/// Main entry point for the amadeus application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("amadeus [OPTIONS]");
    let config = ChatConfig::try_from(args)?;

    let renderer: Arc<dyn Renderer> = Arc::new(PlainTextRenderer::with_color(config.use_color));
    let store = match &config.key_file {
        Some(path) => CredentialStore::open(path)?,
        None => CredentialStore::open_default()?,
    };
    let client = OpenAi::with_options(config.base_url.clone(), None)?
        .with_model(config.model.clone())
        .with_system_prompt(config.system_prompt.clone());
    let exporter = PdfExporter::new(config.output_dir.clone());
    let controller = Controller::new(Arc::new(client), Arc::new(exporter), config.cue(), store)
        .with_parameters(config.parameters)
        .with_filename(config.output.clone());

    let mut rl = DefaultEditor::new()?;
    let mut pending = JoinSet::new();

    println!("Amadeus (model: {})", config.model);
    println!("Changing max tokens is required if you need a longer text!");
    println!("Type /help for commands, /quit to exit\n");
    if controller.credential().is_empty() {
        renderer.print_info("No API key saved. Use /key <value> to save one.");
    }

    loop {
        match rl.readline("You: ") {
            Ok(line) => {
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line.as_str());

                if let Some(cmd) = parse_command(&line) {
                    match cmd {
                        ChatCommand::Quit => break,
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Key(value) => match controller.save_credential(value) {
                            Ok(()) => renderer.print_info("API key saved."),
                            Err(err) => {
                                renderer.print_error(&format!("Failed to save API key: {}", err))
                            }
                        },
                        ChatCommand::Send => dispatch(&controller, &renderer, &mut pending),
                        ChatCommand::Message(text) => {
                            controller.set_draft(text);
                            dispatch(&controller, &renderer, &mut pending);
                        }
                        ChatCommand::Settings(visible) => {
                            let visible = match visible {
                                Some(visible) => {
                                    controller.set_settings_visible(visible);
                                    visible
                                }
                                None => controller.toggle_settings(),
                            };
                            if visible {
                                print_settings(&controller);
                            } else {
                                renderer.print_info("Settings hidden.");
                            }
                        }
                        ChatCommand::Temperature(value) => {
                            if !controller.settings_visible() {
                                renderer.print_error("Settings are hidden; use /settings on first.");
                            } else if let Err(err) = controller.set_temperature(value) {
                                renderer.print_error(&err.to_string());
                            } else {
                                renderer.print_info(&format!("temperature set to {value:.1}"));
                            }
                        }
                        ChatCommand::MaxTokens(value) => {
                            if !controller.settings_visible() {
                                renderer.print_error("Settings are hidden; use /settings on first.");
                            } else if let Err(err) = controller.set_max_tokens(value) {
                                renderer.print_error(&err.to_string());
                            } else {
                                renderer.print_info(&format!("max_tokens set to {value}"));
                            }
                        }
                        ChatCommand::Status => print_status(&controller, &config),
                        ChatCommand::History => print_history(&controller),
                        ChatCommand::Invalid(message) => renderer.print_error(&message),
                    }
                    continue;
                }

                controller.set_draft(line);
                dispatch(&controller, &renderer, &mut pending);
            }
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    if controller.in_flight() > 0 {
        renderer.print_info(&format!(
            "Waiting for {} pending repl{}...",
            controller.in_flight(),
            if controller.in_flight() == 1 { "y" } else { "ies" }
        ));
    }
    while pending.join_next().await.is_some() {}
    println!("Goodbye!");
    Ok(())
}

/// Submits the current draft and finishes it on a background task so that
/// further input is accepted while the reply is outstanding.
fn dispatch(controller: &Controller, renderer: &Arc<dyn Renderer>, pending: &mut JoinSet<()>) {
    let submission = controller.begin_submit();
    renderer.print_status(&controller.status());
    let renderer = Arc::clone(renderer);
    pending.spawn(async move {
        match submission.finish().await {
            Ok(outcome) => renderer.print_reply(outcome.text(), &outcome.path),
            Err(err) => renderer.print_error(&format!("Request failed: {}", err)),
        }
    });
}

fn print_settings(controller: &Controller) {
    let params = controller.parameters();
    println!("    AI Settings:");
    println!("      Temperature: {:.1} (0.0-1.0)", params.temperature());
    println!("      Max tokens: {} (>= 1)", params.max_tokens());
}

fn print_status(controller: &Controller, config: &ChatConfig) {
    let status = controller.status().to_string();
    println!("    Session Status:");
    println!(
        "      Request status: {}",
        if status.is_empty() { "(idle)" } else { &status }
    );
    println!("      In flight: {}", controller.in_flight());
    println!("      API key: {}", controller.credential().masked());
    println!("      Model: {}", config.model);
    println!("      Messages sent: {}", controller.messages().len());
    println!(
        "      Settings: {}",
        if controller.settings_visible() {
            "shown"
        } else {
            "hidden"
        }
    );
    let params = controller.parameters();
    println!("      Temperature: {:.1}", params.temperature());
    println!("      Max tokens: {}", params.max_tokens());
    println!(
        "      Export: {}",
        config
            .output_dir
            .join(
                controller
                    .filename()
                    .as_deref()
                    .unwrap_or(amadeus::DEFAULT_FILENAME)
            )
            .display()
    );
}

fn print_history(controller: &Controller) {
    let messages = controller.messages();
    if messages.is_empty() {
        println!("    (no messages sent)");
        return;
    }
    for message in messages {
        println!("    [{}] {}", message.sent_time, message.text);
    }
}

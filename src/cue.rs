//! Notification cue played when a message is submitted.
//!
//! Playback is fire-and-forget: [`Cue::play`] returns immediately, never
//! reports failure, and rapid calls may overlap.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use crate::observability::{CUE_ERRORS, CUE_PLAYS};

/// A short audio cue.
pub trait Cue: Send + Sync {
    /// Starts playback and returns without waiting for it to finish.
    fn play(&self);
}

/// Plays an audio file by launching an external player per call.
///
/// Each call spawns a fresh player process, so overlapping playback is
/// possible. The process is reaped on a background thread.
#[derive(Debug, Clone)]
pub struct CommandCue {
    player: String,
    asset: PathBuf,
}

impl CommandCue {
    /// Creates a cue that runs `player <asset>`.
    pub fn new(player: impl Into<String>, asset: impl Into<PathBuf>) -> Self {
        Self {
            player: player.into(),
            asset: asset.into(),
        }
    }

    /// Creates a cue using the platform's stock command-line player, if any.
    pub fn with_default_player(asset: impl Into<PathBuf>) -> Option<Self> {
        default_player().map(|player| Self::new(player, asset))
    }

    /// The player program.
    pub fn player(&self) -> &str {
        &self.player
    }
}

impl Cue for CommandCue {
    fn play(&self) {
        CUE_PLAYS.click();
        let spawned = Command::new(&self.player)
            .arg(&self.asset)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(mut child) => {
                let reaper = thread::Builder::new()
                    .name("amadeus-cue".to_string())
                    .spawn(move || {
                        let _ = child.wait();
                    });
                if reaper.is_err() {
                    CUE_ERRORS.click();
                }
            }
            Err(_) => CUE_ERRORS.click(),
        }
    }
}

/// Rings the terminal bell.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Cue for TerminalBell {
    fn play(&self) {
        CUE_PLAYS.click();
        let mut stderr = io::stderr();
        if stderr.write_all(b"\x07").and_then(|_| stderr.flush()).is_err() {
            CUE_ERRORS.click();
        }
    }
}

/// Plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCue;

impl Cue for SilentCue {
    fn play(&self) {}
}

/// Returns the stock audio player for this platform.
pub fn default_player() -> Option<&'static str> {
    if cfg!(target_os = "macos") {
        Some("afplay")
    } else if cfg!(target_os = "linux") {
        Some("paplay")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn missing_player_does_not_panic() {
        let cue = CommandCue::new("amadeus-no-such-player", "sent.flac");
        cue.play();
        cue.play();
    }

    #[cfg(unix)]
    #[test]
    fn play_does_not_wait_for_player() {
        let cue = CommandCue::new("sleep", "5");
        let start = Instant::now();
        cue.play();
        cue.play();
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn default_player_matches_platform() {
        let cue = CommandCue::with_default_player("sent.flac");
        if cfg!(any(target_os = "macos", target_os = "linux")) {
            assert!(cue.is_some());
        } else {
            assert!(cue.is_none());
        }
    }
}

/*
 * Meeting Minutes CLI - Rust Edition
 * Copyright (c) 2024 Meeting Minutes Contributors
 *
 * This work is licensed under the Creative Commons Attribution-NonCommercial 4.0 International License.
 * To view a copy of this license, visit http://creativecommons.org/licenses/by-nc/4.0/
 *
 * You are free to share and adapt this work for non-commercial purposes with attribution.
 * Commercial use is prohibited without explicit written permission.
 *
 * For commercial licensing inquiries, please contact the project maintainers.
 */

use std::io::BufRead;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::types::AppEvent;

const DEBOUNCE_MS: u64 = 50;

/// Maps single-letter commands typed on stdin to application events.
pub struct CommandHandler {
    last_event_time: Instant,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self {
            last_event_time: Instant::now(),
        }
    }

    pub fn handle_input(&mut self, input: &str) -> Option<AppEvent> {
        let now = Instant::now();

        // Debounce accidental repeats (held enter key, pasted input)
        if now.duration_since(self.last_event_time).as_millis() < DEBOUNCE_MS as u128 {
            return None;
        }
        self.last_event_time = now;

        match input.trim().to_lowercase().as_str() {
            "r" | "record" | "start" => Some(AppEvent::StartRecording),
            "s" | "stop" => Some(AppEvent::StopRecording),
            "a" | "agenda" => Some(AppEvent::ReloadAgenda),
            "g" | "generate" | "minutes" => Some(AppEvent::GenerateMinutes),
            "t" | "transcript" => Some(AppEvent::ExportTranscript),
            "m" | "export" => Some(AppEvent::ExportMinutes),
            "c" | "clear" => Some(AppEvent::ClearTranscript),
            "h" | "help" | "?" => Some(AppEvent::ShowHelp),
            "q" | "quit" | "exit" => Some(AppEvent::Shutdown),
            "" => None,
            other => {
                tracing::debug!("Ignoring unknown command: {}", other);
                None
            }
        }
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Read stdin line by line on a blocking task and feed mapped events into
/// the main loop. Stdin EOF is treated as a quit request.
pub fn spawn_command_listener(
    event_tx: mpsc::UnboundedSender<AppEvent>,
    cancellation_token: CancellationToken,
) {
    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        let mut handler = CommandHandler::new();

        for line in stdin.lock().lines() {
            if cancellation_token.is_cancelled() {
                break;
            }

            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Failed to read command input: {}", e);
                    break;
                }
            };

            if let Some(event) = handler.handle_input(&line) {
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        }

        let _ = event_tx.send(AppEvent::Shutdown);
    });
}

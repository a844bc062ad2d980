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

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Local};
use std::fmt;
use tokio::sync::mpsc;

/// User-driven application events, dispatched by the main event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    StartRecording,
    StopRecording,
    ReloadAgenda,
    GenerateMinutes,
    MinutesReady { seq: u64, text: String },
    ExportTranscript,
    ExportMinutes,
    ClearTranscript,
    ShowHelp,
    Shutdown,
}

/// Recognition session lifecycle. `Idle` is both the initial and the
/// terminal state; a stopped session can be started again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Recording,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Recording => write!(f, "recording"),
        }
    }
}

/// A single transcript/confidence alternative inside a recognition result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub transcript: String,
    pub confidence: f32,
}

/// One result inside a capability `result` event. Provisional results are
/// revisable; final results are committed to the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub is_final: bool,
    pub alternatives: Vec<Hypothesis>,
}

impl RecognitionResult {
    /// Top-ranked alternative for this result, if any.
    pub fn best(&self) -> Option<&Hypothesis> {
        self.alternatives.first()
    }
}

/// Events emitted by the recognition capability, out-of-band.
#[derive(Debug, Clone)]
pub enum RecognitionEvent {
    Started,
    Result(Vec<RecognitionResult>),
    Error(String),
    Ended,
}

/// A finalized speech segment with its heuristic speaker attribution.
/// Immutable once appended to the buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub timestamp: DateTime<Local>,
    pub speaker_id: u8,
    pub text: String,
}

impl TranscriptEntry {
    pub fn render(&self) -> String {
        format!(
            "[{}] Speaker {}: {}",
            self.timestamp.format("%H:%M:%S"),
            self.speaker_id,
            self.text
        )
    }
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Observable state snapshots emitted by the session for the presentation
/// layer. The core never touches the terminal directly.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    StateChanged(SessionState),
    InterimUpdated(String),
    EntryAppended(TranscriptEntry),
    Status(String),
}

pub type SessionEventSender = mpsc::UnboundedSender<SessionEvent>;
pub type SessionEventReceiver = mpsc::UnboundedReceiver<SessionEvent>;

pub type RecognitionEventSender = mpsc::UnboundedSender<RecognitionEvent>;
pub type RecognitionEventReceiver = mpsc::UnboundedReceiver<RecognitionEvent>;

/// Error taxonomy. None of these are fatal to the process; all surface
/// through the status sink.
#[derive(Debug, thiserror::Error)]
pub enum MeetingError {
    #[error("Speech recognition capability unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("Recognition runtime error: {0}")]
    Recognition(String),

    #[error("Failed to read agenda file: {0}")]
    FileRead(String),

    #[error("Unsupported agenda format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid session transition: {0}")]
    InvalidTransition(String),
}

/// Outcome of an agenda upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgendaOutcome {
    /// Plain-text content was loaded (byte length of the content).
    Loaded(usize),
    /// Recognized binary document format; the placeholder was installed.
    Placeholder,
    /// Unrecognized extension; the agenda was left untouched.
    Ignored(String),
}

#[derive(Debug, Clone)]
pub struct CommandInfo {
    pub key: &'static str,
    pub description: &'static str,
}

impl CommandInfo {
    pub fn get_all_commands() -> Vec<CommandInfo> {
        vec![
            CommandInfo { key: "r", description: "Start recording (clears the current transcript)" },
            CommandInfo { key: "s", description: "Stop recording" },
            CommandInfo { key: "a", description: "Reload the agenda file" },
            CommandInfo { key: "g", description: "Generate meeting minutes" },
            CommandInfo { key: "t", description: "Export the transcript" },
            CommandInfo { key: "m", description: "Export the minutes" },
            CommandInfo { key: "c", description: "Clear transcript and minutes" },
            CommandInfo { key: "h", description: "Show this command list" },
            CommandInfo { key: "q", description: "Quit" },
        ]
    }

    pub fn format_commands() -> String {
        let commands = Self::get_all_commands();
        let mut result = String::new();

        for (i, command) in commands.iter().enumerate() {
            if i > 0 {
                result.push_str(" • ");
            }
            result.push_str(command.key);
        }

        result
    }
}

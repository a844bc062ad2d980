/*
 * Meeting Minutes CLI - Transcript Buffer & Turn-Taking
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

use chrono::{DateTime, Duration as ChronoDuration, Local};

use crate::config::DEFAULT_SPEAKER_GAP_MS;
use crate::types::TranscriptEntry;

/// Pause-based speaker alternation between Speaker 1 and Speaker 2.
///
/// A finalized segment flips the active label when more than the configured
/// gap elapsed since the previous segment. This approximates diarization
/// without audio analysis: alternation faster than the gap is attributed to
/// one speaker, and long monologues are never split. Both are accepted
/// limitations of the heuristic.
#[derive(Debug, Clone)]
pub struct SpeakerState {
    current_speaker: u8,
    last_speech_at: Option<DateTime<Local>>,
    gap: ChronoDuration,
}

impl Default for SpeakerState {
    fn default() -> Self {
        Self::new(DEFAULT_SPEAKER_GAP_MS)
    }
}

impl SpeakerState {
    pub fn new(gap_ms: i64) -> Self {
        Self {
            current_speaker: 1,
            last_speech_at: None,
            gap: ChronoDuration::milliseconds(gap_ms),
        }
    }

    pub fn current_speaker(&self) -> u8 {
        self.current_speaker
    }

    /// Register a finalized segment arriving at `at` and return the speaker
    /// id it belongs to (post-flip). `last_speech_at` is updated
    /// unconditionally.
    pub fn observe(&mut self, at: DateTime<Local>) -> u8 {
        if let Some(last) = self.last_speech_at {
            if at - last > self.gap {
                self.current_speaker = if self.current_speaker == 1 { 2 } else { 1 };
            }
        }
        self.last_speech_at = Some(at);
        self.current_speaker
    }

    /// Back to Speaker 1 with no speech history. Called on session start,
    /// never on capability auto-restart.
    pub fn reset(&mut self) {
        self.current_speaker = 1;
        self.last_speech_at = None;
    }
}

/// Ordered, append-only sequence of finalized transcript entries. Owned by
/// the session; cleared exactly when a new recording session starts.
#[derive(Debug, Clone, Default)]
pub struct TranscriptBuffer {
    entries: Vec<TranscriptEntry>,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Verbatim concatenation of all entry renderings in arrival order.
    pub fn render_full(&self) -> String {
        self.entries
            .iter()
            .map(TranscriptEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/*
 * Meeting Minutes CLI - Recognition Session Controller
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

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::recognition::RecognitionCapability;
use crate::transcript::{SpeakerState, TranscriptBuffer};
use crate::types::{
    MeetingError, RecognitionEvent, RecognitionResult, SessionEvent, SessionEventSender,
    SessionState, TranscriptEntry,
};

/// State machine wrapping the external recognition capability:
/// `Idle → Recording → Idle`, re-enterable. Owns the transcript buffer and
/// speaker state, and the restart-on-end behavior that keeps a session
/// alive across platform-initiated stream ends (silence timeouts).
pub struct RecognitionSession {
    id: Option<Uuid>,
    state: SessionState,
    transcript: TranscriptBuffer,
    speakers: SpeakerState,
    interim: String,
    capability: Option<Box<dyn RecognitionCapability>>,
    events: SessionEventSender,
    restarts: u64,
}

impl RecognitionSession {
    pub fn new(
        capability: Option<Box<dyn RecognitionCapability>>,
        speaker_gap_ms: i64,
        events: SessionEventSender,
    ) -> Self {
        Self {
            id: None,
            state: SessionState::Idle,
            transcript: TranscriptBuffer::new(),
            speakers: SpeakerState::new(speaker_gap_ms),
            interim: String::new(),
            capability,
            events,
            restarts: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transcript(&self) -> &TranscriptBuffer {
        &self.transcript
    }

    pub fn interim(&self) -> &str {
        &self.interim
    }

    pub fn has_capability(&self) -> bool {
        self.capability.is_some()
    }

    pub fn restart_count(&self) -> u64 {
        self.restarts
    }

    /// Begin a new recording session. Valid only from `Idle`. The buffer,
    /// speaker state and interim string are reset here and nowhere else.
    pub async fn start(&mut self) -> Result<(), MeetingError> {
        if self.state != SessionState::Idle {
            return Err(MeetingError::InvalidTransition(
                "recording is already in progress".to_string(),
            ));
        }

        let capability = self.capability.as_mut().ok_or_else(|| {
            MeetingError::CapabilityUnavailable(
                "no speech recognition capability was detected at startup".to_string(),
            )
        })?;

        capability
            .start()
            .await
            .map_err(|e| MeetingError::Recognition(e.to_string()))?;

        // Reset happens on successful start and nowhere else
        self.transcript.clear();
        self.speakers.reset();
        self.interim.clear();
        self.restarts = 0;

        let session_id = Uuid::new_v4();
        self.id = Some(session_id);
        self.state = SessionState::Recording;
        tracing::info!("Recording session started: {}", session_id);

        self.emit(SessionEvent::InterimUpdated(String::new()));
        self.emit(SessionEvent::StateChanged(self.state));
        self.emit(SessionEvent::Status("🔴 Recording started".to_string()));
        Ok(())
    }

    /// Halt the capability and return to `Idle`. Valid only from
    /// `Recording`. The transcript survives for compilation and export.
    pub async fn stop(&mut self) -> Result<(), MeetingError> {
        if self.state != SessionState::Recording {
            return Err(MeetingError::InvalidTransition(
                "no recording is in progress".to_string(),
            ));
        }

        // Leave Recording first: the capability echoes an `end` event while
        // halting, and that echo must not trigger a restart.
        self.state = SessionState::Idle;
        self.interim.clear();

        if let Some(capability) = self.capability.as_mut() {
            if let Err(e) = capability.stop().await {
                tracing::warn!("Recognizer did not stop cleanly: {}", e);
                self.emit(SessionEvent::Status(format!(
                    "⚠️  Recognizer did not stop cleanly: {}",
                    e
                )));
            }
        }

        if let Some(session_id) = self.id {
            tracing::info!(
                "Recording session stopped: {} ({} entries, {} auto-restarts)",
                session_id,
                self.transcript.len(),
                self.restarts
            );
        }

        self.emit(SessionEvent::InterimUpdated(String::new()));
        self.emit(SessionEvent::StateChanged(self.state));
        self.emit(SessionEvent::Status("⏹️  Recording stopped".to_string()));
        Ok(())
    }

    /// Wipe transcript, speaker state and interim without starting a new
    /// session.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.speakers.reset();
        self.interim.clear();
        self.emit(SessionEvent::InterimUpdated(String::new()));
        self.emit(SessionEvent::Status("🗑️  Transcript cleared".to_string()));
    }

    /// Route one out-of-band capability event. Handlers run to completion
    /// and never block.
    pub async fn handle_recognition_event(&mut self, event: RecognitionEvent) {
        match event {
            RecognitionEvent::Started => {
                self.emit(SessionEvent::Status("🎙️  Listening...".to_string()));
            }
            RecognitionEvent::Result(results) => {
                self.apply_results(&results, Local::now());
            }
            RecognitionEvent::Error(reason) => {
                // Runtime errors are surfaced, never fatal; the session
                // stays in its current state.
                tracing::warn!("Recognition runtime error: {}", reason);
                self.emit(SessionEvent::Status(format!(
                    "⚠️  Recognition error: {}",
                    reason
                )));
            }
            RecognitionEvent::Ended => self.handle_capability_ended().await,
        }
    }

    /// Apply one `result` event: provisional hypotheses replace the single
    /// interim string, final hypotheses are committed through the
    /// turn-taking heuristic.
    pub fn apply_results(&mut self, results: &[RecognitionResult], at: DateTime<Local>) {
        let mut final_text = String::new();
        let mut interim_text = String::new();

        for result in results {
            if let Some(best) = result.best() {
                if result.is_final {
                    final_text.push_str(&best.transcript);
                } else {
                    interim_text.push_str(&best.transcript);
                }
            }
        }

        if !final_text.trim().is_empty() {
            self.append_final(&final_text, at);
        }

        self.interim = interim_text;
        self.emit(SessionEvent::InterimUpdated(self.interim.clone()));
    }

    /// Append one finalized segment at arrival instant `at`.
    pub fn append_final(&mut self, text: &str, at: DateTime<Local>) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let speaker_id = self.speakers.observe(at);
        let entry = TranscriptEntry {
            timestamp: at,
            speaker_id,
            text: text.to_string(),
        };

        tracing::debug!("Transcript entry appended: {}", entry.render());
        self.transcript.push(entry.clone());
        self.emit(SessionEvent::EntryAppended(entry));
    }

    /// The capability ended on its own (platform silence timeout). While
    /// recording this is the `Recording --(end)--> Recording` transition:
    /// restart immediately without touching buffer or speaker state. In
    /// `Idle` it is the echo of an explicit stop and is ignored.
    async fn handle_capability_ended(&mut self) {
        if self.state != SessionState::Recording {
            tracing::debug!("Capability end event in idle state, ignoring");
            return;
        }

        self.restarts += 1;
        tracing::info!("Capability ended mid-session, restarting (#{})", self.restarts);

        let capability = match self.capability.as_mut() {
            Some(capability) => capability,
            None => return,
        };

        if let Err(e) = capability.start().await {
            // Nothing left to resume; terminate the session honestly
            // instead of pretending to record.
            tracing::error!("Recognizer restart failed: {}", e);
            self.state = SessionState::Idle;
            self.interim.clear();
            self.emit(SessionEvent::InterimUpdated(String::new()));
            self.emit(SessionEvent::StateChanged(self.state));
            self.emit(SessionEvent::Status(format!(
                "⚠️  Recognizer stopped and could not be restarted: {}",
                e
            )));
        }
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }
}

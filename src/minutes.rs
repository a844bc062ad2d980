/*
 * Meeting Minutes CLI - Minutes Compiler
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
use lazy_static::lazy_static;
use regex::Regex;

use crate::transcript::TranscriptBuffer;

/// Attendee labels are fixed; they are never derived from the transcript.
pub const DEFAULT_ATTENDEES: [&str; 2] = ["Speaker 1", "Speaker 2"];

/// At most this many key points appear in the discussion summary.
pub const MAX_KEY_POINTS: usize = 5;

/// A sentence qualifies as a key point when its trimmed length exceeds this
/// many characters.
pub const MIN_KEY_POINT_CHARS: usize = 20;

/// Emitted when no sentence qualifies.
pub const NO_KEY_POINTS_LINE: &str = "No key points identified.";

lazy_static! {
    static ref SENTENCE_SPLIT: Regex = Regex::new(r"[.!?]+").unwrap();
    static ref TIMESTAMP_MARKER: Regex = Regex::new(r"\[\d{2}:\d{2}:\d{2}\]\s*").unwrap();
    static ref SPEAKER_MARKER: Regex = Regex::new(r"Speaker \d+:\s*").unwrap();
}

/// Remove `[HH:MM:SS]` and `Speaker N:` markers from rendered transcript
/// text, leaving only the spoken words.
pub fn strip_transcript_markers(transcript: &str) -> String {
    let without_timestamps = TIMESTAMP_MARKER.replace_all(transcript, "");
    SPEAKER_MARKER.replace_all(&without_timestamps, "").into_owned()
}

/// Heuristic key-point extraction: the first `MAX_KEY_POINTS` sentences
/// (split on `.`, `!`, `?`) longer than `MIN_KEY_POINT_CHARS` once trimmed,
/// in transcript order, markers stripped. This is a sentence filter, not
/// summarization.
pub fn extract_key_points(transcript: &str) -> Vec<String> {
    let stripped = strip_transcript_markers(transcript);

    SENTENCE_SPLIT
        .split(&stripped)
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() > MIN_KEY_POINT_CHARS)
        .take(MAX_KEY_POINTS)
        .map(str::to_string)
        .collect()
}

/// Assemble the minutes document from the rendered transcript text, the
/// agenda and an attendee list. Pure: identical inputs (including `now`)
/// yield byte-identical output.
pub fn compile_from_text(
    transcript: &str,
    agenda: &str,
    attendees: &[&str],
    now: DateTime<Local>,
) -> String {
    let date_str = now.format("%Y-%m-%d");
    let time_str = now.format("%H:%M:%S");

    let mut minutes = format!(
        "MEETING MINUTES\n==================\n\nDate: {}\nTime: {}\n\n",
        date_str, time_str
    );

    // Agenda section only when there is agenda content
    if !agenda.trim().is_empty() {
        minutes.push_str(&format!("AGENDA:\n{}\n\n", agenda));
    }

    if !attendees.is_empty() {
        minutes.push_str(&format!("ATTENDEES:\n{}\n\n", attendees.join(", ")));
    }

    minutes.push_str("DISCUSSION SUMMARY:\n");

    let key_points = extract_key_points(transcript);
    if key_points.is_empty() {
        minutes.push_str(NO_KEY_POINTS_LINE);
        minutes.push('\n');
    } else {
        for (i, point) in key_points.iter().enumerate() {
            minutes.push_str(&format!("{}. {}\n", i + 1, point));
        }
    }

    minutes.push_str(&format!(
        "\n\nFULL TRANSCRIPT:\n================\n{}\n",
        transcript
    ));

    minutes
}

/// Compiler entry point over the session's buffer. Reads the buffer and
/// agenda, never writes them.
pub fn compile(
    buffer: &TranscriptBuffer,
    agenda: &str,
    attendees: &[&str],
    now: DateTime<Local>,
) -> String {
    compile_from_text(&buffer.render_full(), agenda, attendees, now)
}

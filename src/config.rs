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

use anyhow::{Context, Result};
use dirs::home_dir;
use std::env;
use std::path::PathBuf;

/// Silence gap after which the speaker label flips, in milliseconds.
pub const DEFAULT_SPEAKER_GAP_MS: i64 = 5000;

/// Artificial delay before the minutes compiler runs, in milliseconds.
/// Generation itself is synchronous; the delay only exists so the user gets
/// perceptible feedback.
pub const DEFAULT_MINUTES_DELAY_MS: u64 = 1500;

#[derive(Debug, Clone)]
pub struct RecognitionConfig {
    /// External recognizer command. `None` means no capability was
    /// configured; recording stays permanently disabled for the run.
    pub command: Option<String>,
    pub extra_args: Vec<String>,
    pub language: String,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            command: None,
            extra_args: Vec::new(),
            language: "en-US".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MinutesConfig {
    pub speaker_gap_ms: i64,
    pub generation_delay_ms: u64,
}

impl Default for MinutesConfig {
    fn default() -> Self {
        Self {
            speaker_gap_ms: DEFAULT_SPEAKER_GAP_MS,
            generation_delay_ms: DEFAULT_MINUTES_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub recognition: RecognitionConfig,
    pub minutes: MinutesConfig,
    pub export_dir: PathBuf,
}

impl Config {
    pub async fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        // Recognizer configuration
        let recognizer_command = env::var("RECOGNIZER_COMMAND")
            .ok()
            .filter(|cmd| !cmd.trim().is_empty());

        let recognizer_args = env::var("RECOGNIZER_ARGS")
            .map(|args| args.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        let language = env::var("RECOGNITION_LANGUAGE")
            .unwrap_or_else(|_| "en-US".to_string());

        let recognition = RecognitionConfig {
            command: recognizer_command,
            extra_args: recognizer_args,
            language,
        };

        // Heuristic and generation timing
        let speaker_gap_ms = env::var("SPEAKER_GAP_MS")
            .unwrap_or_else(|_| DEFAULT_SPEAKER_GAP_MS.to_string())
            .parse::<i64>()
            .unwrap_or(DEFAULT_SPEAKER_GAP_MS);

        let generation_delay_ms = env::var("MINUTES_DELAY_MS")
            .unwrap_or_else(|_| DEFAULT_MINUTES_DELAY_MS.to_string())
            .parse::<u64>()
            .unwrap_or(DEFAULT_MINUTES_DELAY_MS);

        let minutes = MinutesConfig {
            speaker_gap_ms,
            generation_delay_ms,
        };

        // Export directory
        let export_dir = env::var("EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".meeting-minutes")
                    .join("exports")
            });

        // Ensure export directory exists
        std::fs::create_dir_all(&export_dir)
            .context("Failed to create export directory")?;

        Ok(Config {
            recognition,
            minutes,
            export_dir,
        })
    }

    pub fn log_dir() -> PathBuf {
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".meeting-minutes")
            .join("logs")
    }
}

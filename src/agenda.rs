/*
 * Meeting Minutes CLI - Agenda Loader
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

use std::path::Path;

use crate::types::{AgendaOutcome, MeetingError};

/// Fixed agenda content installed for recognized-but-unsupported binary
/// document formats. No parsing is attempted for these.
pub const AGENDA_PLACEHOLDER: &str = "Unsupported file format";

/// Filename extensions read as plain text.
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md"];

/// Recognized word-processor / page-description formats we deliberately do
/// not parse.
pub const BINARY_DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// Holds the current agenda text. Uploads dispatch on filename extension
/// only; the last upload wins. An empty agenda means "no agenda".
#[derive(Debug, Clone, Default)]
pub struct AgendaLoader {
    agenda: String,
}

impl AgendaLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agenda(&self) -> &str {
        &self.agenda
    }

    pub fn has_agenda(&self) -> bool {
        !self.agenda.trim().is_empty()
    }

    /// Load one agenda file.
    ///
    /// Plain-text extensions are read in full; a read failure leaves the
    /// previous agenda untouched. Recognized binary document extensions
    /// overwrite the agenda with the fixed placeholder. Anything else is a
    /// no-op, reported back so the caller can post a status note.
    pub async fn load(&mut self, path: &Path) -> Result<AgendaOutcome, MeetingError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if TEXT_EXTENSIONS.contains(&extension.as_str()) {
            let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                MeetingError::FileRead(format!("{}: {}", path.display(), e))
            })?;

            tracing::info!(
                "Agenda loaded from {} ({} bytes)",
                path.display(),
                content.len()
            );
            let len = content.len();
            self.agenda = content;
            return Ok(AgendaOutcome::Loaded(len));
        }

        if BINARY_DOCUMENT_EXTENSIONS.contains(&extension.as_str()) {
            tracing::info!(
                "Agenda file {} has unsupported binary format, installing placeholder",
                path.display()
            );
            self.agenda = AGENDA_PLACEHOLDER.to_string();
            return Ok(AgendaOutcome::Placeholder);
        }

        tracing::debug!(
            "Agenda file {} has unrecognized extension '{}', leaving agenda unchanged",
            path.display(),
            extension
        );
        Ok(AgendaOutcome::Ignored(extension))
    }
}

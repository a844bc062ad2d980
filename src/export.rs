/*
 * Meeting Minutes CLI - Export
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
use std::path::{Path, PathBuf};

pub const TRANSCRIPT_FILENAME: &str = "meeting_transcript.txt";
pub const MINUTES_FILENAME: &str = "meeting_minutes.txt";

/// Serializes transcript or minutes text to fixed-name UTF-8 files under
/// the export directory. Content is written exactly as held in memory.
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)
            .context("Failed to create export output directory")?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub async fn export_transcript(&self, content: &str) -> Result<PathBuf> {
        self.write(TRANSCRIPT_FILENAME, content).await
    }

    pub async fn export_minutes(&self, content: &str) -> Result<PathBuf> {
        self.write(MINUTES_FILENAME, content).await
    }

    async fn write(&self, filename: &str, content: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(filename);
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write export file {}", path.display()))?;

        tracing::info!("Exported {} ({} bytes)", path.display(), content.len());
        Ok(path)
    }
}

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

use std::io::{stdout, Write};
use anyhow::Result;
use colored::*;
use crossterm::{
    cursor::MoveToColumn,
    execute,
    terminal::{Clear, ClearType},
};

use crate::types::{CommandInfo, SessionState, TranscriptEntry};

/// Presentation layer. Consumes session events and renders them; the core
/// never writes to the terminal itself.
pub struct TerminalUI;

impl TerminalUI {
    pub fn new() -> Self {
        Self
    }

    pub async fn print_welcome(&self, capability_ready: bool) -> Result<()> {
        println!("{}", "📝 Meeting Minutes CLI - Rust Edition".cyan().bold());
        println!("{}", "🎤 Record, transcribe, and generate meeting minutes".green());
        println!("{}", "=".repeat(50).bright_black());
        println!();

        for command in CommandInfo::get_all_commands() {
            println!("  {}  {}", command.key.bold(), command.description);
        }

        println!();
        if capability_ready {
            println!("{}", "🟢 Speech recognition capability detected".green());
        } else {
            println!(
                "{}",
                "🟡 No speech recognition capability - recording disabled, minutes/export still available"
                    .yellow()
            );
        }
        println!("{}", "=".repeat(50).bright_black());
        println!();

        Ok(())
    }

    /// Single human-readable status sink: every transition, error and
    /// milestone lands here.
    pub async fn print_status(&self, message: &str) -> Result<()> {
        self.clear_interim_line()?;
        println!("{}", message.yellow());
        Ok(())
    }

    pub async fn print_warning(&self, message: &str) -> Result<()> {
        self.clear_interim_line()?;
        println!("{}", message.yellow());
        Ok(())
    }

    pub async fn print_ready(&self) -> Result<()> {
        println!();
        println!(
            "{}",
            format!("🟢 Ready... ({})", CommandInfo::format_commands()).green()
        );
        println!();
        Ok(())
    }

    pub async fn print_shutdown(&self) -> Result<()> {
        self.clear_interim_line()?;
        println!();
        println!("{}", "🛑 Stopping Meeting Minutes CLI...".red());
        println!("{}", "Thank you for using Meeting Minutes CLI! 📝".cyan().bold());
        Ok(())
    }

    pub async fn print_state(&self, state: SessionState) -> Result<()> {
        self.clear_interim_line()?;
        match state {
            SessionState::Recording => {
                println!("{}", "🔴 REC".red().bold());
            }
            SessionState::Idle => {
                println!("{}", "⚪ idle".bright_black());
            }
        }
        Ok(())
    }

    /// A finalized transcript line.
    pub async fn print_entry(&self, entry: &TranscriptEntry) -> Result<()> {
        self.clear_interim_line()?;
        let rendered = entry.render();
        if entry.speaker_id == 1 {
            println!("{}", rendered.cyan());
        } else {
            println!("{}", rendered.magenta());
        }
        Ok(())
    }

    /// The single interim line, overwritten in place on every update. An
    /// empty interim erases the line.
    pub async fn print_interim(&self, interim: &str) -> Result<()> {
        self.clear_interim_line()?;
        if !interim.trim().is_empty() {
            print!("{} {}", "…".bright_black(), interim.trim().bright_black().italic());
            stdout().flush()?;
        }
        Ok(())
    }

    pub async fn print_minutes(&self, minutes: &str) -> Result<()> {
        self.clear_interim_line()?;
        println!();
        println!("{}", "📄 Meeting Minutes:".cyan().bold());
        println!("{}", "-".repeat(50).bright_black());
        println!("{}", minutes);
        println!("{}", "-".repeat(50).bright_black());
        println!();
        Ok(())
    }

    pub async fn print_help(&self) -> Result<()> {
        self.clear_interim_line()?;
        println!();
        for command in CommandInfo::get_all_commands() {
            println!("  {}  {}", command.key.bold(), command.description);
        }
        println!();
        Ok(())
    }

    pub async fn print_agenda_preview(&self, agenda: &str) -> Result<()> {
        self.clear_interim_line()?;
        println!("{}", "📋 Agenda:".blue().bold());
        println!("{}", "-".repeat(50).bright_black());

        let preview = if agenda.chars().count() > 400 {
            format!("{}...", agenda.chars().take(400).collect::<String>())
        } else {
            agenda.to_string()
        };
        println!("{}", preview.white());

        if agenda.chars().count() > 400 {
            println!("{}", "... (truncated for display)".bright_black());
        }

        println!("{}", "-".repeat(50).bright_black());
        println!();
        Ok(())
    }

    fn clear_interim_line(&self) -> Result<()> {
        execute!(stdout(), MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        Ok(())
    }
}

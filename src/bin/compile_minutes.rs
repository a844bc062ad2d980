/*
 * Meeting Minutes CLI - Offline Minutes Compiler
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
use chrono::Local;
use std::path::PathBuf;

use meeting_minutes_rs::agenda::AgendaLoader;
use meeting_minutes_rs::export::MINUTES_FILENAME;
use meeting_minutes_rs::minutes::{compile_from_text, extract_key_points, DEFAULT_ATTENDEES};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Get the transcript file path from the command line
    let transcript_file = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("❌ No transcript file specified");
            eprintln!("Usage: cargo run --bin compile_minutes <transcript_file> [agenda_file]");
            eprintln!();
            eprintln!("Examples:");
            eprintln!("  cargo run --bin compile_minutes ./meeting_transcript.txt");
            eprintln!("  cargo run --bin compile_minutes ./meeting_transcript.txt ./agenda.txt");
            std::process::exit(1);
        }
    };

    if !transcript_file.exists() {
        eprintln!("❌ Transcript file not found: {:?}", transcript_file);
        eprintln!("Please check the file path and try again.");
        std::process::exit(1);
    }

    let agenda_file = std::env::args().nth(2).map(PathBuf::from);

    println!("📝 Compiling meeting minutes...");
    println!("📁 Transcript: {:?}", transcript_file);

    let transcript = tokio::fs::read_to_string(&transcript_file)
        .await
        .with_context(|| format!("Failed to read transcript file {:?}", transcript_file))?;

    let mut agenda_loader = AgendaLoader::new();
    if let Some(ref agenda_path) = agenda_file {
        println!("📋 Agenda: {:?}", agenda_path);
        match agenda_loader.load(agenda_path).await {
            Ok(outcome) => {
                tracing::debug!("Agenda load outcome: {:?}", outcome);
            }
            Err(e) => {
                eprintln!("⚠️  {}", e);
                eprintln!("Continuing without an agenda.");
            }
        }
    }

    let minutes = compile_from_text(
        &transcript,
        agenda_loader.agenda(),
        &DEFAULT_ATTENDEES,
        Local::now(),
    );

    let key_point_count = extract_key_points(&transcript).len();

    println!("✅ Minutes compiled successfully!");
    println!();
    println!("📊 Summary:");
    println!("  📝 Transcript lines: {}", transcript.lines().count());
    println!("  🎯 Key points extracted: {}", key_point_count);
    println!("  📋 Agenda included: {}", agenda_loader.has_agenda());
    println!();

    let output_file = transcript_file
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."))
        .join(MINUTES_FILENAME);
    tokio::fs::write(&output_file, &minutes)
        .await
        .with_context(|| format!("Failed to write minutes file {:?}", output_file))?;

    println!("💾 Minutes saved to: {:?}", output_file);

    Ok(())
}

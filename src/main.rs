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
use chrono::Local;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use meeting_minutes_rs::agenda::AgendaLoader;
use meeting_minutes_rs::config::Config;
use meeting_minutes_rs::export::Exporter;
use meeting_minutes_rs::input::spawn_command_listener;
use meeting_minutes_rs::minutes::{self, DEFAULT_ATTENDEES};
use meeting_minutes_rs::recognition::{check_command, detect_capability};
use meeting_minutes_rs::session::RecognitionSession;
use meeting_minutes_rs::types::{
    AgendaOutcome, AppEvent, RecognitionEventReceiver, SessionEvent, SessionEventReceiver,
    SessionState,
};
use meeting_minutes_rs::ui::TerminalUI;

/// Meeting Minutes CLI - live transcript capture and minutes generation
#[derive(Parser)]
#[command(name = "meeting-minutes")]
#[command(version = "0.1.0")]
#[command(about = "Record meetings, transcribe them live, and generate meeting minutes")]
#[command(long_about = "
Meeting Minutes CLI - Rust Edition

Drives an external continuous speech-recognition capability and assembles
static meeting minutes from the live transcript plus an optional agenda:
• Live transcript with interim results and heuristic speaker labels
• Agenda file loading (plain text; PDF/DOCX get a placeholder)
• Minutes compilation with key-point extraction
• Transcript and minutes export as plain-text files

Commands while running (type the letter, then enter):
• r - Start recording    • s - Stop recording
• a - Reload agenda      • g - Generate minutes
• t - Export transcript  • m - Export minutes
• c - Clear transcript   • q - Quit
")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive meeting assistant (default)
    Run {
        /// Agenda file to load at startup (reloadable with 'a')
        #[arg(long)]
        agenda: Option<PathBuf>,

        /// Recognition language tag override (e.g. en-US)
        #[arg(long)]
        language: Option<String>,
    },

    /// Show system status and configuration
    Status,
}

struct MeetingMinutesApp {
    config: Config,
    session: RecognitionSession,
    agenda_loader: AgendaLoader,
    agenda_path: Option<PathBuf>,
    exporter: Exporter,
    terminal_ui: TerminalUI,

    /// Last compiled minutes document, replaced wholesale on every
    /// generation.
    minutes: Option<String>,

    /// Sequence number of the newest generation request; completed
    /// generations with an older number are dropped as stale.
    generation_seq: u64,

    event_tx: mpsc::UnboundedSender<AppEvent>,
    cancellation_token: CancellationToken,
}

impl MeetingMinutesApp {
    async fn new(
        config: Config,
        agenda_path: Option<PathBuf>,
    ) -> Result<(
        Self,
        mpsc::UnboundedReceiver<AppEvent>,
        RecognitionEventReceiver,
        SessionEventReceiver,
    )> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (recognition_tx, recognition_rx) = mpsc::unbounded_channel();
        let (session_tx, session_rx) = mpsc::unbounded_channel();

        let capability = detect_capability(&config.recognition, recognition_tx).await;
        let session =
            RecognitionSession::new(capability, config.minutes.speaker_gap_ms, session_tx);

        let exporter = Exporter::new(&config.export_dir)?;

        let app = Self {
            config,
            session,
            agenda_loader: AgendaLoader::new(),
            agenda_path,
            exporter,
            terminal_ui: TerminalUI::new(),
            minutes: None,
            generation_seq: 0,
            event_tx,
            cancellation_token: CancellationToken::new(),
        };

        Ok((app, event_rx, recognition_rx, session_rx))
    }

    async fn run(
        &mut self,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        recognition_rx: RecognitionEventReceiver,
        session_rx: SessionEventReceiver,
    ) -> Result<()> {
        self.terminal_ui
            .print_welcome(self.session.has_capability())
            .await?;

        if self.agenda_path.is_some() {
            self.handle_reload_agenda().await?;
        }

        // Ctrl+C funnels through the normal shutdown path
        let event_tx = self.event_tx.clone();
        ctrlc::set_handler(move || {
            let _ = event_tx.send(AppEvent::Shutdown);

            // Force exit if graceful shutdown stalls
            std::thread::spawn(|| {
                std::thread::sleep(std::time::Duration::from_secs(2));
                std::process::exit(0);
            });
        })?;

        spawn_command_listener(self.event_tx.clone(), self.cancellation_token.clone());

        self.terminal_ui.print_ready().await?;
        self.event_loop(event_rx, recognition_rx, session_rx).await
    }

    async fn event_loop(
        &mut self,
        mut event_rx: mpsc::UnboundedReceiver<AppEvent>,
        mut recognition_rx: RecognitionEventReceiver,
        mut session_rx: SessionEventReceiver,
    ) -> Result<()> {
        tracing::info!("Starting event loop");

        loop {
            tokio::select! {
                Some(event) = event_rx.recv() => {
                    tracing::debug!("App event: {:?}", event);
                    if !self.handle_app_event(event).await? {
                        break;
                    }
                }
                Some(event) = recognition_rx.recv() => {
                    self.session.handle_recognition_event(event).await;
                }
                Some(event) = session_rx.recv() => {
                    self.render_session_event(event).await?;
                }
                else => break,
            }
        }

        tracing::info!("Event loop finished");
        Ok(())
    }

    /// Returns false when the loop should exit.
    async fn handle_app_event(&mut self, event: AppEvent) -> Result<bool> {
        match event {
            AppEvent::StartRecording => {
                if let Err(e) = self.session.start().await {
                    self.terminal_ui
                        .print_warning(&format!("⚠️  {}", e))
                        .await?;
                }
            }

            AppEvent::StopRecording => {
                if let Err(e) = self.session.stop().await {
                    self.terminal_ui
                        .print_warning(&format!("⚠️  {}", e))
                        .await?;
                }
            }

            AppEvent::ReloadAgenda => {
                self.handle_reload_agenda().await?;
            }

            AppEvent::GenerateMinutes => {
                self.handle_generate_minutes().await?;
            }

            AppEvent::MinutesReady { seq, text } => {
                if seq != self.generation_seq {
                    // A newer request superseded this one while it was
                    // deferred; drop the stale result.
                    tracing::debug!("Dropping stale minutes generation #{}", seq);
                } else {
                    self.minutes = Some(text.clone());
                    self.terminal_ui.print_minutes(&text).await?;
                    self.terminal_ui
                        .print_status("✅ Meeting minutes generated")
                        .await?;
                }
            }

            AppEvent::ExportTranscript => {
                if self.session.transcript().is_empty() {
                    self.terminal_ui
                        .print_warning("⚠️  No transcript to export yet")
                        .await?;
                } else {
                    let content = self.session.transcript().render_full();
                    match self.exporter.export_transcript(&content).await {
                        Ok(path) => {
                            self.terminal_ui
                                .print_status(&format!("💾 Transcript exported to {}", path.display()))
                                .await?;
                        }
                        Err(e) => {
                            self.terminal_ui
                                .print_warning(&format!("⚠️  Transcript export failed: {}", e))
                                .await?;
                        }
                    }
                }
            }

            AppEvent::ExportMinutes => match &self.minutes {
                None => {
                    self.terminal_ui
                        .print_warning("⚠️  No minutes yet - generate them first with 'g'")
                        .await?;
                }
                Some(minutes) => match self.exporter.export_minutes(minutes).await {
                    Ok(path) => {
                        self.terminal_ui
                            .print_status(&format!("💾 Minutes exported to {}", path.display()))
                            .await?;
                    }
                    Err(e) => {
                        self.terminal_ui
                            .print_warning(&format!("⚠️  Minutes export failed: {}", e))
                            .await?;
                    }
                },
            },

            AppEvent::ClearTranscript => {
                self.session.clear();
                self.minutes = None;
            }

            AppEvent::ShowHelp => {
                self.terminal_ui.print_help().await?;
            }

            AppEvent::Shutdown => {
                if self.session.state() == SessionState::Recording {
                    let _ = self.session.stop().await;
                }
                self.cancellation_token.cancel();
                self.terminal_ui.print_shutdown().await?;
                return Ok(false);
            }
        }

        Ok(true)
    }

    async fn handle_reload_agenda(&mut self) -> Result<()> {
        let path = match &self.agenda_path {
            Some(path) => path.clone(),
            None => {
                self.terminal_ui
                    .print_warning("⚠️  No agenda file configured - start with --agenda <path>")
                    .await?;
                return Ok(());
            }
        };

        match self.agenda_loader.load(&path).await {
            Ok(AgendaOutcome::Loaded(bytes)) => {
                self.terminal_ui
                    .print_status(&format!(
                        "📋 Agenda loaded from {} ({} bytes)",
                        path.display(),
                        bytes
                    ))
                    .await?;
                self.terminal_ui
                    .print_agenda_preview(self.agenda_loader.agenda())
                    .await?;
            }
            Ok(AgendaOutcome::Placeholder) => {
                self.terminal_ui
                    .print_status(&format!(
                        "📋 {} is a binary document format - placeholder installed instead of parsed content",
                        path.display()
                    ))
                    .await?;
            }
            Ok(AgendaOutcome::Ignored(extension)) => {
                self.terminal_ui
                    .print_status(&format!(
                        "📋 Unrecognized agenda extension '{}' - agenda unchanged",
                        extension
                    ))
                    .await?;
            }
            Err(e) => {
                // Agenda stays whatever it was before the failed read
                self.terminal_ui
                    .print_warning(&format!("⚠️  {}", e))
                    .await?;
            }
        }

        Ok(())
    }

    /// Kick off a deferred minutes generation. The compile itself is
    /// synchronous; the fixed delay only exists for perceptible feedback.
    async fn handle_generate_minutes(&mut self) -> Result<()> {
        if self.session.transcript().is_empty() {
            self.terminal_ui
                .print_warning("⚠️  No transcript yet - record something first")
                .await?;
            return Ok(());
        }

        self.generation_seq += 1;
        let seq = self.generation_seq;

        // Snapshot the inputs at request time; the compiler only ever
        // reads them.
        let transcript = self.session.transcript().render_full();
        let agenda = self.agenda_loader.agenda().to_string();
        let delay_ms = self.config.minutes.generation_delay_ms;
        let event_tx = self.event_tx.clone();

        tokio::spawn(async move {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message("Generating meeting minutes...");
            spinner.enable_steady_tick(Duration::from_millis(100));

            tokio::time::sleep(Duration::from_millis(delay_ms)).await;

            let text =
                minutes::compile_from_text(&transcript, &agenda, &DEFAULT_ATTENDEES, Local::now());

            spinner.finish_and_clear();
            let _ = event_tx.send(AppEvent::MinutesReady { seq, text });
        });

        Ok(())
    }

    async fn render_session_event(&self, event: SessionEvent) -> Result<()> {
        match event {
            SessionEvent::StateChanged(state) => self.terminal_ui.print_state(state).await,
            SessionEvent::InterimUpdated(interim) => {
                self.terminal_ui.print_interim(&interim).await
            }
            SessionEvent::EntryAppended(entry) => self.terminal_ui.print_entry(&entry).await,
            SessionEvent::Status(message) => self.terminal_ui.print_status(&message).await,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Status) => {
            show_system_status().await?;
        }

        Some(Commands::Run { agenda, language }) => {
            run_main_application(agenda, language).await?;
        }

        None => {
            run_main_application(None, None).await?;
        }
    }

    Ok(())
}

async fn run_main_application(
    agenda: Option<PathBuf>,
    language: Option<String>,
) -> Result<()> {
    setup_logging().await?;

    let mut config = Config::load().await?;
    if let Some(language) = language {
        config.recognition.language = language;
    }

    let (mut app, event_rx, recognition_rx, session_rx) =
        MeetingMinutesApp::new(config, agenda).await?;
    let result = app.run(event_rx, recognition_rx, session_rx).await;

    app.cancellation_token.cancel();
    result
}

async fn show_system_status() -> Result<()> {
    println!("🔍 Meeting Minutes System Status");
    println!("================================");
    println!();

    let config_exists = std::path::Path::new(".env").exists();
    let config_status = if config_exists { "✅" } else { "❌" };
    println!("Configuration (.env): {}", config_status);

    let config = Config::load().await?;

    match &config.recognition.command {
        Some(command) => {
            let found = check_command(command).await;
            let status = if found { "✅" } else { "❌ not on PATH" };
            println!("Recognizer ({}): {}", command, status);
        }
        None => {
            println!("Recognizer: ❌ RECOGNIZER_COMMAND not set - recording disabled");
        }
    }

    println!("Recognition language: {}", config.recognition.language);
    println!("Speaker gap threshold: {}ms", config.minutes.speaker_gap_ms);
    println!("Export directory: {}", config.export_dir.display());
    println!("Log directory: {}", Config::log_dir().display());
    println!();

    if config.recognition.command.is_none() {
        println!("🚀 Set RECOGNIZER_COMMAND in .env to enable recording");
    } else {
        println!("🎯 Ready to use: meeting-minutes run");
    }

    Ok(())
}

async fn setup_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = Config::log_dir();
    std::fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Daily-rotated file gets everything; stderr only surfaces errors
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "meeting-minutes.log");

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_filter(
                    EnvFilter::from_default_env()
                        .add_directive("meeting_minutes_rs=debug".parse()?)
                        .add_directive("debug".parse()?),
                ),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_target(false)
                .compact()
                .with_filter(
                    EnvFilter::from_default_env()
                        .add_directive("meeting_minutes_rs=error".parse()?)
                        .add_directive("error".parse()?),
                ),
        );

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    tracing::info!("Logging system initialized");
    Ok(())
}

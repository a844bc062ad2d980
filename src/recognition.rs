/*
 * Meeting Minutes CLI - Recognition Capability
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
use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::config::RecognitionConfig;
use crate::types::{RecognitionEvent, RecognitionEventSender, RecognitionResult};

/// Seam to the external speech-recognition collaborator. The capability is
/// not reimplemented here: implementations only start and halt streaming,
/// and deliver `start`/`result`/`error`/`end` events on the channel they
/// were constructed with.
#[async_trait]
pub trait RecognitionCapability: Send {
    /// Begin (or resume) continuous recognition with interim results.
    async fn start(&mut self) -> Result<()>;

    /// Request the capability halt. Safe to call when not streaming.
    async fn stop(&mut self) -> Result<()>;
}

/// One line of the recognizer's stdout: a single `result` event carrying
/// zero or more hypotheses.
#[derive(Debug, Deserialize)]
struct WireEvent {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

/// Adapter around an external recognizer process.
///
/// The process is spawned with `--language <tag> --continuous --interim`
/// appended to any configured extra arguments. It must emit one JSON event
/// per stdout line (`{"results":[{"is_final":…,"alternatives":[…]}]}`);
/// stderr lines are forwarded as recognition runtime errors. Process exit
/// is reported as the `end` event, which the session treats as a restart
/// request while recording.
pub struct ProcessCapability {
    command: String,
    extra_args: Vec<String>,
    language: String,
    events: RecognitionEventSender,
    child: Option<tokio::process::Child>,
    reader_task: Option<JoinHandle<()>>,
    stderr_task: Option<JoinHandle<()>>,
}

impl ProcessCapability {
    pub fn new(config: &RecognitionConfig, command: String, events: RecognitionEventSender) -> Self {
        Self {
            command,
            extra_args: config.extra_args.clone(),
            language: config.language.clone(),
            events,
            child: None,
            reader_task: None,
            stderr_task: None,
        }
    }

    async fn reap(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill().await;
            let _ = child.wait().await;
        }
        if let Some(task) = self.reader_task.take() {
            let _ = task.await;
        }
        if let Some(task) = self.stderr_task.take() {
            let _ = task.await;
        }
    }
}

#[async_trait]
impl RecognitionCapability for ProcessCapability {
    async fn start(&mut self) -> Result<()> {
        // A restart while a previous process lingers must not leak it
        self.reap().await;

        let mut cmd = Command::new(&self.command);
        cmd.args(&self.extra_args)
            .arg("--language")
            .arg(&self.language)
            .arg("--continuous")
            .arg("--interim")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn recognizer process '{}'", self.command))?;

        let stdout = child
            .stdout
            .take()
            .context("Recognizer process has no stdout handle")?;
        let stderr = child
            .stderr
            .take()
            .context("Recognizer process has no stderr handle")?;

        let events = self.events.clone();
        let reader = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<WireEvent>(&line) {
                            Ok(event) => {
                                let _ = events.send(RecognitionEvent::Result(event.results));
                            }
                            Err(e) => {
                                tracing::warn!("Unparseable recognizer event: {} ({})", line, e);
                                let _ = events.send(RecognitionEvent::Error(format!(
                                    "unparseable recognizer event: {}",
                                    e
                                )));
                            }
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        let _ = events.send(RecognitionEvent::Error(format!(
                            "recognizer stream read failed: {}",
                            e
                        )));
                        break;
                    }
                }
            }

            // The platform ends streams on its own (silence timeouts); the
            // session decides whether that means restart or shutdown.
            let _ = events.send(RecognitionEvent::Ended);
        });

        let error_events = self.events.clone();
        let stderr_reader = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if !line.trim().is_empty() {
                    let _ = error_events.send(RecognitionEvent::Error(line));
                }
            }
        });

        self.child = Some(child);
        self.reader_task = Some(reader);
        self.stderr_task = Some(stderr_reader);

        let _ = self.events.send(RecognitionEvent::Started);
        tracing::info!("Recognizer process started: {}", self.command);
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        tracing::info!("Stopping recognizer process");
        self.reap().await;
        Ok(())
    }
}

/// Probe for the configured recognizer command. `None` permanently disables
/// recording for this run; everything else keeps working.
pub async fn detect_capability(
    config: &RecognitionConfig,
    events: RecognitionEventSender,
) -> Option<Box<dyn RecognitionCapability>> {
    let command = config.command.as_ref()?;

    if !check_command(command).await {
        tracing::warn!("Configured recognizer '{}' not found on PATH", command);
        return None;
    }

    Some(Box::new(ProcessCapability::new(
        config,
        command.clone(),
        events,
    )))
}

pub async fn check_command(command: &str) -> bool {
    std::process::Command::new("which")
        .arg(command)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone};
use tokio::sync::mpsc;

use meeting_minutes_rs::minutes::{compile, DEFAULT_ATTENDEES};
use meeting_minutes_rs::recognition::RecognitionCapability;
use meeting_minutes_rs::session::RecognitionSession;
use meeting_minutes_rs::types::{
    Hypothesis, MeetingError, RecognitionEvent, RecognitionResult, SessionEvent,
    SessionEventReceiver, SessionState,
};

/// Capability stand-in that only counts start/stop requests; events are
/// injected into the session directly by each test.
struct CountingCapability {
    starts: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
}

#[async_trait]
impl RecognitionCapability for CountingCapability {
    async fn start(&mut self) -> Result<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct Harness {
    session: RecognitionSession,
    events: SessionEventReceiver,
    starts: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
}

fn harness() -> Harness {
    let starts = Arc::new(AtomicUsize::new(0));
    let stops = Arc::new(AtomicUsize::new(0));
    let capability = CountingCapability {
        starts: starts.clone(),
        stops: stops.clone(),
    };
    let (tx, rx) = mpsc::unbounded_channel();
    let session = RecognitionSession::new(Some(Box::new(capability)), 5000, tx);

    Harness {
        session,
        events: rx,
        starts,
        stops,
    }
}

fn at(offset_ms: i64) -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 5, 20, 10, 0, 0).unwrap() + Duration::milliseconds(offset_ms)
}

fn final_result(text: &str) -> RecognitionResult {
    RecognitionResult {
        is_final: true,
        alternatives: vec![Hypothesis {
            transcript: text.to_string(),
            confidence: 0.9,
        }],
    }
}

fn interim_result(text: &str) -> RecognitionResult {
    RecognitionResult {
        is_final: false,
        alternatives: vec![Hypothesis {
            transcript: text.to_string(),
            confidence: 0.4,
        }],
    }
}

fn drain(events: &mut SessionEventReceiver) -> Vec<SessionEvent> {
    let mut collected = Vec::new();
    while let Ok(event) = events.try_recv() {
        collected.push(event);
    }
    collected
}

#[tokio::test]
async fn start_without_capability_fails_and_stays_idle() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut session = RecognitionSession::new(None, 5000, tx);

    let err = session.start().await.unwrap_err();
    assert!(matches!(err, MeetingError::CapabilityUnavailable(_)));
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn start_and_stop_walk_the_state_machine() {
    let mut h = harness();
    assert_eq!(h.session.state(), SessionState::Idle);

    h.session.start().await.unwrap();
    assert_eq!(h.session.state(), SessionState::Recording);
    assert_eq!(h.starts.load(Ordering::SeqCst), 1);

    // start is only valid from Idle
    let err = h.session.start().await.unwrap_err();
    assert!(matches!(err, MeetingError::InvalidTransition(_)));

    h.session.stop().await.unwrap();
    assert_eq!(h.session.state(), SessionState::Idle);
    assert_eq!(h.stops.load(Ordering::SeqCst), 1);

    // stop is only valid from Recording
    let err = h.session.stop().await.unwrap_err();
    assert!(matches!(err, MeetingError::InvalidTransition(_)));

    let events = drain(&mut h.events);
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::StateChanged(SessionState::Recording))));
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::StateChanged(SessionState::Idle))));
}

#[tokio::test]
async fn capability_end_restarts_without_resetting_the_buffer() {
    let mut h = harness();
    h.session.start().await.unwrap();

    h.session.apply_results(&[final_result("Hello everyone")], at(0));
    h.session.apply_results(&[final_result("Let's begin")], at(2000));
    assert_eq!(h.session.transcript().len(), 2);

    // Platform-initiated end while recording: restart, keep everything
    h.session
        .handle_recognition_event(RecognitionEvent::Ended)
        .await;
    assert_eq!(h.session.state(), SessionState::Recording);
    assert_eq!(h.starts.load(Ordering::SeqCst), 2);
    assert_eq!(h.session.restart_count(), 1);
    assert_eq!(h.session.transcript().len(), 2);

    // An end event after an explicit stop is ignored
    h.session.stop().await.unwrap();
    h.session
        .handle_recognition_event(RecognitionEvent::Ended)
        .await;
    assert_eq!(h.session.state(), SessionState::Idle);
    assert_eq!(h.starts.load(Ordering::SeqCst), 2);

    // The transcript survives stop for compilation and export
    assert_eq!(h.session.transcript().len(), 2);

    // A fresh start is the only thing that resets the buffer
    h.session.start().await.unwrap();
    assert_eq!(h.session.transcript().len(), 0);
}

#[tokio::test]
async fn buffer_growth_is_monotonic_within_a_session() {
    let mut h = harness();
    h.session.start().await.unwrap();

    let mut previous = 0;
    for (i, offset) in [0i64, 1000, 2500, 9000, 9500].iter().enumerate() {
        h.session
            .apply_results(&[final_result(&format!("segment number {}", i))], at(*offset));
        let len = h.session.transcript().len();
        assert!(len > previous);
        previous = len;
    }
}

#[tokio::test]
async fn interim_string_is_replaced_per_event() {
    let mut h = harness();
    h.session.start().await.unwrap();

    h.session.apply_results(
        &[interim_result("hel"), interim_result("lo eve")],
        at(0),
    );
    assert_eq!(h.session.interim(), "hello eve");

    h.session
        .apply_results(&[interim_result("hello every")], at(500));
    assert_eq!(h.session.interim(), "hello every");

    // A final-only event clears the interim display
    h.session
        .apply_results(&[final_result("hello everyone")], at(1000));
    assert_eq!(h.session.interim(), "");
    assert_eq!(h.session.transcript().len(), 1);
}

#[tokio::test]
async fn recognition_errors_are_surfaced_but_not_fatal() {
    let mut h = harness();
    h.session.start().await.unwrap();

    h.session
        .handle_recognition_event(RecognitionEvent::Error("no-speech".to_string()))
        .await;

    assert_eq!(h.session.state(), SessionState::Recording);
    let events = drain(&mut h.events);
    assert!(events.iter().any(|e| matches!(
        e,
        SessionEvent::Status(message) if message.contains("no-speech")
    )));
}

#[tokio::test]
async fn full_scenario_attributes_both_segments_to_speaker_one() {
    let mut h = harness();
    h.session.start().await.unwrap();

    h.session.apply_results(&[final_result("Hello everyone")], at(0));
    h.session.apply_results(&[final_result("Let's begin")], at(2000));
    h.session.stop().await.unwrap();

    let entries = h.session.transcript().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].speaker_id, 1);
    assert_eq!(entries[1].speaker_id, 1);

    let minutes = compile(
        h.session.transcript(),
        "",
        &DEFAULT_ATTENDEES,
        at(60_000),
    );

    assert!(minutes.contains("ATTENDEES:\nSpeaker 1, Speaker 2\n"));
    let hello = minutes.find("Speaker 1: Hello everyone").unwrap();
    let begin = minutes.find("Speaker 1: Let's begin").unwrap();
    assert!(hello < begin);
}

#[tokio::test]
async fn clear_wipes_transcript_and_interim() {
    let mut h = harness();
    h.session.start().await.unwrap();
    h.session.apply_results(
        &[final_result("something said"), interim_result("more com")],
        at(0),
    );
    h.session.stop().await.unwrap();
    assert_eq!(h.session.transcript().len(), 1);

    h.session.clear();
    assert!(h.session.transcript().is_empty());
    assert_eq!(h.session.interim(), "");
}

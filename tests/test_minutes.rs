use chrono::{DateTime, Duration, Local, TimeZone};

use meeting_minutes_rs::minutes::{
    compile, compile_from_text, extract_key_points, strip_transcript_markers, DEFAULT_ATTENDEES,
    NO_KEY_POINTS_LINE,
};
use meeting_minutes_rs::transcript::TranscriptBuffer;
use meeting_minutes_rs::types::TranscriptEntry;

fn now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 5, 20, 14, 30, 0).unwrap()
}

fn sentence(c: char, len: usize) -> String {
    std::iter::repeat(c).take(len).collect()
}

#[test]
fn compiler_is_idempotent_for_identical_inputs() {
    let transcript = "[10:00:00] Speaker 1: We agreed to ship the release on Friday.";
    let agenda = "1. Release planning";

    let first = compile_from_text(transcript, agenda, &DEFAULT_ATTENDEES, now());
    let second = compile_from_text(transcript, agenda, &DEFAULT_ATTENDEES, now());

    assert_eq!(first, second);
}

#[test]
fn header_carries_date_and_time() {
    let minutes = compile_from_text("", "", &DEFAULT_ATTENDEES, now());

    assert!(minutes.starts_with("MEETING MINUTES\n==================\n\n"));
    assert!(minutes.contains("Date: 2024-05-20\n"));
    assert!(minutes.contains("Time: 14:30:00\n"));
}

#[test]
fn agenda_section_is_omitted_when_empty_or_whitespace() {
    let without = compile_from_text("some transcript", "", &DEFAULT_ATTENDEES, now());
    assert!(!without.contains("AGENDA:"));

    let whitespace = compile_from_text("some transcript", "   \n\t ", &DEFAULT_ATTENDEES, now());
    assert!(!whitespace.contains("AGENDA:"));

    let with = compile_from_text(
        "some transcript",
        "1. Welcome\n2. Status",
        &DEFAULT_ATTENDEES,
        now(),
    );
    assert!(with.contains("AGENDA:\n1. Welcome\n2. Status\n\n"));
}

#[test]
fn attendees_are_the_fixed_speaker_pair() {
    let minutes = compile_from_text("irrelevant", "", &DEFAULT_ATTENDEES, now());
    assert!(minutes.contains("ATTENDEES:\nSpeaker 1, Speaker 2\n\n"));
}

#[test]
fn key_points_are_first_five_qualifying_sentences_in_order() {
    let s25 = sentence('a', 25);
    let s10 = sentence('b', 10);
    let s30 = sentence('c', 30);
    let s5 = sentence('d', 5);
    let s40 = sentence('e', 40);
    let s22 = sentence('f', 22);
    let s50 = sentence('g', 50);

    let transcript = format!(
        "[10:00:00] Speaker 1: {}. {}.\n[10:00:05] Speaker 2: {}. {}.\n[10:00:10] Speaker 1: {}! {}? {}.",
        s25, s10, s30, s5, s40, s22, s50
    );

    let key_points = extract_key_points(&transcript);
    assert_eq!(key_points, vec![s25.clone(), s30.clone(), s40.clone(), s22.clone(), s50.clone()]);

    let minutes = compile_from_text(&transcript, "", &DEFAULT_ATTENDEES, now());
    assert!(minutes.contains(&format!("1. {}\n", s25)));
    assert!(minutes.contains(&format!("2. {}\n", s30)));
    assert!(minutes.contains(&format!("3. {}\n", s40)));
    assert!(minutes.contains(&format!("4. {}\n", s22)));
    assert!(minutes.contains(&format!("5. {}\n", s50)));
    assert!(!minutes.contains(&format!(". {}\n", s10)));
    assert!(!minutes.contains(NO_KEY_POINTS_LINE));
}

#[test]
fn all_short_transcript_yields_fixed_no_key_points_line() {
    let transcript = "[10:00:00] Speaker 1: Yes. Okay. Sure thing. Right.";

    assert!(extract_key_points(transcript).is_empty());

    let minutes = compile_from_text(transcript, "", &DEFAULT_ATTENDEES, now());
    assert!(minutes.contains(&format!("DISCUSSION SUMMARY:\n{}\n", NO_KEY_POINTS_LINE)));
}

#[test]
fn timestamp_and_speaker_markers_are_stripped_from_key_points() {
    assert_eq!(
        strip_transcript_markers("[10:00:00] Speaker 1: hello there"),
        "hello there"
    );

    // The extracted point carries no markers even though the transcript does
    let transcript = "[10:00:00] Speaker 2: the quarterly numbers look solid.";
    let key_points = extract_key_points(transcript);
    assert_eq!(key_points, vec!["the quarterly numbers look solid".to_string()]);
}

#[test]
fn full_transcript_section_is_verbatim() {
    let transcript = "[10:00:00] Speaker 1: Hello everyone\n[10:00:02] Speaker 1: Let's begin";
    let minutes = compile_from_text(transcript, "", &DEFAULT_ATTENDEES, now());

    assert!(minutes.contains(&format!(
        "FULL TRANSCRIPT:\n================\n{}\n",
        transcript
    )));
}

#[test]
fn buffer_entry_point_matches_text_entry_point() {
    let base = Local.with_ymd_and_hms(2024, 5, 20, 10, 0, 0).unwrap();
    let mut buffer = TranscriptBuffer::new();
    buffer.push(TranscriptEntry {
        timestamp: base,
        speaker_id: 1,
        text: "We agreed to ship the release on Friday".to_string(),
    });
    buffer.push(TranscriptEntry {
        timestamp: base + Duration::milliseconds(7000),
        speaker_id: 2,
        text: "The documentation still needs a review pass".to_string(),
    });

    let via_buffer = compile(&buffer, "agenda text", &DEFAULT_ATTENDEES, now());
    let via_text = compile_from_text(
        &buffer.render_full(),
        "agenda text",
        &DEFAULT_ATTENDEES,
        now(),
    );

    assert_eq!(via_buffer, via_text);
    assert!(via_buffer.contains("Speaker 2: The documentation still needs a review pass"));
}

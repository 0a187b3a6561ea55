//! JSONL script replay against a dispatcher with a file telemetry sink.

use std::fs;
use std::io::Write;
use std::time::Instant;

use proptest::prelude::*;
use tenfoot_core::logging::init_test_logging;
use tenfoot_core::{NavigationContext, NavigationSection, RemoteButton};
use tenfoot_harness::{GridFixture, InputScript, RecordingPlayback};
use tenfoot_runtime::{
    CommandOutcome, CommandRecord, PlaybackCommand, RemoteInputDispatcher, TelemetrySink,
};

const SESSION: &str = r#"
# browse the library, open the player, seek, go back once playback ends
{"at_ms":0,"event":{"type":"key","button":"right"}}
{"at_ms":0,"event":{"type":"key","button":"right","kind":"release"}}
{"at_ms":40,"event":{"type":"key","button":"down"}}
{"at_ms":80,"event":{"type":"key","button":"down"}}
{"at_ms":300,"event":{"type":"tick"}}
{"at_ms":1000,"event":{"type":"pointer","phase":"down","x":0.0,"y":0.0}}
{"at_ms":1100,"event":{"type":"pointer","phase":"up","x":-90.0,"y":4.0}}
{"at_ms":2000,"event":{"type":"gesture","kind":"pinch","duration_ms":200}}
{"at_ms":3000,"event":{"type":"key","button":"fast_forward"}}
{"at_ms":3500,"event":{"type":"playback","notification":"finished"}}
{"at_ms":4000,"event":{"type":"key","button":"back"}}
{"at_ms":4100,"event":{"type":"key","button":"up"}}
"#;

fn library(epoch: Instant) -> RemoteInputDispatcher {
    let mut d = RemoteInputDispatcher::default().with_epoch(epoch);
    GridFixture::new(2, 3).register(d.engine_mut());
    d.navigation_mut().push_at(NavigationSection::Library, epoch);
    d
}

#[test]
fn replay_writes_trace_to_sink() {
    init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let script_path = dir.path().join("session.jsonl");
    let trace_path = dir.path().join("trace.jsonl");
    fs::File::create(&script_path)
        .unwrap()
        .write_all(SESSION.as_bytes())
        .unwrap();

    let script = InputScript::from_path(&script_path).unwrap();
    assert_eq!(script.steps().len(), 12);

    let epoch = Instant::now();
    let sink = TelemetrySink::append_to(&trace_path).unwrap();
    let player = RecordingPlayback::new();
    let mut d = library(epoch)
        .with_playback(player.clone())
        .with_telemetry_sink(sink.clone());

    // Enter playback between the swipe and the pinch.
    let (browse, rest): (Vec<_>, Vec<_>) =
        script.steps().iter().cloned().partition(|s| s.at_ms < 2000);
    let mut head = InputScript::new();
    for step in browse {
        head = head.step(step.at_ms, step.event);
    }
    let mut trace = head.replay(&mut d, epoch);
    d.navigation_mut().push_at(NavigationSection::Player, epoch);
    let mut tail = InputScript::new();
    for step in rest {
        tail = tail.step(step.at_ms, step.event);
    }
    trace.extend(tail.replay(&mut d, epoch));
    sink.flush().unwrap();

    let summary: Vec<(RemoteButton, CommandOutcome, u64)> = trace
        .iter()
        .map(|r| (r.button, r.outcome, r.timestamp_us))
        .collect();
    assert_eq!(
        summary,
        vec![
            (RemoteButton::Right, CommandOutcome::FocusMoved, 0),
            (RemoteButton::Down, CommandOutcome::FocusMoved, 40_000),
            (RemoteButton::Down, CommandOutcome::NoChange, 80_000),
            (RemoteButton::Left, CommandOutcome::FocusMoved, 1_100_000),
            (RemoteButton::FastForward, CommandOutcome::Playback, 3_000_000),
            (RemoteButton::Back, CommandOutcome::Back, 4_000_000),
            (RemoteButton::Up, CommandOutcome::FocusMoved, 4_100_000),
        ]
    );
    // Back returned to the library and restored the remembered tile.
    assert_eq!(d.navigation().section(), NavigationSection::Library);
    assert_eq!(d.engine().current().map(|id| id.as_str()), Some("r0c0"));
    assert_eq!(trace[3].context, NavigationContext::Browse);
    assert_eq!(trace[4].context, NavigationContext::Playback);
    assert_eq!(player.commands(), vec![PlaybackCommand::Seek { offset_ms: 10_000 }]);

    let written: Vec<CommandRecord> = fs::read_to_string(&trace_path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(written, trace);

    let first: serde_json::Value =
        serde_json::from_str(fs::read_to_string(&trace_path).unwrap().lines().next().unwrap())
            .unwrap();
    assert_eq!(first["type"], "right");
    assert_eq!(first["success"], true);
    assert!(first.get("gesture").is_none());
}

#[test]
fn replay_is_deterministic() {
    let script = InputScript::parse(SESSION).unwrap();
    let run = || {
        let epoch = Instant::now();
        let mut d = library(epoch);
        script.replay(&mut d, epoch)
    };
    assert_eq!(run(), run());
}

const BUTTONS: [RemoteButton; 6] = [
    RemoteButton::Up,
    RemoteButton::Down,
    RemoteButton::Left,
    RemoteButton::Right,
    RemoteButton::Select,
    RemoteButton::Back,
];

proptest! {
    #[test]
    fn one_record_per_scripted_press(
        presses in proptest::collection::vec((0usize..BUTTONS.len(), 0u64..200), 1..40)
    ) {
        let mut script = InputScript::new();
        let mut at = 0;
        for &(b, gap) in &presses {
            at += gap;
            script = script.key(at, BUTTONS[b]);
        }
        let reparsed = InputScript::parse(&script.to_jsonl().unwrap()).unwrap();
        prop_assert_eq!(&reparsed, &script);

        let epoch = Instant::now();
        let mut d = library(epoch);
        let trace = reparsed.replay(&mut d, epoch);
        prop_assert_eq!(trace.len(), presses.len());
        for (record, step) in trace.iter().zip(script.steps()) {
            prop_assert_eq!(record.timestamp_us, step.at_ms * 1000);
        }
        prop_assert!(d.engine().focused_count() <= 1);
    }
}

//! End-to-end session scenarios driven through mocks: countdowns,
//! judging, holds, pause/resume, navigation, and calibration.

use std::fs;
use std::path::Path;

use serde_json::json;
use tempfile::{TempDir, tempdir};

use beatlane::chart::SongLibrary;
use beatlane::model::{Difficulty, Judgment, LaneCount};
use beatlane::play::session::{COUNTDOWN_MS, FINISH_MARGIN_MS, Phase, Session, SessionEvent};
use beatlane::traits::audio::MockAudio;
use beatlane::traits::input::{LaneEvent, ScriptedInput};
use beatlane::traits::time::MockClock;

fn write_song(root: &Path, artist: &str, name: &str, offset_ms: i64, notes: serde_json::Value) {
    let dir = root.join(artist).join(name);
    fs::create_dir_all(dir.join("charts")).unwrap();
    let meta = json!({
        "title": name,
        "artist": artist,
        "bpm": 120.0,
        "offsetMs": offset_ms,
    });
    fs::write(dir.join("meta.json"), meta.to_string()).unwrap();
    fs::write(dir.join("song.wav"), b"").unwrap();
    let chart = json!({
        "title": name,
        "artist": artist,
        "lanes": 6,
        "difficulty": "normal",
        "bpm": 120.0,
        "style": "vocal_first",
        "notes": notes,
    });
    fs::write(dir.join("charts").join("6_normal.json"), chart.to_string()).unwrap();
}

struct Harness {
    _dir: TempDir,
    session: Session,
    audio: MockAudio,
    input: ScriptedInput,
    wall: MockClock,
}

impl Harness {
    fn new(notes: serde_json::Value) -> Self {
        let dir = tempdir().unwrap();
        write_song(dir.path(), "artist", "song", 0, notes);
        let library = SongLibrary::scan(dir.path());
        Self {
            session: Session::new(library, LaneCount::Six, Difficulty::Normal),
            audio: MockAudio::new(),
            input: ScriptedInput::new(),
            wall: MockClock::new(0),
            _dir: dir,
        }
    }

    fn tick(&mut self) -> Vec<SessionEvent> {
        self.session
            .tick(&mut self.audio, &mut self.input, &self.wall)
            .unwrap()
    }

    /// Start the chart and run the countdown out.
    fn play(&mut self) {
        self.session.start(&mut self.audio, &self.wall).unwrap();
        self.wall.advance(COUNTDOWN_MS);
        let events = self.tick();
        assert_eq!(events, vec![SessionEvent::PlayStarted]);
    }

    /// Move the audio playhead to an absolute position and press a lane.
    fn press_at(&mut self, position_ms: i64, lane: usize) -> Vec<SessionEvent> {
        self.audio.set_position(position_ms);
        self.input.press(lane);
        let events = self.tick();
        self.input.release(lane);
        self.tick();
        events
    }

    fn combo(&self) -> u32 {
        self.session.run().map_or(0, |r| r.combo())
    }
}

#[test]
fn scenario_exact_press_scores_s_perfect() {
    let mut h = Harness::new(json!([{"tMs": 1000, "lane": 0}]));
    h.play();

    let events = h.press_at(1000, 0);
    assert!(matches!(
        events[..],
        [SessionEvent::Judged { lane: 0, result }]
            if result.tier == Judgment::SPerfect && result.signed_error_ms == 0
    ));
    assert_eq!(h.combo(), 1);
}

#[test]
fn scenario_late_press_becomes_auto_miss() {
    // At 1150 the note is already past the miss bound; the sweep owns
    // it and the press finds nothing.
    let mut h = Harness::new(json!([{"tMs": 1000, "lane": 0}]));
    h.play();

    let events = h.press_at(1150, 0);
    assert_eq!(
        events,
        vec![
            SessionEvent::AutoMissed { lane: 0 },
            SessionEvent::EmptyPress { lane: 0 },
        ]
    );
    assert_eq!(h.combo(), 0);
}

#[test]
fn scenario_hold_to_completion() {
    let mut h = Harness::new(json!([
        {"tMs": 2000, "lane": 1, "type": "hold", "durMs": 500}
    ]));
    h.play();

    h.audio.set_position(1995);
    h.input.press(1);
    let events = h.tick();
    assert!(matches!(events[..], [SessionEvent::HoldStarted { lane: 1, .. }]));
    assert_eq!(h.combo(), 0);

    // Still held mid-way: lane is lit, nothing resolves.
    h.audio.set_position(2300);
    assert!(h.tick().is_empty());
    assert!(h.session.run().unwrap().is_lane_holding(1));

    h.audio.set_position(2510);
    let events = h.tick();
    assert_eq!(events, vec![SessionEvent::HoldCompleted { lane: 1 }]);
    assert_eq!(h.combo(), 1);

    // Exactly once.
    h.audio.set_position(2520);
    assert!(h.tick().is_empty());
    assert_eq!(h.combo(), 1);
}

#[test]
fn scenario_early_hold_release_fails() {
    let mut h = Harness::new(json!([
        {"tMs": 2000, "lane": 1, "type": "hold", "durMs": 500}
    ]));
    h.play();

    h.audio.set_position(2000);
    h.input.press(1);
    h.tick();

    h.audio.set_position(2200);
    h.input.release(1);
    let events = h.tick();
    assert_eq!(events, vec![SessionEvent::HoldDropped { lane: 1 }]);
    assert_eq!(h.combo(), 0);
    assert!(!h.session.run().unwrap().is_lane_holding(1));
}

#[test]
fn scenario_calibration_counters_consistent_lateness() {
    // Twelve presses all 20ms late: mean +20, gain 0.35, step -7.
    let notes: Vec<serde_json::Value> = (0..12)
        .map(|i| json!({"tMs": 1000 + i * 500, "lane": 0}))
        .collect();
    let mut h = Harness::new(serde_json::Value::Array(notes));
    h.play();

    for i in 0..12 {
        let events = h.press_at(1000 + i * 500 + 20, 0);
        assert!(matches!(events[..], [SessionEvent::Judged { .. }]));
    }
    assert_eq!(h.session.run().unwrap().offset_ms(), -7);
    assert_eq!(h.combo(), 12);
}

#[test]
fn calibration_persists_after_enough_samples() {
    // 36 successes cross the persistence threshold; the tuned offset
    // lands in meta.json. Steps: -7 (errors +20), then -5 (+13), then
    // -3 (+8), so the stored value is -15.
    let notes: Vec<serde_json::Value> = (0..36)
        .map(|i| json!({"tMs": 1000 + i * 500, "lane": 0}))
        .collect();
    let mut h = Harness::new(serde_json::Value::Array(notes));
    h.play();

    for i in 0..36 {
        h.press_at(1000 + i * 500 + 20, 0);
    }
    assert_eq!(h.session.run().unwrap().offset_ms(), -15);

    let loaded = h
        .session
        .library()
        .load(0, LaneCount::Six, Difficulty::Normal)
        .unwrap();
    assert_eq!(loaded.offset_ms, -15);
}

#[test]
fn pause_freezes_judgment_until_countdown_ends() {
    let mut h = Harness::new(json!([
        {"tMs": 1000, "lane": 0},
        {"tMs": 60000, "lane": 0}
    ]));
    h.play();
    h.press_at(1000, 0);
    assert_eq!(h.combo(), 1);

    h.session.pause(&mut h.audio, &h.wall).unwrap();
    assert_eq!(h.session.phase(), Phase::PauseCountdown);
    assert!(!h.audio.is_playing());

    // Presses during the pause countdown are dropped.
    h.input.press(0);
    assert!(h.tick().is_empty());
    assert_eq!(h.combo(), 1);

    h.wall.advance(COUNTDOWN_MS);
    let events = h.tick();
    assert_eq!(events, vec![SessionEvent::Resumed]);
    assert_eq!(h.session.phase(), Phase::Playing);
    assert!(h.audio.is_playing());
    assert_eq!(h.combo(), 1);
}

#[test]
fn song_end_leaves_play_and_stops_audio() {
    let mut h = Harness::new(json!([{"tMs": 1000, "lane": 0}]));
    h.play();
    h.press_at(1000, 0);

    h.audio.set_position(1000 + FINISH_MARGIN_MS + 1);
    let events = h.tick();
    assert_eq!(events, vec![SessionEvent::SongEnded]);
    assert_eq!(h.session.phase(), Phase::Select);
    assert!(h.session.run().is_none());
    assert!(!h.audio.is_playing());
}

#[test]
fn navigation_reloads_and_reseeds() {
    let dir = tempdir().unwrap();
    write_song(dir.path(), "a", "first", 25, json!([{"tMs": 1000, "lane": 0}]));
    write_song(dir.path(), "b", "second", -40, json!([{"tMs": 1000, "lane": 0}]));
    let library = SongLibrary::scan(dir.path());

    let mut session = Session::new(library, LaneCount::Six, Difficulty::Normal);
    let mut audio = MockAudio::new();
    let wall = MockClock::new(0);

    session.start(&mut audio, &wall).unwrap();
    assert_eq!(session.run().unwrap().offset_ms(), 25);

    // Switching songs mid-countdown abandons the run and the new
    // start seeds from the other song's metadata.
    session.select_next_song(&mut audio).unwrap();
    assert_eq!(session.phase(), Phase::Select);
    assert_eq!(session.song_index(), 1);

    session.start(&mut audio, &wall).unwrap();
    assert_eq!(session.run().unwrap().offset_ms(), -40);

    // The first song's stored offset was untouched by the abandoned
    // countdown (no calibration had run; persist wrote the seed back).
    session.select_prev_song(&mut audio).unwrap();
    session.start(&mut audio, &wall).unwrap();
    assert_eq!(session.run().unwrap().offset_ms(), 25);
}

#[test]
fn negative_audio_position_clamps_to_song_start() {
    // Right after play() a backend may report a stale negative
    // position; song time stays at zero plus the offset.
    let mut h = Harness::new(json!([{"tMs": 1000, "lane": 0}]));
    h.play();

    h.audio.set_position(-300);
    h.tick();
    assert_eq!(h.session.run().unwrap().now_ms(), 0);
}

#[test]
fn simultaneous_presses_in_one_frame_stay_fifo() {
    let mut h = Harness::new(json!([
        {"tMs": 1000, "lane": 2},
        {"tMs": 1000, "lane": 4}
    ]));
    h.play();

    h.audio.set_position(1000);
    h.input
        .push_frame(vec![LaneEvent::down(4), LaneEvent::down(2)]);
    let events = h.tick();
    assert!(matches!(events[0], SessionEvent::Judged { lane: 4, .. }));
    assert!(matches!(events[1], SessionEvent::Judged { lane: 2, .. }));
    assert_eq!(h.combo(), 2);
}

//! Session lifecycle and the per-tick orchestration loop.
//!
//! The session owns every gameplay component and gates them by phase:
//! only `Playing` advances the note stream or accepts judgment input.
//! Countdowns run on the wall clock because the audio clock is stopped
//! while they run.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::chart::{SongLibrary, SongMeta};
use crate::input::LaneKeys;
use crate::model::{Difficulty, JudgeWindows, JudgmentResult, LaneCount};
use crate::play::calibration::CalibrationController;
use crate::play::clock::SongClock;
use crate::play::combo::ComboTracker;
use crate::play::hold::HoldTracker;
use crate::play::judge::{JudgmentEngine, PressOutcome};
use crate::play::stream::NoteStream;
use crate::play::timers::{SessionTimers, TIMER_COUNTDOWN, TIMER_GO};
use crate::traits::audio::AudioOutput;
use crate::traits::input::InputSource;
use crate::traits::time::WallClock;

/// Countdown before play starts and before a pause resumes.
pub const COUNTDOWN_MS: i64 = 3000;

/// "Go" flash shown right after a countdown elapses.
pub const GO_MS: i64 = 450;

/// Time past the last note end before the session leaves play.
pub const FINISH_MARGIN_MS: i64 = 3000;

/// Session phase. Only `Playing` runs gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Browsing songs; no chart loaded.
    Select,
    /// Pre-play countdown; audio not yet started.
    Countdown,
    /// Active play.
    Playing,
    /// Paused; countdown before resuming.
    PauseCountdown,
}

/// Gameplay outcome surfaced by one tick, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A press was judged (taps of any tier, and ignored early presses).
    Judged { lane: usize, result: JudgmentResult },
    /// A hold head landed; scoring deferred to completion.
    HoldStarted { lane: usize, result: JudgmentResult },
    HoldCompleted { lane: usize },
    HoldDropped { lane: usize },
    /// An untouched note slipped past the miss bound.
    AutoMissed { lane: usize },
    /// A press with no note in reach.
    EmptyPress { lane: usize },
    PlayStarted,
    Resumed,
    SongEnded,
}

/// Live state of one chart run. Rebuilt from scratch on every start.
pub struct Run {
    meta: SongMeta,
    clock: SongClock,
    stream: NoteStream,
    judge: JudgmentEngine,
    holds: HoldTracker,
    keys: LaneKeys,
    combo: ComboTracker,
    calibration: CalibrationController,
    now_ms: i64,
}

impl Run {
    pub fn meta(&self) -> &SongMeta {
        &self.meta
    }

    pub fn stream(&self) -> &NoteStream {
        &self.stream
    }

    pub fn combo(&self) -> u32 {
        self.combo.combo()
    }

    pub fn max_combo(&self) -> u32 {
        self.combo.max_combo()
    }

    pub fn offset_ms(&self) -> i64 {
        self.clock.offset_ms()
    }

    /// Song time as of the last tick.
    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    /// Whether a hold is in flight on the lane (the lane is "lit").
    pub fn is_lane_holding(&self, lane: usize) -> bool {
        self.holds.is_holding(lane)
    }
}

/// The session state machine and tick driver.
pub struct Session {
    library: SongLibrary,
    song_index: usize,
    lanes: LaneCount,
    difficulty: Difficulty,
    phase: Phase,
    timers: SessionTimers,
    run: Option<Run>,
}

impl Session {
    pub fn new(library: SongLibrary, lanes: LaneCount, difficulty: Difficulty) -> Self {
        Self {
            library,
            song_index: 0,
            lanes,
            difficulty,
            phase: Phase::Select,
            timers: SessionTimers::new(),
            run: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timers(&self) -> &SessionTimers {
        &self.timers
    }

    pub fn library(&self) -> &SongLibrary {
        &self.library
    }

    pub fn song_index(&self) -> usize {
        self.song_index
    }

    pub fn lanes(&self) -> LaneCount {
        self.lanes
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The current run, present outside `Select`.
    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    /// Begin the selected chart: load it, seed the clock from its
    /// persisted offset, and start the countdown. No-op outside
    /// `Select`.
    pub fn start(&mut self, audio: &mut dyn AudioOutput, wall: &dyn WallClock) -> Result<()> {
        if self.phase != Phase::Select {
            return Ok(());
        }
        let song = self.library.load(self.song_index, self.lanes, self.difficulty)?;
        audio.load(&song.audio_path)?;

        let windows = JudgeWindows::base();
        self.run = Some(Run {
            meta: song.meta,
            clock: SongClock::new(song.offset_ms),
            stream: NoteStream::new(song.notes, &windows),
            judge: JudgmentEngine::new(windows),
            holds: HoldTracker::new(self.lanes.count()),
            keys: LaneKeys::new(self.lanes.count()),
            combo: ComboTracker::new(),
            calibration: CalibrationController::new(),
            now_ms: 0,
        });
        self.phase = Phase::Countdown;
        self.timers.clear();
        self.timers.set(TIMER_COUNTDOWN, wall.now_ms());
        Ok(())
    }

    /// Pause active play. No-op outside `Playing`.
    pub fn pause(&mut self, audio: &mut dyn AudioOutput, wall: &dyn WallClock) -> Result<()> {
        if self.phase != Phase::Playing {
            return Ok(());
        }
        audio.pause()?;
        self.phase = Phase::PauseCountdown;
        self.timers.set(TIMER_COUNTDOWN, wall.now_ms());
        debug!("Paused at {}ms song time", self.run.as_ref().map_or(0, |r| r.now_ms));
        Ok(())
    }

    /// Abandon any run and return to song select. In-flight notes and
    /// holds are discarded, not resolved; the tuned offset is persisted
    /// best effort.
    pub fn back_to_select(&mut self, audio: &mut dyn AudioOutput) -> Result<()> {
        if let Some(run) = self.run.take() {
            persist_offset(&self.library, self.song_index, run.clock.offset_ms());
            audio.stop()?;
        }
        self.timers.clear();
        self.phase = Phase::Select;
        Ok(())
    }

    /// Move to the next song, wrapping. Leaves any run first.
    pub fn select_next_song(&mut self, audio: &mut dyn AudioOutput) -> Result<()> {
        self.back_to_select(audio)?;
        if !self.library.is_empty() {
            self.song_index = (self.song_index + 1) % self.library.len();
        }
        Ok(())
    }

    /// Move to the previous song, wrapping. Leaves any run first.
    pub fn select_prev_song(&mut self, audio: &mut dyn AudioOutput) -> Result<()> {
        self.back_to_select(audio)?;
        if !self.library.is_empty() {
            self.song_index = (self.song_index + self.library.len() - 1) % self.library.len();
        }
        Ok(())
    }

    pub fn set_difficulty(&mut self, audio: &mut dyn AudioOutput, difficulty: Difficulty) -> Result<()> {
        self.back_to_select(audio)?;
        self.difficulty = difficulty;
        Ok(())
    }

    pub fn toggle_lane_count(&mut self, audio: &mut dyn AudioOutput) -> Result<()> {
        self.back_to_select(audio)?;
        self.lanes = self.lanes.toggled();
        Ok(())
    }

    /// Drive one frame. Order within `Playing`: time sample, spawn,
    /// auto-miss sweep, retire, input drain, hold resolution,
    /// calibration, song-end check.
    pub fn tick(
        &mut self,
        audio: &mut dyn AudioOutput,
        input: &mut dyn InputSource,
        wall: &dyn WallClock,
    ) -> Result<Vec<SessionEvent>> {
        let wall_now = wall.now_ms();
        let mut events = Vec::new();

        match self.phase {
            Phase::Select => {
                // Stale lane events from before a transition are dropped.
                input.poll_events();
            }
            Phase::Countdown => {
                input.poll_events();
                if self.countdown_elapsed(wall_now) {
                    audio.play()?;
                    self.enter_playing(wall_now);
                    if let Some(run) = self.run.as_ref() {
                        info!(
                            "Play started: {} - {} ({} notes)",
                            run.meta.artist,
                            run.meta.title,
                            run.stream.len()
                        );
                    }
                    events.push(SessionEvent::PlayStarted);
                }
            }
            Phase::PauseCountdown => {
                input.poll_events();
                if self.countdown_elapsed(wall_now) {
                    audio.unpause()?;
                    self.enter_playing(wall_now);
                    events.push(SessionEvent::Resumed);
                }
            }
            Phase::Playing => {
                self.tick_playing(audio, input, wall_now, &mut events)?;
            }
        }

        Ok(events)
    }

    fn countdown_elapsed(&self, wall_now: i64) -> bool {
        self.timers
            .elapsed(TIMER_COUNTDOWN, wall_now)
            .is_some_and(|e| e >= COUNTDOWN_MS)
    }

    fn enter_playing(&mut self, wall_now: i64) {
        self.phase = Phase::Playing;
        self.timers.reset(TIMER_COUNTDOWN);
        self.timers.set(TIMER_GO, wall_now);
    }

    fn tick_playing(
        &mut self,
        audio: &mut dyn AudioOutput,
        input: &mut dyn InputSource,
        wall_now: i64,
        events: &mut Vec<SessionEvent>,
    ) -> Result<()> {
        let Some(run) = self.run.as_mut() else {
            return Ok(());
        };

        let now = run.clock.now(audio);
        run.now_ms = now;
        run.stream.advance(now);

        for idx in run.stream.sweep_auto_miss(now) {
            let lane = run.stream.note(idx).lane;
            run.combo.on_failure();
            self.timers.set_judge(lane, wall_now);
            events.push(SessionEvent::AutoMissed { lane });
        }
        run.stream.retire(now);

        run.keys.begin_frame();
        for event in input.poll_events() {
            let lane = event.lane;
            if !event.is_down {
                run.keys.on_release(lane, now);
                self.timers.set_key_off(lane, wall_now);
                continue;
            }

            run.keys.on_press(lane, now);
            self.timers.set_key_on(lane, wall_now);
            if run.holds.is_holding(lane) {
                // The lane is occupied until its hold resolves.
                continue;
            }

            match run.judge.judge_press(&mut run.stream, lane, now) {
                PressOutcome::Scored { result, .. } => {
                    self.timers.set_judge(lane, wall_now);
                    if result.tier.continues_combo() {
                        run.combo.on_success();
                        if let Some(update) = run.calibration.record(result.signed_error_ms) {
                            if update.step_ms != 0 {
                                run.clock.nudge(update.step_ms);
                                debug!(
                                    "Offset nudged by {}ms to {}ms",
                                    update.step_ms,
                                    run.clock.offset_ms()
                                );
                            }
                            if update.persist {
                                persist_offset(
                                    &self.library,
                                    self.song_index,
                                    run.clock.offset_ms(),
                                );
                            }
                        }
                    } else {
                        run.combo.on_failure();
                    }
                    events.push(SessionEvent::Judged { lane, result });
                }
                PressOutcome::HoldStarted { index, result } => {
                    run.holds.begin(lane, index);
                    self.timers.set_judge(lane, wall_now);
                    events.push(SessionEvent::HoldStarted { lane, result });
                }
                PressOutcome::Ignored { result, .. } => {
                    events.push(SessionEvent::Judged { lane, result });
                }
                PressOutcome::MissEmpty => {
                    run.combo.on_failure();
                    events.push(SessionEvent::EmptyPress { lane });
                }
            }
        }

        for outcome in run.holds.update(&mut run.stream, &run.keys, now) {
            self.timers.set_judge(outcome.lane, wall_now);
            if outcome.success {
                run.combo.on_success();
                events.push(SessionEvent::HoldCompleted { lane: outcome.lane });
            } else {
                run.combo.on_failure();
                events.push(SessionEvent::HoldDropped { lane: outcome.lane });
            }
        }

        if run.stream.finished() && now > run.stream.last_end_ms() + FINISH_MARGIN_MS {
            info!("Song finished (max combo {})", run.combo.max_combo());
            events.push(SessionEvent::SongEnded);
            self.back_to_select(audio)?;
        }
        Ok(())
    }
}

/// Write the tuned offset back to the song metadata. Calibration is a
/// UX nicety; failures are logged and swallowed.
fn persist_offset(library: &SongLibrary, song_index: usize, offset_ms: i64) {
    if let Err(e) = library.save_offset(song_index, offset_ms) {
        warn!("Failed to persist calibration offset: {e}");
    }
}

//! Press judgment: candidate selection and tier classification.

use crate::model::{Judgment, JudgmentResult, JudgeWindows};
use crate::play::stream::NoteStream;

/// What a single lane press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// A tap was resolved (any tier including a late-side miss).
    Scored {
        index: usize,
        result: JudgmentResult,
    },
    /// A hold head landed in-window; scoring is deferred to the hold's
    /// completion. The result is display-only.
    HoldStarted {
        index: usize,
        result: JudgmentResult,
    },
    /// The press was ahead of the scoreable window. The note stays
    /// live and the press has no effect.
    Ignored {
        index: usize,
        result: JudgmentResult,
    },
    /// No note was in reach on this lane. Breaks the combo.
    MissEmpty,
}

/// Stateless judge over a note stream.
pub struct JudgmentEngine {
    windows: JudgeWindows,
}

impl JudgmentEngine {
    pub fn new(windows: JudgeWindows) -> Self {
        Self { windows }
    }

    pub fn windows(&self) -> &JudgeWindows {
        &self.windows
    }

    /// Judge a key-down on `lane` at song time `now`.
    ///
    /// Candidate selection: among active unresolved notes in the lane
    /// within reach, pick the one with the smallest absolute error.
    /// Ties go to the earliest note; iteration is in chart order, so
    /// keeping the first strictly-smaller candidate implements that.
    pub fn judge_press(&self, stream: &mut NoteStream, lane: usize, now: i64) -> PressOutcome {
        let mut best: Option<(usize, i64)> = None;
        for (idx, note) in stream.candidates(lane) {
            let error = now - note.time_ms;
            if !self.windows.in_reach(error) {
                continue;
            }
            if best.is_none_or(|(_, b)| error.abs() < b.abs()) {
                best = Some((idx, error));
            }
        }

        let Some((index, signed_error_ms)) = best else {
            return PressOutcome::MissEmpty;
        };

        let tier = self.windows.classify(signed_error_ms);
        let result = JudgmentResult {
            tier,
            signed_error_ms,
        };

        match tier {
            Judgment::Early => PressOutcome::Ignored { index, result },
            Judgment::Miss => {
                stream.resolve(index);
                PressOutcome::Scored { index, result }
            }
            Judgment::SPerfect | Judgment::Perfect | Judgment::Great => {
                if stream.note(index).is_hold() {
                    stream.start_hold(index);
                    PressOutcome::HoldStarted { index, result }
                } else {
                    stream.resolve(index);
                    PressOutcome::Scored { index, result }
                }
            }
        }
    }
}

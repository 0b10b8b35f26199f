/// Accuracy tier for a judged press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgment {
    SPerfect,
    Perfect,
    Great,
    Miss,
    /// Press landed ahead of the scoreable windows. The note stays live.
    Early,
}

impl Judgment {
    /// Whether this tier keeps the combo chain going.
    pub fn continues_combo(&self) -> bool {
        matches!(
            self,
            Judgment::SPerfect | Judgment::Perfect | Judgment::Great
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Judgment::SPerfect => "S-PERFECT",
            Judgment::Perfect => "PERFECT",
            Judgment::Great => "GREAT",
            Judgment::Miss => "MISS",
            Judgment::Early => "EARLY",
        }
    }
}

/// Outcome of judging one press against one note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JudgmentResult {
    pub tier: Judgment,
    /// `press_time - note_time` in milliseconds. Negative means early.
    pub signed_error_ms: i64,
}

/// Timing windows in milliseconds, symmetric around each note's target time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JudgeWindows {
    pub s_perfect_ms: i64,
    pub perfect_ms: i64,
    pub great_ms: i64,
    /// Outer bound. A press beyond this on the late side is a miss on that
    /// note; the same bound drives the auto-miss sweep.
    pub miss_ms: i64,
}

impl JudgeWindows {
    /// Standard windows shared by every chart.
    pub fn base() -> Self {
        Self {
            s_perfect_ms: 22,
            perfect_ms: 45,
            great_ms: 95,
            miss_ms: 140,
        }
    }

    /// Classify a signed error. Window edges are inclusive.
    pub fn classify(&self, signed_error_ms: i64) -> Judgment {
        let abs = signed_error_ms.abs();
        if abs <= self.s_perfect_ms {
            Judgment::SPerfect
        } else if abs <= self.perfect_ms {
            Judgment::Perfect
        } else if abs <= self.great_ms {
            Judgment::Great
        } else if signed_error_ms < 0 {
            Judgment::Early
        } else {
            Judgment::Miss
        }
    }

    /// Whether a press with this signed error can interact with a note at
    /// all. Presses outside this range leave the note untouched.
    pub fn in_reach(&self, signed_error_ms: i64) -> bool {
        signed_error_ms.abs() <= self.miss_ms
    }
}

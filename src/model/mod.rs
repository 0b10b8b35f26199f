pub mod judgment;
pub mod note;

pub use judgment::{Judgment, JudgmentResult, JudgeWindows};
pub use note::{Difficulty, LaneCount, Note, NoteKind};

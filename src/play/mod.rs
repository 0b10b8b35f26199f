pub mod calibration;
pub mod clock;
pub mod combo;
pub mod hold;
pub mod judge;
pub mod session;
pub mod stream;
pub mod timers;

pub use calibration::{CalibrationController, CalibrationUpdate};
pub use clock::SongClock;
pub use combo::ComboTracker;
pub use hold::{HoldOutcome, HoldTracker, RELEASE_GRACE_MS};
pub use judge::{JudgmentEngine, PressOutcome};
pub use session::{Phase, Run, Session, SessionEvent};
pub use stream::{NoteStream, RETIRE_MS, SPAWN_LEAD_MS};
pub use timers::{LANE_FLASH_MS, SessionTimers};

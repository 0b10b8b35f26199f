pub mod keymap;
pub mod lane_state;

pub use keymap::{lane_for_key, lane_labels, KeyMode};
pub use lane_state::{LaneKey, LaneKeys};

//! Physical-key-to-lane mapping.
//!
//! Three layouts are supported: home-row letters, a number row, and a
//! split-hands layout on the numeric keypad columns. The split-hands
//! layout only exists for six lanes.

use serde::{Deserialize, Serialize};

use crate::model::LaneCount;

/// Active keyboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    /// Home row: A S D (J) K L.
    Keys,
    /// Number row: 1 2 3 4 5 (6).
    Numeric,
    /// Keypad columns: 1 4 7 for the left hand, 3 6 9 for the right.
    SplitHands,
}

impl KeyMode {
    /// Cycle to the next layout valid for the given lane count.
    pub fn toggled(self, lanes: LaneCount) -> Self {
        match (self, lanes) {
            (KeyMode::Keys, _) => KeyMode::Numeric,
            (KeyMode::Numeric, LaneCount::Six) => KeyMode::SplitHands,
            (KeyMode::Numeric, LaneCount::Five) => KeyMode::Keys,
            (KeyMode::SplitHands, _) => KeyMode::Keys,
        }
    }
}

impl Default for KeyMode {
    fn default() -> Self {
        KeyMode::Keys
    }
}

/// Resolve a pressed character to a lane index, if it maps to one.
pub fn lane_for_key(mode: KeyMode, lanes: LaneCount, key: char) -> Option<usize> {
    let key = key.to_ascii_lowercase();
    let letters: &[char] = match lanes {
        LaneCount::Six => &['a', 's', 'd', 'j', 'k', 'l'],
        LaneCount::Five => &['a', 's', 'd', 'k', 'l'],
    };

    match mode {
        KeyMode::Keys => letters.iter().position(|&c| c == key),
        KeyMode::Numeric => {
            let lane = (key as i64) - ('1' as i64);
            if lane >= 0 && (lane as usize) < lanes.count() {
                Some(lane as usize)
            } else {
                None
            }
        }
        KeyMode::SplitHands => match lanes {
            LaneCount::Five => None,
            LaneCount::Six => match key {
                '1' => Some(0),
                '4' => Some(1),
                '7' => Some(2),
                '3' => Some(3),
                '6' => Some(4),
                '9' => Some(5),
                _ => None,
            },
        },
    }
}

/// Display labels for each lane under the given layout.
pub fn lane_labels(mode: KeyMode, lanes: LaneCount) -> Vec<char> {
    (0..lanes.count())
        .map(|lane| {
            "asdjkl123456789"
                .chars()
                .find(|&c| lane_for_key(mode, lanes, c) == Some(lane))
                .unwrap_or('?')
        })
        .collect()
}

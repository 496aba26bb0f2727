use serde::{Deserialize, Serialize};

use crate::exercise::Position;

/// Run of consecutive frames that classified the same way.
///
/// A position reaches the rep counter only once it has held for the
/// configured number of frames, so a single noisy frame cannot flip the
/// latched phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionStreak {
    candidate: Option<Position>,
    frames: u32,
}

impl PositionStreak {
    /// Record one classified frame. Returns the position once it has been
    /// seen on at least `required` consecutive frames.
    pub fn observe(&mut self, position: Position, required: u32) -> Option<Position> {
        if self.candidate == Some(position) {
            self.frames = self.frames.saturating_add(1);
        } else {
            self.candidate = Some(position);
            self.frames = 1;
        }
        (self.frames >= required.max(1)).then_some(position)
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }
}

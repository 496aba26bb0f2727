use serde::{Deserialize, Serialize};

use crate::exercise::Position;

/// Last extreme position the user reached. Frames inside the hysteresis
/// band never change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RepPhase {
    /// No extreme reached since calibration finished.
    #[default]
    Unlatched,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: RepPhase,
    pub rep_completed: bool,
    pub changed: bool,
}

/// The single transition function of the rep counter.
///
/// A rep completes exactly on `Down → Up`. Re-classifying the current
/// phase, `Up → Down` and in-band (`Transitioning`) frames never count.
pub fn transition(phase: RepPhase, position: Position) -> Transition {
    let next = match position {
        Position::Up => RepPhase::Up,
        Position::Down => RepPhase::Down,
        Position::Transitioning => phase,
    };
    Transition {
        next,
        rep_completed: phase == RepPhase::Down && next == RepPhase::Up,
        changed: next != phase,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(positions: &[Position]) -> (RepPhase, u32) {
        let mut phase = RepPhase::Unlatched;
        let mut reps = 0;
        for p in positions {
            let t = transition(phase, *p);
            if t.rep_completed {
                reps += 1;
            }
            phase = t.next;
        }
        (phase, reps)
    }

    #[test]
    fn down_to_up_counts_once() {
        use Position::*;
        assert_eq!(run(&[Up, Down, Up]), (RepPhase::Up, 1));
        assert_eq!(run(&[Up, Transitioning, Down, Transitioning, Up]), (RepPhase::Up, 1));
    }

    #[test]
    fn up_to_down_alone_never_counts() {
        use Position::*;
        assert_eq!(run(&[Up, Down]), (RepPhase::Down, 0));
        assert_eq!(run(&[Up, Down, Down, Down]), (RepPhase::Down, 0));
    }

    #[test]
    fn repeated_up_is_idempotent() {
        use Position::*;
        assert_eq!(run(&[Down, Up, Up, Up]), (RepPhase::Up, 1));
    }

    #[test]
    fn band_frames_hold_the_phase() {
        let t = transition(RepPhase::Down, Position::Transitioning);
        assert_eq!(t.next, RepPhase::Down);
        assert!(!t.changed);
        assert!(!t.rep_completed);
    }

    #[test]
    fn first_up_after_calibration_does_not_count() {
        let t = transition(RepPhase::Unlatched, Position::Up);
        assert!(t.changed);
        assert!(!t.rep_completed);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationSource;
use crate::counting::{PositionStreak, RepPhase};
use crate::exercise::{ExerciseKind, Position};
use crate::form::FaultKind;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    #[default]
    AwaitingStart,
    Calibrating,
    Active,
    Finished,
}

/// Classification reported for a single processed frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FrameState {
    Calibrating,
    Up,
    Down,
    Transitioning,
    /// Primary metric could not be measured; the rep phase was held.
    Invalid,
}

impl From<Position> for FrameState {
    fn from(position: Position) -> Self {
        match position {
            Position::Up => FrameState::Up,
            Position::Down => FrameState::Down,
            Position::Transitioning => FrameState::Transitioning,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseState {
    pub repetition_count: u32,
    pub phase: RepPhase,
    pub form_score: f64,
    pub last_feedback: String,
    pub last_rep_at: Option<DateTime<Utc>>,
    /// When the latched phase last changed, or when calibration ended.
    pub last_transition_at: Option<DateTime<Utc>>,
    pub streak: PositionStreak,
    /// Faults seen since the last counted rep.
    pub rep_faults: Vec<FaultKind>,
    /// Counted reps during which at least one fault was seen.
    pub faulted_reps: u32,
    pub form_issues: Vec<FormIssue>,
}

/// How many counted reps showed a given fault.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormIssue {
    pub fault: FaultKind,
    pub count: u32,
}

impl Default for ExerciseState {
    fn default() -> Self {
        Self {
            repetition_count: 0,
            phase: RepPhase::Unlatched,
            form_score: 100.0,
            last_feedback: String::new(),
            last_rep_at: None,
            last_transition_at: None,
            streak: PositionStreak::default(),
            rep_faults: Vec::new(),
            faulted_reps: 0,
            form_issues: Vec::new(),
        }
    }
}

impl ExerciseState {
    pub fn is_up(&self) -> bool {
        self.phase == RepPhase::Up
    }

    pub fn is_down(&self) -> bool {
        self.phase == RepPhase::Down
    }

    pub(crate) fn note_faults(&mut self, faults: &[FaultKind]) {
        for fault in faults {
            if !self.rep_faults.contains(fault) {
                self.rep_faults.push(*fault);
            }
        }
    }

    /// Close the rep that just completed, tallying the faults it carried.
    pub(crate) fn close_rep(&mut self) {
        if self.rep_faults.is_empty() {
            return;
        }
        self.faulted_reps += 1;
        for fault in self.rep_faults.drain(..) {
            match self.form_issues.iter_mut().find(|issue| issue.fault == fault) {
                Some(issue) => issue.count += 1,
                None => self.form_issues.push(FormIssue { fault, count: 1 }),
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub rep_count: u32,
    pub feedback: Vec<String>,
    pub state: FrameState,
    /// Mean confidence of the joints the primary metric needs.
    pub confidence: f64,
    pub form_score: f64,
    pub rep_completed: bool,
    pub faults: Vec<FaultKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: Option<String>,
    pub exercise: ExerciseKind,
    pub status: SessionStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub rep_count: u32,
    pub faulted_reps: u32,
    pub form_issues: Vec<FormIssue>,
    pub form_score: f64,
    pub calibration: Option<CalibrationSource>,
}

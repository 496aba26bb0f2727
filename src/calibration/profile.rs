use serde::{Deserialize, Serialize};

use crate::config::PhaseThresholds;
use crate::exercise::{ExerciseKind, MetricDirection, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CalibrationSource {
    /// Reference-side threshold refined from the user's own posture.
    Observed,
    /// Calibration timed out or was never fed; fixed defaults only.
    Defaults,
}

/// Starting-posture landmarks averaged over the accepted calibration frames.
/// Rules that compare against the start position skip when a field is absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchors {
    pub hip_x: Option<f64>,
    pub hip_y: Option<f64>,
    pub shoulder_y: Option<f64>,
    pub wrist_y: Option<f64>,
    pub knee_angle: Option<f64>,
}

/// Per-user, per-exercise thresholds. Frozen once calibration finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationProfile {
    pub kind: ExerciseKind,
    pub up_threshold: f64,
    pub down_threshold: f64,
    pub source: CalibrationSource,
    pub accepted_samples: usize,
    /// Extreme of the primary metric seen while holding the reference posture.
    pub observed_extreme: Option<f64>,
    pub anchors: Anchors,
}

impl CalibrationProfile {
    pub fn defaults(kind: ExerciseKind, thresholds: &PhaseThresholds) -> Self {
        Self {
            kind,
            up_threshold: thresholds.up,
            down_threshold: thresholds.down,
            source: CalibrationSource::Defaults,
            accepted_samples: 0,
            observed_extreme: None,
            anchors: Anchors::default(),
        }
    }

    /// Classify a primary-metric value against the hysteresis band.
    /// Values on a threshold count as having crossed it.
    pub fn classify(&self, metric: f64) -> Position {
        match self.kind.direction() {
            MetricDirection::HigherIsUp => {
                if metric >= self.up_threshold {
                    Position::Up
                } else if metric <= self.down_threshold {
                    Position::Down
                } else {
                    Position::Transitioning
                }
            }
            MetricDirection::LowerIsUp => {
                if metric <= self.up_threshold {
                    Position::Up
                } else if metric >= self.down_threshold {
                    Position::Down
                } else {
                    Position::Transitioning
                }
            }
        }
    }
}

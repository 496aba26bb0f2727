use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::EngineError;
use crate::geometry;
use crate::pose::joint::{ELBOWS, HIPS, SHOULDERS, WRISTS};
use crate::pose::{Joint, PoseFrame};

/// Exercises the engine can grade. Selects the metric, thresholds and rule
/// set for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExerciseKind {
    Pushup,
    Situp,
    Pullup,
}

/// Which way the primary metric moves toward the "up" position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricDirection {
    HigherIsUp,
    LowerIsUp,
}

/// Position class of a single frame relative to the hysteresis band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Position {
    Up,
    Down,
    Transitioning,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 3] = [ExerciseKind::Pushup, ExerciseKind::Situp, ExerciseKind::Pullup];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseKind::Pushup => "pushup",
            ExerciseKind::Situp => "situp",
            ExerciseKind::Pullup => "pullup",
        }
    }

    pub fn direction(&self) -> MetricDirection {
        match self {
            ExerciseKind::Pushup | ExerciseKind::Situp => MetricDirection::HigherIsUp,
            ExerciseKind::Pullup => MetricDirection::LowerIsUp,
        }
    }

    /// Posture held during calibration: arms extended for push-ups, lying
    /// back for sit-ups, dead hang for pull-ups.
    pub fn reference_position(&self) -> Position {
        match self {
            ExerciseKind::Pushup => Position::Up,
            ExerciseKind::Situp | ExerciseKind::Pullup => Position::Down,
        }
    }

    /// Joints the primary metric is computed from.
    pub fn required_joints(&self) -> &'static [Joint] {
        match self {
            ExerciseKind::Pushup | ExerciseKind::Pullup => &[
                Joint::LeftShoulder,
                Joint::RightShoulder,
                Joint::LeftElbow,
                Joint::RightElbow,
                Joint::LeftWrist,
                Joint::RightWrist,
            ],
            ExerciseKind::Situp => &[
                Joint::LeftShoulder,
                Joint::RightShoulder,
                Joint::LeftHip,
                Joint::RightHip,
            ],
        }
    }

    /// Primary metric in degrees: mean elbow angle for push-ups and
    /// pull-ups, torso inclination above horizontal for sit-ups.
    pub fn primary_metric(&self, frame: &PoseFrame) -> Option<f64> {
        match self {
            ExerciseKind::Pushup | ExerciseKind::Pullup => {
                frame.bilateral_angle(SHOULDERS, ELBOWS, WRISTS)
            }
            ExerciseKind::Situp => torso_inclination(frame),
        }
    }

    pub fn positive_feedback(&self, position: Position) -> &'static str {
        match (self, position) {
            (_, Position::Transitioning) => "Continue the movement.",
            (ExerciseKind::Pushup, Position::Up) => "Good form! Lower your body.",
            (ExerciseKind::Pushup, Position::Down) => "Good form! Push up.",
            (ExerciseKind::Situp, Position::Up) => "Good form! Lower your torso.",
            (ExerciseKind::Situp, Position::Down) => "Good form! Lift your torso.",
            (ExerciseKind::Pullup, Position::Up) => "Good form! Lower your body.",
            (ExerciseKind::Pullup, Position::Down) => "Good form! Pull up.",
        }
    }

    pub fn calibration_prompt(&self) -> &'static str {
        match self {
            ExerciseKind::Pushup => "Hold the starting position with your arms fully extended.",
            ExerciseKind::Situp => "Lie back with your shoulders on the ground.",
            ExerciseKind::Pullup => "Hang from the bar with your arms fully extended.",
        }
    }

    pub fn not_detected_feedback(&self) -> &'static str {
        match self {
            ExerciseKind::Pullup => "Position not detected. Make sure your upper body is visible.",
            _ => "Position not detected. Make sure your full body is visible.",
        }
    }
}

/// Inclination of each hip→shoulder segment, averaged over visible sides.
fn torso_inclination(frame: &PoseFrame) -> Option<f64> {
    let side = |hip: Joint, shoulder: Joint| {
        geometry::inclination(frame.point(hip)?, frame.point(shoulder)?)
    };
    match (
        side(HIPS.left, SHOULDERS.left),
        side(HIPS.right, SHOULDERS.right),
    ) {
        (Some(l), Some(r)) => Some((l + r) / 2.0),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseKind {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "pushup" | "pushups" => Ok(ExerciseKind::Pushup),
            "situp" | "situps" => Ok(ExerciseKind::Situp),
            "pullup" | "pullups" => Ok(ExerciseKind::Pullup),
            _ => Err(EngineError::UnknownExercise(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn parses_common_spellings() {
        assert_eq!("push-up".parse::<ExerciseKind>().unwrap(), ExerciseKind::Pushup);
        assert_eq!("Sit_Ups".parse::<ExerciseKind>().unwrap(), ExerciseKind::Situp);
        assert_eq!("pullup".parse::<ExerciseKind>().unwrap(), ExerciseKind::Pullup);
        assert!(matches!(
            "running".parse::<ExerciseKind>(),
            Err(EngineError::UnknownExercise(name)) if name == "running"
        ));
    }

    #[test]
    fn torso_inclination_reads_lying_and_upright() {
        let lying = PoseFrame::builder(Utc::now())
            .joint(Joint::LeftHip, 0.5, 0.7)
            .joint(Joint::LeftShoulder, 0.2, 0.7)
            .build();
        let upright = PoseFrame::builder(Utc::now())
            .joint(Joint::LeftHip, 0.5, 0.7)
            .joint(Joint::LeftShoulder, 0.5, 0.4)
            .build();

        let kind = ExerciseKind::Situp;
        assert!(kind.primary_metric(&lying).unwrap() < 1.0);
        assert!(kind.primary_metric(&upright).unwrap() > 89.0);
    }
}

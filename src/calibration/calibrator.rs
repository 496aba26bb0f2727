use crate::calibration::profile::{Anchors, CalibrationProfile, CalibrationSource};
use crate::config::{CalibrationConfig, PhaseThresholds};
use crate::exercise::{ExerciseKind, MetricDirection, Position};
use crate::pose::joint::{ANKLES, HIPS, KNEES, SHOULDERS, WRISTS};
use crate::pose::PoseFrame;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

#[derive(Debug, Clone, Copy, Default)]
struct RunningMean {
    sum: f64,
    count: usize,
}

impl RunningMean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[derive(Debug, Clone, Default)]
struct AnchorAccumulator {
    hip_x: RunningMean,
    hip_y: RunningMean,
    shoulder_y: RunningMean,
    wrist_y: RunningMean,
    knee_angle: RunningMean,
}

impl AnchorAccumulator {
    fn observe(&mut self, frame: &PoseFrame) {
        let hip = frame.center(HIPS);
        self.hip_x.push(hip.map(|p| p.x));
        self.hip_y.push(hip.map(|p| p.y));
        self.shoulder_y.push(frame.center(SHOULDERS).map(|p| p.y));
        self.wrist_y.push(frame.center(WRISTS).map(|p| p.y));
        self.knee_angle.push(frame.bilateral_angle(HIPS, KNEES, ANKLES));
    }

    fn anchors(&self) -> Anchors {
        Anchors {
            hip_x: self.hip_x.mean(),
            hip_y: self.hip_y.mean(),
            shoulder_y: self.shoulder_y.mean(),
            wrist_y: self.wrist_y.mean(),
            knee_angle: self.knee_angle.mean(),
        }
    }
}

/// Collects the reference-posture frames that follow `start` and turns them
/// into a [`CalibrationProfile`].
///
/// A frame is accepted only when the primary metric is measurable and lies
/// inside the configured reference range. Low-confidence frames are
/// skipped rather than read as zero.
#[derive(Debug, Clone)]
pub struct Calibrator {
    kind: ExerciseKind,
    thresholds: PhaseThresholds,
    config: CalibrationConfig,
    frames_seen: usize,
    accepted: usize,
    observed_min: f64,
    observed_max: f64,
    anchors: AnchorAccumulator,
}

impl Calibrator {
    pub fn new(kind: ExerciseKind, thresholds: PhaseThresholds, config: CalibrationConfig) -> Self {
        Self {
            kind,
            thresholds,
            config,
            frames_seen: 0,
            accepted: 0,
            observed_min: f64::INFINITY,
            observed_max: f64::NEG_INFINITY,
            anchors: AnchorAccumulator::default(),
        }
    }

    pub fn observe(&mut self, frame: &PoseFrame) {
        if self.is_complete() {
            return;
        }
        self.frames_seen += 1;

        let Some(metric) = self.kind.primary_metric(frame) else {
            return;
        };
        if metric < self.thresholds.reference_min || metric > self.thresholds.reference_max {
            log_debug!(
                "{} calibration: {:.1}° outside reference range, ignored",
                self.kind,
                metric
            );
            return;
        }

        self.accepted += 1;
        self.observed_min = self.observed_min.min(metric);
        self.observed_max = self.observed_max.max(metric);
        self.anchors.observe(frame);
    }

    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn required(&self) -> usize {
        self.config.window_size
    }

    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }

    /// Either the window filled up or the frame bound was reached.
    pub fn is_complete(&self) -> bool {
        self.accepted >= self.config.window_size || self.frames_seen >= self.config.max_frames
    }

    pub fn finalize(self) -> CalibrationProfile {
        let mut profile = CalibrationProfile::defaults(self.kind, &self.thresholds);

        if self.accepted < self.config.window_size {
            log_info!(
                "{} calibration timed out after {} frames ({} accepted); using defaults up={:.1} down={:.1}",
                self.kind,
                self.frames_seen,
                self.accepted,
                profile.up_threshold,
                profile.down_threshold
            );
            return profile;
        }

        let reference = self.kind.reference_position();
        let toward_high =
            (self.kind.direction() == MetricDirection::HigherIsUp) == (reference == Position::Up);

        let default = match reference {
            Position::Up => self.thresholds.up,
            _ => self.thresholds.down,
        };
        let limit = self.thresholds.reference_limit;
        let margin = self.config.margin;

        // Blend toward the user's extreme, never looser than the default and
        // never past the limit, so one noisy frame cannot make reps unreachable.
        let (extreme, refined) = if toward_high {
            let extreme = self.observed_max;
            (extreme, (extreme - margin).max(default).min(limit.max(default)))
        } else {
            let extreme = self.observed_min;
            (extreme, (extreme + margin).min(default).max(limit.min(default)))
        };

        match reference {
            Position::Up => profile.up_threshold = refined,
            _ => profile.down_threshold = refined,
        }
        profile.source = CalibrationSource::Observed;
        profile.accepted_samples = self.accepted;
        profile.observed_extreme = Some(extreme);
        profile.anchors = self.anchors.anchors();

        log_info!(
            "{} calibrated from {} frames: extreme {:.1}°, up={:.1} down={:.1}",
            self.kind,
            self.accepted,
            extreme,
            profile.up_threshold,
            profile.down_threshold
        );

        profile
    }
}

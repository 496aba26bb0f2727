use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::exercise::{ExerciseKind, MetricDirection};
use crate::pose::{IngestOptions, YAxis, DEFAULT_VISIBILITY_THRESHOLD};

/// Tunable parameters for a grading session.
///
/// Loaded from camelCase JSON; any field left out takes its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GradingConfig {
    /// Joint samples below this confidence are treated as absent.
    pub visibility_threshold: f64,

    /// Weight of the newest frame in the running form score (EMA factor).
    pub form_smoothing: f64,

    /// Holding one position longer than this raises the pausing fault.
    pub pause_threshold_ms: u64,

    /// Consecutive frames a position must hold before the rep phase moves.
    pub stability_frames: u32,

    /// Shortest time between two counted reps. Faster completions are dropped.
    pub min_rep_duration_ms: u64,

    /// Vertical axis convention of the host's pose model.
    pub y_axis: YAxis,

    /// Feed landmark depth into angle computations.
    pub use_depth: bool,

    pub calibration: CalibrationConfig,
    pub pushup: PushupConfig,
    pub situp: SitupConfig,
    pub pullup: PullupConfig,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            form_smoothing: 0.5,
            pause_threshold_ms: 2_000,
            stability_frames: 3,
            min_rep_duration_ms: 500,
            y_axis: YAxis::Down,
            use_depth: false,
            calibration: CalibrationConfig::default(),
            pushup: PushupConfig::default(),
            situp: SitupConfig::default(),
            pullup: PullupConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalibrationConfig {
    /// Accepted reference-posture frames needed to finish calibration.
    pub window_size: usize,

    /// Give up and fall back to defaults after this many frames.
    pub max_frames: usize,

    /// Degrees subtracted from (or added to) the observed extreme.
    pub margin: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            max_frames: 30,
            margin: 10.0,
        }
    }
}

/// Hysteresis band for the primary metric, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseThresholds {
    /// Crossing this value (in the exercise's "up" direction) classifies Up.
    pub up: f64,

    /// Crossing this value (in the "down" direction) classifies Down.
    pub down: f64,

    /// Calibration never moves the reference-side threshold past this value.
    pub reference_limit: f64,

    /// Calibration samples outside `[reference_min, reference_max]` are
    /// not the reference posture and are ignored.
    pub reference_min: f64,
    pub reference_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PushupConfig {
    pub thresholds: PhaseThresholds,
    /// Shoulder-hip-ankle angle below which the body line is broken.
    pub body_line_min_angle: f64,
    /// Elbow-to-shoulder distance relative to shoulder width.
    pub elbow_flare_ratio: f64,
    /// Wrist span relative to shoulder width.
    pub hand_spacing_ratio: f64,
    pub shoulder_level_tolerance: f64,
    pub symmetry_tolerance: f64,
}

impl Default for PushupConfig {
    fn default() -> Self {
        Self {
            thresholds: PhaseThresholds {
                up: 150.0,
                down: 90.0,
                reference_limit: 165.0,
                reference_min: 140.0,
                reference_max: 180.0,
            },
            body_line_min_angle: 160.0,
            elbow_flare_ratio: 1.5,
            hand_spacing_ratio: 2.0,
            shoulder_level_tolerance: 0.10,
            symmetry_tolerance: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SitupConfig {
    pub thresholds: PhaseThresholds,
    pub max_knee_angle: f64,
    pub hand_to_head_max_distance: f64,
    pub hip_lift_tolerance: f64,
}

impl Default for SitupConfig {
    fn default() -> Self {
        Self {
            thresholds: PhaseThresholds {
                up: 80.0,
                down: 40.0,
                reference_limit: 15.0,
                reference_min: 0.0,
                reference_max: 40.0,
            },
            max_knee_angle: 120.0,
            hand_to_head_max_distance: 0.15,
            hip_lift_tolerance: 0.03,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PullupConfig {
    pub thresholds: PhaseThresholds,
    /// How far the nose must rise above the hands at the top.
    pub chin_clearance: f64,
    pub swing_tolerance: f64,
    pub kip_tolerance: f64,
    pub symmetry_tolerance: f64,
}

impl Default for PullupConfig {
    fn default() -> Self {
        Self {
            thresholds: PhaseThresholds {
                up: 90.0,
                down: 150.0,
                reference_limit: 165.0,
                reference_min: 140.0,
                reference_max: 180.0,
            },
            chin_clearance: 0.02,
            swing_tolerance: 0.07,
            kip_tolerance: 20.0,
            symmetry_tolerance: 25.0,
        }
    }
}

impl GradingConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read grading config from {}", path.display()))?;
        let config: GradingConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse grading config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write grading config to {}", path.display()))
    }

    pub fn thresholds(&self, kind: ExerciseKind) -> &PhaseThresholds {
        match kind {
            ExerciseKind::Pushup => &self.pushup.thresholds,
            ExerciseKind::Situp => &self.situp.thresholds,
            ExerciseKind::Pullup => &self.pullup.thresholds,
        }
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            y_axis: self.y_axis,
            use_depth: self.use_depth,
            visibility_threshold: self.visibility_threshold,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.visibility_threshold) {
            bail!("visibilityThreshold must be within [0, 1], got {}", self.visibility_threshold);
        }
        if !(self.form_smoothing > 0.0 && self.form_smoothing <= 1.0) {
            bail!("formSmoothing must be within (0, 1], got {}", self.form_smoothing);
        }
        if self.stability_frames == 0 {
            bail!("stabilityFrames must be at least 1");
        }
        if self.calibration.window_size == 0 {
            bail!("calibration.windowSize must be greater than zero");
        }
        if self.calibration.max_frames < self.calibration.window_size {
            bail!(
                "calibration.maxFrames ({}) must be at least windowSize ({})",
                self.calibration.max_frames,
                self.calibration.window_size
            );
        }
        if self.calibration.margin < 0.0 {
            bail!("calibration.margin must not be negative");
        }

        for kind in ExerciseKind::ALL {
            let t = self.thresholds(kind);
            let band_ok = match kind.direction() {
                MetricDirection::HigherIsUp => t.up > t.down,
                MetricDirection::LowerIsUp => t.up < t.down,
            };
            if !band_ok {
                bail!(
                    "{kind}: up threshold {} and down threshold {} leave no hysteresis band",
                    t.up,
                    t.down
                );
            }
            if t.reference_min > t.reference_max {
                bail!("{kind}: referenceMin exceeds referenceMax");
            }
        }

        Ok(())
    }
}

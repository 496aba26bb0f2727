use std::borrow::Cow;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::{self, Point};
use crate::pose::joint::{Joint, JointPair};

/// Samples below this confidence are treated as absent.
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSample {
    pub position: Point,
    pub confidence: f64,
}

/// Vertical axis convention of the upstream pose model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum YAxis {
    /// `y` grows toward the bottom of the image (MediaPipe). Used as is.
    #[default]
    Down,
    /// `y` grows toward the top of the image (Apple Vision). Flipped on ingest.
    Up,
}

/// Raw landmark as emitted by a pose model, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    /// Models that do not report visibility are taken as fully confident.
    #[serde(default)]
    pub visibility: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOptions {
    pub y_axis: YAxis,
    pub use_depth: bool,
    pub visibility_threshold: f64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            y_axis: YAxis::Down,
            use_depth: false,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
        }
    }
}

/// One analyzed video frame: joint samples keyed by landmark.
///
/// Immutable once built. Every accessor hides samples whose confidence is
/// below the frame's visibility threshold, so consumers never see them.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseFrame {
    timestamp: DateTime<Utc>,
    samples: HashMap<Joint, JointSample>,
    visibility_threshold: f64,
}

impl PoseFrame {
    pub fn builder(timestamp: DateTime<Utc>) -> PoseFrameBuilder {
        PoseFrameBuilder {
            frame: PoseFrame {
                timestamp,
                samples: HashMap::new(),
                visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            },
        }
    }

    /// Build a frame from a positional landmark list (index = `Joint` index).
    /// Extra landmarks beyond the known vocabulary are dropped.
    pub fn from_landmarks(
        landmarks: &[Landmark],
        timestamp: DateTime<Utc>,
        options: &IngestOptions,
    ) -> PoseFrame {
        let mut builder =
            PoseFrame::builder(timestamp).visibility_threshold(options.visibility_threshold);

        for (index, landmark) in landmarks.iter().enumerate() {
            let Some(joint) = Joint::from_index(index) else {
                break;
            };
            let y = match options.y_axis {
                YAxis::Down => landmark.y,
                YAxis::Up => 1.0 - landmark.y,
            };
            let z = if options.use_depth { landmark.z } else { 0.0 };
            builder = builder.sample(
                joint,
                Point::with_depth(landmark.x, y, z),
                landmark.visibility.unwrap_or(1.0),
            );
        }

        builder.build()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn visibility_threshold(&self) -> f64 {
        self.visibility_threshold
    }

    /// This frame seen through a different visibility threshold. Borrows
    /// when the threshold already matches.
    pub fn with_visibility_threshold(&self, threshold: f64) -> Cow<'_, PoseFrame> {
        if self.visibility_threshold == threshold {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(PoseFrame {
                visibility_threshold: threshold,
                ..self.clone()
            })
        }
    }

    /// The sample for `joint`, or `None` when missing or below threshold.
    pub fn sample(&self, joint: Joint) -> Option<&JointSample> {
        self.samples
            .get(&joint)
            .filter(|s| s.confidence >= self.visibility_threshold)
    }

    pub fn point(&self, joint: Joint) -> Option<Point> {
        self.sample(joint).map(|s| s.position)
    }

    pub fn is_visible(&self, joint: Joint) -> bool {
        self.sample(joint).is_some()
    }

    pub fn all_visible(&self, joints: &[Joint]) -> bool {
        joints.iter().all(|j| self.is_visible(*j))
    }

    pub fn angle(&self, a: Joint, b: Joint, c: Joint) -> Option<f64> {
        geometry::angle(self.point(a)?, self.point(b)?, self.point(c)?)
    }

    pub fn distance(&self, a: Joint, b: Joint) -> Option<f64> {
        Some(geometry::distance(self.point(a)?, self.point(b)?))
    }

    /// Midpoint of a left/right pair. Falls back to whichever side is visible.
    pub fn center(&self, pair: JointPair) -> Option<Point> {
        match (self.point(pair.left), self.point(pair.right)) {
            (Some(l), Some(r)) => Some(geometry::midpoint(l, r)),
            (Some(p), None) | (None, Some(p)) => Some(p),
            (None, None) => None,
        }
    }

    /// Angle at `b` computed on each body side and averaged over the sides
    /// where all three joints are visible.
    pub fn bilateral_angle(&self, a: JointPair, b: JointPair, c: JointPair) -> Option<f64> {
        let left = self.angle(a.left, b.left, c.left);
        let right = self.angle(a.right, b.right, c.right);
        match (left, right) {
            (Some(l), Some(r)) => Some((l + r) / 2.0),
            (Some(v), None) | (None, Some(v)) => Some(v),
            (None, None) => None,
        }
    }

    /// Both per-side angles, only when both sides are visible.
    pub fn paired_angles(&self, a: JointPair, b: JointPair, c: JointPair) -> Option<(f64, f64)> {
        Some((
            self.angle(a.left, b.left, c.left)?,
            self.angle(a.right, b.right, c.right)?,
        ))
    }

    /// Mean raw confidence over `joints`; missing joints contribute zero.
    pub fn mean_confidence(&self, joints: &[Joint]) -> f64 {
        if joints.is_empty() {
            return 0.0;
        }
        let total: f64 = joints
            .iter()
            .map(|j| self.samples.get(j).map(|s| s.confidence).unwrap_or(0.0))
            .sum();
        total / joints.len() as f64
    }
}

pub struct PoseFrameBuilder {
    frame: PoseFrame,
}

impl PoseFrameBuilder {
    pub fn visibility_threshold(mut self, threshold: f64) -> Self {
        self.frame.visibility_threshold = threshold;
        self
    }

    pub fn sample(mut self, joint: Joint, position: Point, confidence: f64) -> Self {
        self.frame.samples.insert(
            joint,
            JointSample {
                position,
                confidence: confidence.clamp(0.0, 1.0),
            },
        );
        self
    }

    /// Shorthand for a fully confident 2D sample.
    pub fn joint(self, joint: Joint, x: f64, y: f64) -> Self {
        self.sample(joint, Point::new(x, y), 1.0)
    }

    pub fn build(self) -> PoseFrame {
        self.frame
    }
}

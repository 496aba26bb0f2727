#![allow(dead_code)]

use chrono::{DateTime, Utc};
use repgrade_lib::geometry::Point;
use repgrade_lib::pose::PoseFrameBuilder;
use std::sync::Arc;

use repgrade_lib::{
    AnalysisResult, ExerciseKind, GradingConfig, GradingEngine, Joint, PoseFrame, ScoreTable,
};

pub const FRAME_INTERVAL_MS: i64 = 100;

/// Elbow sweep for one push-up or pull-up cycle, starting and ending extended.
/// Each extreme is held long enough to pass the default stability filter.
pub const ARM_CYCLE: [f64; 15] = [
    170.0, 170.0, 170.0, 145.0, 120.0, 95.0, 80.0, 80.0, 80.0, 95.0, 120.0, 145.0, 170.0, 170.0,
    170.0,
];

/// Torso sweep for one sit-up cycle, starting and ending flat on the back.
pub const TORSO_CYCLE: [f64; 15] = [
    5.0, 5.0, 5.0, 25.0, 45.0, 65.0, 85.0, 85.0, 85.0, 65.0, 45.0, 25.0, 5.0, 5.0, 5.0,
];

/// Index just past the held middle extreme of a cycle.
pub const TURN_END: usize = 9;

pub fn at(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_700_000_000_000 + ms).unwrap()
}

fn both(builder: PoseFrameBuilder, left: Joint, right: Joint, p: Point) -> PoseFrameBuilder {
    builder.sample(left, p, 1.0).sample(right, p, 1.0)
}

/// Side-view push-up with both body sides overlapping. `hip_drop` moves the
/// hips below the shoulder-ankle line.
pub fn pushup_frame(ms: i64, elbow_deg: f64, hip_drop: f64) -> PoseFrame {
    let rad = elbow_deg.to_radians();
    let shoulder = Point::new(0.3, 0.5);
    let elbow = Point::new(0.3, 0.6);
    let wrist = Point::new(0.3 + 0.1 * rad.sin(), 0.6 - 0.1 * rad.cos());

    let mut b = PoseFrame::builder(at(ms));
    b = both(b, Joint::LeftShoulder, Joint::RightShoulder, shoulder);
    b = both(b, Joint::LeftElbow, Joint::RightElbow, elbow);
    b = both(b, Joint::LeftWrist, Joint::RightWrist, wrist);
    b = both(b, Joint::LeftHip, Joint::RightHip, Point::new(0.55, 0.53 + hip_drop));
    b = both(b, Joint::LeftAnkle, Joint::RightAnkle, Point::new(0.8, 0.56));
    b.build()
}

/// Sit-up seen from the side: hips fixed, torso raised `torso_deg` above the floor.
pub fn situp_frame(ms: i64, torso_deg: f64) -> PoseFrame {
    let rad = torso_deg.to_radians();
    let hip = Point::new(0.5, 0.8);
    let along = |len: f64| Point::new(hip.x - len * rad.cos(), hip.y - len * rad.sin());
    let head = along(0.33);

    let mut b = PoseFrame::builder(at(ms));
    b = both(b, Joint::LeftHip, Joint::RightHip, hip);
    b = both(b, Joint::LeftShoulder, Joint::RightShoulder, along(0.25));
    b = both(b, Joint::LeftEar, Joint::RightEar, head);
    b = both(b, Joint::LeftWrist, Joint::RightWrist, Point::new(head.x + 0.02, head.y + 0.01));
    b = both(b, Joint::LeftKnee, Joint::RightKnee, Point::new(0.65, 0.6));
    b = both(b, Joint::LeftAnkle, Joint::RightAnkle, Point::new(0.8, 0.8));
    b.build()
}

/// Front-view pull-up. The nose clears the hands whenever the elbows are
/// bent to 90° or less.
pub fn pullup_frame(ms: i64, elbow_deg: f64) -> PoseFrame {
    let rad = elbow_deg.to_radians();
    let mut b = PoseFrame::builder(at(ms));

    let mut wrist_y = 0.0;
    for (shoulder, elbow, wrist, x, side) in [
        (Joint::LeftShoulder, Joint::LeftElbow, Joint::LeftWrist, 0.4, -1.0),
        (Joint::RightShoulder, Joint::RightElbow, Joint::RightWrist, 0.6, 1.0),
    ] {
        let wrist_point = Point::new(x + side * 0.1 * rad.sin(), 0.2 + 0.1 * rad.cos());
        wrist_y = wrist_point.y;
        b = b
            .joint(shoulder, x, 0.3)
            .joint(elbow, x, 0.2)
            .sample(wrist, wrist_point, 1.0);
    }

    let nose_y = if elbow_deg <= 90.0 { wrist_y - 0.05 } else { 0.25 };
    b.joint(Joint::Nose, 0.5, nose_y)
        .joint(Joint::LeftHip, 0.45, 0.7)
        .joint(Joint::RightHip, 0.55, 0.7)
        .joint(Joint::LeftKnee, 0.45, 0.84)
        .joint(Joint::RightKnee, 0.55, 0.84)
        .joint(Joint::LeftAnkle, 0.45, 0.98)
        .joint(Joint::RightAnkle, 0.55, 0.98)
        .build()
}

/// Frame generator for an exercise's primary metric.
pub fn frame_for(kind: ExerciseKind, ms: i64, metric: f64) -> PoseFrame {
    match kind {
        ExerciseKind::Pushup => pushup_frame(ms, metric, 0.0),
        ExerciseKind::Situp => situp_frame(ms, metric),
        ExerciseKind::Pullup => pullup_frame(ms, metric),
    }
}

pub fn reference_metric(kind: ExerciseKind) -> f64 {
    match kind {
        ExerciseKind::Pushup | ExerciseKind::Pullup => 170.0,
        ExerciseKind::Situp => 5.0,
    }
}

pub fn cycle(kind: ExerciseKind) -> &'static [f64] {
    match kind {
        ExerciseKind::Pushup | ExerciseKind::Pullup => &ARM_CYCLE,
        ExerciseKind::Situp => &TORSO_CYCLE,
    }
}

/// Drives a started engine with a clock that advances one frame per call.
pub struct Driver {
    pub engine: GradingEngine,
    pub clock_ms: i64,
}

impl Driver {
    pub fn started(kind: ExerciseKind) -> Self {
        Self::with_config(kind, GradingConfig::default())
    }

    pub fn with_config(kind: ExerciseKind, config: GradingConfig) -> Self {
        let table = Arc::new(ScoreTable::builtin().unwrap());
        let mut engine = GradingEngine::new(kind, config, table);
        engine.start().unwrap();
        Self { engine, clock_ms: 0 }
    }

    pub fn feed(&mut self, frame_at: impl Fn(i64) -> PoseFrame) -> AnalysisResult {
        let frame = frame_at(self.clock_ms);
        self.clock_ms += FRAME_INTERVAL_MS;
        self.engine.process_frame(&frame).unwrap()
    }

    pub fn metric(&mut self, metric: f64) -> AnalysisResult {
        let kind = self.engine.kind();
        self.feed(|ms| frame_for(kind, ms, metric))
    }

    pub fn calibrate(&mut self) {
        let reference = reference_metric(self.engine.kind());
        for _ in 0..self.engine.config().calibration.window_size {
            self.metric(reference);
        }
    }

    pub fn cycles(&mut self, n: usize) -> Vec<AnalysisResult> {
        let kind = self.engine.kind();
        let mut results = Vec::new();
        for _ in 0..n {
            for metric in cycle(kind) {
                results.push(self.metric(*metric));
            }
        }
        results
    }
}

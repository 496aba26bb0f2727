//! Exercise repetition grading from body-pose landmarks.
//!
//! A host feeds one [`PoseFrame`] per analyzed video frame into a
//! [`GradingEngine`] and gets back an [`AnalysisResult`] with the rep count,
//! form score and coaching feedback. The engine is synchronous and owns no
//! threads; sessions are independent values.

pub mod calibration;
pub mod config;
pub mod counting;
pub mod engine;
pub mod exercise;
pub mod form;
pub mod geometry;
pub mod pose;
pub mod scoring;
mod utils;

pub use calibration::{CalibrationProfile, CalibrationSource};
pub use config::GradingConfig;
pub use engine::{
    AnalysisResult, EngineError, ExerciseState, FormIssue, FrameState, GradingEngine,
    SessionStatus, SessionSummary,
};
pub use exercise::ExerciseKind;
pub use form::FaultKind;
pub use pose::{IngestOptions, Joint, Landmark, PoseFrame, YAxis};
pub use scoring::{Gender, ScoreEvent, ScoreOutcome, ScoreTable, ScoreWarning};

/// Install `env_logger` for hosts that do not bring their own logger.
/// Reads `RUST_LOG`; defaults to info. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}

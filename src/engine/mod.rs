pub mod controller;
pub mod error;
pub mod state;

pub use controller::GradingEngine;
pub use error::EngineError;
pub use state::{
    AnalysisResult, ExerciseState, FormIssue, FrameState, SessionStatus, SessionSummary,
};

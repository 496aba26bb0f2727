use thiserror::Error;

/// Host misuse of a grading session. Data conditions such as missing joints
/// are never reported through this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("session has not been started")]
    NotStarted,
    #[error("session is finished; reset or start a new attempt")]
    SessionFinished,
    #[error("session is already active")]
    AlreadyActive,
    #[error("unknown exercise '{0}'")]
    UnknownExercise(String),
}

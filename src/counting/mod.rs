pub mod machine;
pub mod streak;

pub use machine::{transition, RepPhase, Transition};
pub use streak::PositionStreak;

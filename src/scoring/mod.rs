pub mod converter;
pub mod table;

pub use converter::{ScoreError, ScoreOutcome, ScoreWarning};
pub use table::{Gender, ScoreBracket, ScoreEvent, ScoreTable};

pub mod pullup;
pub mod pushup;
pub mod rules;
pub mod score;
pub mod situp;

pub use rules::{evaluate, rules_for, FaultKind, FormEvaluation, FormRule, RuleContext};
pub use score::FormScore;

use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationProfile;
use crate::config::GradingConfig;
use crate::exercise::{ExerciseKind, Position};
use crate::pose::PoseFrame;

/// Identifier of a form fault, reported alongside its coaching message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FaultKind {
    HipsSagging,
    HipsPiked,
    ElbowsFlared,
    HandsTooWide,
    ShouldersUneven,
    ArmsUneven,
    Pausing,
    KneesTooStraight,
    HandsOffHead,
    HipsLifting,
    ChinBelowBar,
    Swinging,
    Kipping,
}

/// Everything a rule may look at for the current frame.
pub struct RuleContext<'a> {
    pub frame: &'a PoseFrame,
    pub profile: &'a CalibrationProfile,
    pub config: &'a GradingConfig,
    /// Position class of this frame; `None` when the primary metric is missing.
    pub position: Option<Position>,
    /// Time spent in the current latched phase.
    pub held_ms: Option<i64>,
}

/// Returns `Some(true)` when the fault is present, `Some(false)` when the
/// form is fine, `None` when the joints it needs are not visible.
pub type RuleCheck = fn(&RuleContext) -> Option<bool>;

#[derive(Clone, Copy)]
pub struct FormRule {
    pub fault: FaultKind,
    pub penalty: u32,
    pub message: &'static str,
    pub check: RuleCheck,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormEvaluation {
    pub faults: Vec<FaultKind>,
    pub messages: Vec<String>,
    /// Largest single penalty among triggered rules.
    pub penalty: u32,
    /// Rules whose joints were visible this frame.
    pub evaluated: usize,
}

impl FormEvaluation {
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }

    pub fn frame_score(&self) -> f64 {
        100.0 - f64::from(self.penalty.min(100))
    }
}

pub fn rules_for(kind: ExerciseKind) -> &'static [FormRule] {
    match kind {
        ExerciseKind::Pushup => crate::form::pushup::RULES,
        ExerciseKind::Situp => crate::form::situp::RULES,
        ExerciseKind::Pullup => crate::form::pullup::RULES,
    }
}

/// Run every rule in order. Penalties do not add up: the worst one wins.
pub fn evaluate(rules: &[FormRule], ctx: &RuleContext) -> FormEvaluation {
    let mut evaluation = FormEvaluation::default();

    for rule in rules {
        let Some(triggered) = (rule.check)(ctx) else {
            continue;
        };
        evaluation.evaluated += 1;
        if triggered {
            evaluation.faults.push(rule.fault);
            evaluation.messages.push(rule.message.to_string());
            evaluation.penalty = evaluation.penalty.max(rule.penalty);
        }
    }

    evaluation
}

/// Shared rule: the user stayed in one phase for too long.
pub fn check_pausing(ctx: &RuleContext) -> Option<bool> {
    let held = ctx.held_ms?;
    Some(held > i64::try_from(ctx.config.pause_threshold_ms).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationProfile;
    use chrono::Utc;

    fn always(_: &RuleContext) -> Option<bool> {
        Some(true)
    }

    fn never(_: &RuleContext) -> Option<bool> {
        Some(false)
    }

    fn blind(_: &RuleContext) -> Option<bool> {
        None
    }

    const RULES: &[FormRule] = &[
        FormRule { fault: FaultKind::HipsSagging, penalty: 20, message: "first", check: always },
        FormRule { fault: FaultKind::ArmsUneven, penalty: 10, message: "second", check: always },
        FormRule { fault: FaultKind::Pausing, penalty: 50, message: "skipped", check: blind },
        FormRule { fault: FaultKind::Kipping, penalty: 40, message: "clean", check: never },
    ];

    #[test]
    fn worst_penalty_wins_and_messages_keep_order() {
        let config = GradingConfig::default();
        let profile = CalibrationProfile::defaults(ExerciseKind::Pushup, config.thresholds(ExerciseKind::Pushup));
        let frame = PoseFrame::builder(Utc::now()).build();
        let ctx = RuleContext {
            frame: &frame,
            profile: &profile,
            config: &config,
            position: None,
            held_ms: None,
        };

        let eval = evaluate(RULES, &ctx);
        assert_eq!(eval.messages, vec!["first".to_string(), "second".to_string()]);
        assert_eq!(eval.faults, vec![FaultKind::HipsSagging, FaultKind::ArmsUneven]);
        assert_eq!(eval.penalty, 20);
        assert_eq!(eval.evaluated, 3);
        assert_eq!(eval.frame_score(), 80.0);
    }

    #[test]
    fn huge_pause_threshold_never_flags_a_hold() {
        let mut config = GradingConfig::default();
        config.pause_threshold_ms = u64::MAX;
        let profile = CalibrationProfile::defaults(ExerciseKind::Pushup, config.thresholds(ExerciseKind::Pushup));
        let frame = PoseFrame::builder(Utc::now()).build();
        let mut ctx = RuleContext {
            frame: &frame,
            profile: &profile,
            config: &config,
            position: Some(Position::Up),
            held_ms: Some(i64::MAX),
        };
        assert_eq!(check_pausing(&ctx), Some(false));

        ctx.held_ms = Some(0);
        assert_eq!(check_pausing(&ctx), Some(false));
    }
}

use crate::form::rules::{check_pausing, FaultKind, FormRule, RuleContext};
use crate::geometry;
use crate::pose::joint::{ANKLES, EARS, HIPS, KNEES, WRISTS};

pub const RULES: &[FormRule] = &[
    FormRule {
        fault: FaultKind::KneesTooStraight,
        penalty: 15,
        message: "Bend your knees to about 90 degrees.",
        check: knees_too_straight,
    },
    FormRule {
        fault: FaultKind::HandsOffHead,
        penalty: 10,
        message: "Keep your hands behind your head.",
        check: hands_off_head,
    },
    FormRule {
        fault: FaultKind::HipsLifting,
        penalty: 15,
        message: "Keep your hips on the ground.",
        check: hips_lifting,
    },
    FormRule {
        fault: FaultKind::Pausing,
        penalty: 10,
        message: "Keep moving, no resting in position.",
        check: check_pausing,
    },
];

fn knees_too_straight(ctx: &RuleContext) -> Option<bool> {
    let knee = ctx.frame.bilateral_angle(HIPS, KNEES, ANKLES)?;
    Some(knee > ctx.config.situp.max_knee_angle)
}

/// Worst wrist-to-nearest-ear gap over the visible wrists.
fn hands_off_head(ctx: &RuleContext) -> Option<bool> {
    let ears: Vec<_> = [EARS.left, EARS.right]
        .into_iter()
        .filter_map(|ear| ctx.frame.point(ear))
        .collect();
    if ears.is_empty() {
        return None;
    }

    let worst = [WRISTS.left, WRISTS.right]
        .into_iter()
        .filter_map(|wrist| ctx.frame.point(wrist))
        .map(|wrist| {
            ears.iter()
                .map(|ear| geometry::distance(wrist, *ear))
                .fold(f64::INFINITY, f64::min)
        })
        .reduce(f64::max)?;

    Some(worst > ctx.config.situp.hand_to_head_max_distance)
}

fn hips_lifting(ctx: &RuleContext) -> Option<bool> {
    let anchor = ctx.profile.anchors.hip_y?;
    let hip = ctx.frame.center(HIPS)?;
    Some((hip.y - anchor).abs() > ctx.config.situp.hip_lift_tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationProfile;
    use crate::config::GradingConfig;
    use crate::exercise::ExerciseKind;
    use crate::form::rules::evaluate;
    use crate::pose::{Joint, PoseFrame};
    use chrono::Utc;

    fn faults(frame: &PoseFrame, hip_anchor: Option<f64>) -> Vec<FaultKind> {
        let config = GradingConfig::default();
        let mut profile = CalibrationProfile::defaults(ExerciseKind::Situp, config.thresholds(ExerciseKind::Situp));
        profile.anchors.hip_y = hip_anchor;
        let ctx = RuleContext {
            frame,
            profile: &profile,
            config: &config,
            position: None,
            held_ms: None,
        };
        evaluate(RULES, &ctx).faults
    }

    fn lying(knee: (f64, f64), wrist: (f64, f64), hip_y: f64) -> PoseFrame {
        PoseFrame::builder(Utc::now())
            .joint(Joint::LeftHip, 0.5, hip_y)
            .joint(Joint::LeftKnee, knee.0, knee.1)
            .joint(Joint::LeftAnkle, 0.8, 0.8)
            .joint(Joint::LeftEar, 0.2, 0.75)
            .joint(Joint::LeftWrist, wrist.0, wrist.1)
            .build()
    }

    #[test]
    fn bent_knees_and_hands_on_head_pass() {
        let frame = lying((0.65, 0.6), (0.22, 0.74), 0.8);
        assert!(faults(&frame, Some(0.8)).is_empty());
    }

    #[test]
    fn straight_legs_are_flagged() {
        let frame = lying((0.65, 0.8), (0.22, 0.74), 0.8);
        assert_eq!(faults(&frame, Some(0.8)), vec![FaultKind::KneesTooStraight]);
    }

    #[test]
    fn hands_away_from_head_are_flagged() {
        let frame = lying((0.65, 0.6), (0.5, 0.5), 0.8);
        assert_eq!(faults(&frame, Some(0.8)), vec![FaultKind::HandsOffHead]);
    }

    #[test]
    fn hip_lift_needs_an_anchor() {
        let frame = lying((0.65, 0.6), (0.22, 0.74), 0.72);
        assert!(faults(&frame, None).is_empty());
        assert_eq!(faults(&frame, Some(0.8)), vec![FaultKind::HipsLifting]);
    }
}

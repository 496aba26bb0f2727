use crate::exercise::Position;
use crate::form::rules::{check_pausing, FaultKind, FormRule, RuleContext};
use crate::pose::joint::{ANKLES, ELBOWS, HIPS, KNEES, SHOULDERS, WRISTS};
use crate::pose::Joint;

pub const RULES: &[FormRule] = &[
    FormRule {
        fault: FaultKind::ChinBelowBar,
        penalty: 20,
        message: "Pull higher, chin over the bar.",
        check: chin_below_bar,
    },
    FormRule {
        fault: FaultKind::Swinging,
        penalty: 15,
        message: "Control the swing, keep your body still.",
        check: swinging,
    },
    FormRule {
        fault: FaultKind::Kipping,
        penalty: 15,
        message: "No kipping, keep your legs still.",
        check: kipping,
    },
    FormRule {
        fault: FaultKind::ArmsUneven,
        penalty: 10,
        message: "Pull evenly with both arms.",
        check: arms_uneven,
    },
    FormRule {
        fault: FaultKind::Pausing,
        penalty: 10,
        message: "Keep moving, no resting in position.",
        check: check_pausing,
    },
];

/// Only judged at the top of the pull: the nose must clear the hands.
fn chin_below_bar(ctx: &RuleContext) -> Option<bool> {
    if ctx.position != Some(Position::Up) {
        return None;
    }
    let nose = ctx.frame.point(Joint::Nose)?;
    let bar = ctx.frame.center(WRISTS)?;
    Some(nose.y > bar.y - ctx.config.pullup.chin_clearance)
}

fn swinging(ctx: &RuleContext) -> Option<bool> {
    let anchor = ctx.profile.anchors.hip_x?;
    let hip = ctx.frame.center(HIPS)?;
    Some((hip.x - anchor).abs() > ctx.config.pullup.swing_tolerance)
}

fn kipping(ctx: &RuleContext) -> Option<bool> {
    let anchor = ctx.profile.anchors.knee_angle?;
    let knee = ctx.frame.bilateral_angle(HIPS, KNEES, ANKLES)?;
    Some((knee - anchor).abs() > ctx.config.pullup.kip_tolerance)
}

fn arms_uneven(ctx: &RuleContext) -> Option<bool> {
    let (left, right) = ctx.frame.paired_angles(SHOULDERS, ELBOWS, WRISTS)?;
    Some((left - right).abs() > ctx.config.pullup.symmetry_tolerance)
}

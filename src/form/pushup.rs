use crate::form::rules::{check_pausing, FaultKind, FormRule, RuleContext};
use crate::geometry;
use crate::pose::joint::{ANKLES, ELBOWS, HIPS, SHOULDERS, WRISTS};

/// Below this shoulder span the camera is looking from the side and the
/// frontal-view spacing rules cannot be judged.
const MIN_FRONTAL_SHOULDER_WIDTH: f64 = 0.05;

pub const RULES: &[FormRule] = &[
    FormRule {
        fault: FaultKind::HipsSagging,
        penalty: 20,
        message: "Keep your body straight, hips are sagging.",
        check: hips_sagging,
    },
    FormRule {
        fault: FaultKind::HipsPiked,
        penalty: 20,
        message: "Lower your hips, they are too high.",
        check: hips_piked,
    },
    FormRule {
        fault: FaultKind::ElbowsFlared,
        penalty: 15,
        message: "Keep elbows closer to body.",
        check: elbows_flared,
    },
    FormRule {
        fault: FaultKind::HandsTooWide,
        penalty: 10,
        message: "Place your hands about shoulder-width apart.",
        check: hands_too_wide,
    },
    FormRule {
        fault: FaultKind::ShouldersUneven,
        penalty: 10,
        message: "Keep shoulders level.",
        check: shoulders_uneven,
    },
    FormRule {
        fault: FaultKind::ArmsUneven,
        penalty: 10,
        message: "Bend both arms evenly.",
        check: arms_uneven,
    },
    FormRule {
        fault: FaultKind::Pausing,
        penalty: 10,
        message: "Keep moving, no resting in position.",
        check: check_pausing,
    },
];

/// Shoulder-hip-ankle angle and the hip's offset below the shoulder-ankle line.
fn body_line(ctx: &RuleContext) -> Option<(f64, f64)> {
    let shoulder = ctx.frame.center(SHOULDERS)?;
    let hip = ctx.frame.center(HIPS)?;
    let ankle = ctx.frame.center(ANKLES)?;
    let angle = geometry::angle(shoulder, hip, ankle)?;
    Some((angle, geometry::offset_below_line(shoulder, ankle, hip)))
}

fn hips_sagging(ctx: &RuleContext) -> Option<bool> {
    let (angle, offset) = body_line(ctx)?;
    Some(angle < ctx.config.pushup.body_line_min_angle && offset > 0.0)
}

fn hips_piked(ctx: &RuleContext) -> Option<bool> {
    let (angle, offset) = body_line(ctx)?;
    Some(angle < ctx.config.pushup.body_line_min_angle && offset < 0.0)
}

fn frontal_shoulder_width(ctx: &RuleContext) -> Option<f64> {
    let width = ctx.frame.distance(SHOULDERS.left, SHOULDERS.right)?;
    (width >= MIN_FRONTAL_SHOULDER_WIDTH).then_some(width)
}

fn elbows_flared(ctx: &RuleContext) -> Option<bool> {
    let width = frontal_shoulder_width(ctx)?;
    let left = ctx.frame.distance(ELBOWS.left, SHOULDERS.left)?;
    let right = ctx.frame.distance(ELBOWS.right, SHOULDERS.right)?;
    Some((left + right) / 2.0 > width * ctx.config.pushup.elbow_flare_ratio)
}

fn hands_too_wide(ctx: &RuleContext) -> Option<bool> {
    let width = frontal_shoulder_width(ctx)?;
    let span = ctx.frame.distance(WRISTS.left, WRISTS.right)?;
    Some(span > width * ctx.config.pushup.hand_spacing_ratio)
}

fn shoulders_uneven(ctx: &RuleContext) -> Option<bool> {
    let left = ctx.frame.point(SHOULDERS.left)?;
    let right = ctx.frame.point(SHOULDERS.right)?;
    Some((left.y - right.y).abs() > ctx.config.pushup.shoulder_level_tolerance)
}

fn arms_uneven(ctx: &RuleContext) -> Option<bool> {
    let (left, right) = ctx.frame.paired_angles(SHOULDERS, ELBOWS, WRISTS)?;
    Some((left - right).abs() > ctx.config.pushup.symmetry_tolerance)
}

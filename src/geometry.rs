//! Pure geometry over normalized image coordinates.
//!
//! Coordinates are image-relative in `[0, 1]` with `y` growing downward.
//! `z` is optional depth; 2D sources leave it at zero.

use serde::{Deserialize, Serialize};

/// Vectors shorter than this are treated as degenerate (coincident joints).
const MIN_SEGMENT_LENGTH: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn with_depth(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn sub(self, other: Point) -> [f64; 3] {
        [self.x - other.x, self.y - other.y, self.z - other.z]
    }
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(v: [f64; 3]) -> f64 {
    dot(v, v).sqrt()
}

/// Angle at vertex `b` between the rays `b→a` and `b→c`, in degrees `[0, 180]`.
///
/// Uses `atan2(|cross|, dot)` rather than `acos` of the normalized dot
/// product, which stays well conditioned near 0° and 180°. Returns `None`
/// when either ray has zero length.
pub fn angle(a: Point, b: Point, c: Point) -> Option<f64> {
    let ba = a.sub(b);
    let bc = c.sub(b);
    if norm(ba) < MIN_SEGMENT_LENGTH || norm(bc) < MIN_SEGMENT_LENGTH {
        return None;
    }

    let radians = norm(cross(ba, bc)).atan2(dot(ba, bc));
    Some(radians.abs().to_degrees())
}

/// Euclidean distance.
pub fn distance(a: Point, b: Point) -> f64 {
    norm(b.sub(a))
}

pub fn midpoint(a: Point, b: Point) -> Point {
    Point {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
        z: (a.z + b.z) / 2.0,
    }
}

/// Inclination of the segment `from→to` above the horizontal image axis, in
/// degrees `[0, 90]`. A torso lying flat reads ~0°, an upright torso ~90°.
pub fn inclination(from: Point, to: Point) -> Option<f64> {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    if dx.hypot(dy) < MIN_SEGMENT_LENGTH {
        return None;
    }
    Some(dy.atan2(dx).to_degrees())
}

/// Signed vertical offset of `p` from the straight line through `a` and `c`,
/// measured at `p.x`. Positive means `p` lies below the line (larger `y`).
/// Falls back to the midpoint height when the line is vertical.
pub fn offset_below_line(a: Point, c: Point, p: Point) -> f64 {
    let dx = c.x - a.x;
    let line_y = if dx.abs() < MIN_SEGMENT_LENGTH {
        (a.y + c.y) / 2.0
    } else {
        a.y + (c.y - a.y) * (p.x - a.x) / dx
    };
    p.y - line_y
}

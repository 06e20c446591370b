//! Joint angle geometry

/// A 2D point in normalized frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Segments shorter than this are treated as collapsed
const MIN_SEGMENT: f32 = 1e-6;

/// Interior angle at vertex `b` formed by rays b→a and b→c, in degrees [0, 180]
///
/// Difference of the two rays' polar angles, reflex angles folded to `360 - angle`.
/// Never returns NaN for finite input: coincident points give 0.
pub fn angle_at(a: Point, b: Point, c: Point) -> f32 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let mut angle = radians.to_degrees().abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    if angle.is_finite() { angle } else { 0.0 }
}

/// Like [`angle_at`], but `None` when either ray has zero length
///
/// Detectors use this so that collapsed landmarks never feed a threshold compare.
pub fn joint_angle(a: Point, b: Point, c: Point) -> Option<f32> {
    let len_ba = (a.x - b.x).hypot(a.y - b.y);
    let len_bc = (c.x - b.x).hypot(c.y - b.y);

    // NaN lengths fail this check too
    if !(len_ba > MIN_SEGMENT && len_bc > MIN_SEGMENT) {
        return None;
    }

    Some(angle_at(a, b, c))
}

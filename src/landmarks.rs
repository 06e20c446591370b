//! Pose landmarks - adapting pose model output into named joints
//!
//! The pose model hands over an indexed list of 33 points. Everything past
//! this module works with [`PoseLandmarks`], where each joint the counter
//! cares about is a named optional field.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::exercises::MIN_VISIBILITY;
use crate::geometry::Point;

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const POSE_LANDMARK_COUNT: usize = 33;

pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// Values per landmark in a flat buffer: x, y, visibility
pub const FLAT_STRIDE: usize = 3;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single 2D landmark (normalized coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,          // 0-1 normalized to frame width
    pub y: f32,          // 0-1 normalized to frame height
    pub visibility: f32, // 0-1 confidence
}

impl Landmark {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, visibility }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Confident enough to drive detection
    pub fn is_visible(&self) -> bool {
        self.visibility >= MIN_VISIBILITY
    }
}

/// Landmark as emitted by the pose model
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawLandmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default)]
    pub visibility: f32,
}

/// One pose model result. `poseLandmarks` is absent when nobody is in frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoseResults {
    #[serde(rename = "poseLandmarks", default)]
    pub pose_landmarks: Option<Vec<RawLandmark>>,
}

impl PoseResults {
    /// Adapt into named joints; `None` when no body was detected
    pub fn landmarks(&self) -> Option<PoseLandmarks> {
        self.pose_landmarks.as_deref().map(PoseLandmarks::from_raw)
    }
}

/// The joints used by the counter, one optional field each
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoseLandmarks {
    pub left_shoulder: Option<Landmark>,
    pub right_shoulder: Option<Landmark>,
    pub left_elbow: Option<Landmark>,
    pub right_elbow: Option<Landmark>,
    pub left_wrist: Option<Landmark>,
    pub right_wrist: Option<Landmark>,
    pub left_hip: Option<Landmark>,
    pub right_hip: Option<Landmark>,
    pub left_knee: Option<Landmark>,
    pub right_knee: Option<Landmark>,
    pub left_ankle: Option<Landmark>,
    pub right_ankle: Option<Landmark>,
}

/// Validate a single point: finite coordinates, visibility clamped to [0, 1]
fn adapt(x: f32, y: f32, visibility: f32) -> Option<Landmark> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    let visibility = if visibility.is_finite() {
        visibility.clamp(0.0, 1.0)
    } else {
        0.0
    };
    Some(Landmark::new(x, y, visibility))
}

impl PoseLandmarks {
    /// Build from the model's indexed list. Short lists leave trailing joints empty.
    pub fn from_raw(raw: &[RawLandmark]) -> Self {
        let at = |index: usize| raw.get(index).and_then(|p| adapt(p.x, p.y, p.visibility));
        Self::from_lookup(at)
    }

    /// Build from a flat buffer of 99 values (33 landmarks × x, y, visibility)
    pub fn from_flat(data: &[f32]) -> Option<Self> {
        let expected = POSE_LANDMARK_COUNT * FLAT_STRIDE;
        if data.len() != expected {
            warn!(
                "Invalid landmark data length: {} (expected {})",
                data.len(),
                expected
            );
            return None;
        }

        let at = |index: usize| {
            let base = index * FLAT_STRIDE;
            adapt(data[base], data[base + 1], data[base + 2])
        };
        Some(Self::from_lookup(at))
    }

    fn from_lookup(at: impl Fn(usize) -> Option<Landmark>) -> Self {
        Self {
            left_shoulder: at(LEFT_SHOULDER),
            right_shoulder: at(RIGHT_SHOULDER),
            left_elbow: at(LEFT_ELBOW),
            right_elbow: at(RIGHT_ELBOW),
            left_wrist: at(LEFT_WRIST),
            right_wrist: at(RIGHT_WRIST),
            left_hip: at(LEFT_HIP),
            right_hip: at(RIGHT_HIP),
            left_knee: at(LEFT_KNEE),
            right_knee: at(RIGHT_KNEE),
            left_ankle: at(LEFT_ANKLE),
            right_ankle: at(RIGHT_ANKLE),
        }
    }

    /// Hip, knee, ankle of one side
    pub fn leg(&self, side: Side) -> JointTriple {
        match side {
            Side::Left => JointTriple::new(self.left_hip, self.left_knee, self.left_ankle),
            Side::Right => JointTriple::new(self.right_hip, self.right_knee, self.right_ankle),
        }
    }

    /// Shoulder, elbow, wrist of one side
    pub fn arm(&self, side: Side) -> JointTriple {
        match side {
            Side::Left => JointTriple::new(self.left_shoulder, self.left_elbow, self.left_wrist),
            Side::Right => {
                JointTriple::new(self.right_shoulder, self.right_elbow, self.right_wrist)
            }
        }
    }

    /// Mean shoulder height; `None` unless both shoulders are visible
    pub fn shoulder_y(&self) -> Option<f32> {
        midline_y(self.left_shoulder, self.right_shoulder)
    }

    /// Mean elbow height; `None` unless both elbows are visible
    pub fn elbow_y(&self) -> Option<f32> {
        midline_y(self.left_elbow, self.right_elbow)
    }
}

fn midline_y(left: Option<Landmark>, right: Option<Landmark>) -> Option<f32> {
    let (left, right) = (left?, right?);
    if !left.is_visible() || !right.is_visible() {
        return None;
    }
    Some((left.y + right.y) / 2.0)
}

// ============================================================================
// SIDE SELECTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Three joints of one limb, proximal to distal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointTriple {
    pub a: Option<Landmark>,
    pub b: Option<Landmark>,
    pub c: Option<Landmark>,
}

impl JointTriple {
    pub fn new(a: Option<Landmark>, b: Option<Landmark>, c: Option<Landmark>) -> Self {
        Self { a, b, c }
    }

    /// Sum of the three visibilities, absent joints count as 0
    pub fn score(&self) -> f32 {
        [self.a, self.b, self.c]
            .iter()
            .map(|l| l.map_or(0.0, |l| l.visibility))
            .sum()
    }

    /// All three joints, present and visible
    pub fn visible(&self) -> Option<(Landmark, Landmark, Landmark)> {
        let (a, b, c) = (self.a?, self.b?, self.c?);
        if a.is_visible() && b.is_visible() && c.is_visible() {
            Some((a, b, c))
        } else {
            None
        }
    }
}

/// Pick the limb with the strictly greater visibility score. Ties go right.
pub fn select_side(left: &JointTriple, right: &JointTriple) -> (Side, JointTriple) {
    if left.score() > right.score() {
        (Side::Left, *left)
    } else {
        (Side::Right, *right)
    }
}

/// Pick among the limbs whose joints all pass the visibility bar.
/// The score only decides between two usable limbs; `None` if neither is.
pub fn select_visible_side(
    left: &JointTriple,
    right: &JointTriple,
) -> Option<(Side, (Landmark, Landmark, Landmark))> {
    match (left.visible(), right.visible()) {
        (Some(_), Some(_)) => {
            let (side, chosen) = select_side(left, right);
            Some((side, chosen.visible()?))
        }
        (Some(joints), None) => Some((Side::Left, joints)),
        (None, Some(joints)) => Some((Side::Right, joints)),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(visibility: [f32; 3]) -> JointTriple {
        JointTriple::new(
            Some(Landmark::new(0.5, 0.2, visibility[0])),
            Some(Landmark::new(0.5, 0.5, visibility[1])),
            Some(Landmark::new(0.5, 0.8, visibility[2])),
        )
    }

    fn flat_frame() -> Vec<f32> {
        let mut data = vec![0.0; POSE_LANDMARK_COUNT * FLAT_STRIDE];
        for i in 0..POSE_LANDMARK_COUNT {
            data[i * 3] = i as f32 / 100.0;
            data[i * 3 + 1] = 0.5;
            data[i * 3 + 2] = 0.9;
        }
        data
    }

    #[test]
    fn test_select_higher_score_left() {
        let left = triple([0.4, 0.4, 0.4]); // 1.2
        let right = triple([0.3, 0.3, 0.3]); // 0.9
        let (side, chosen) = select_side(&left, &right);
        assert_eq!(side, Side::Left);
        assert_eq!(chosen, left);
    }

    #[test]
    fn test_select_tie_defaults_right() {
        let left = triple([0.5, 0.25, 0.25]);
        let right = triple([0.25, 0.5, 0.25]);
        let (side, chosen) = select_side(&left, &right);
        assert_eq!(side, Side::Right);
        assert_eq!(chosen, right);
    }

    #[test]
    fn test_visible_side_beats_higher_score() {
        // Left outscores right but its ankle is below the bar
        let left = triple([0.9, 0.9, 0.45]); // 2.25
        let right = triple([0.7, 0.7, 0.7]); // 2.1
        let (side, _) = select_visible_side(&left, &right).unwrap();
        assert_eq!(side, Side::Right);
    }

    #[test]
    fn test_visible_side_both_usable_uses_score() {
        let left = triple([0.9, 0.9, 0.9]);
        let right = triple([0.6, 0.6, 0.6]);
        assert_eq!(select_visible_side(&left, &right).unwrap().0, Side::Left);

        let tied = triple([0.8, 0.8, 0.8]);
        assert_eq!(select_visible_side(&tied, &tied).unwrap().0, Side::Right);
    }

    #[test]
    fn test_visible_side_none_usable() {
        let left = triple([0.9, 0.3, 0.9]);
        let mut right = triple([0.9, 0.9, 0.9]);
        right.b = None;
        assert!(select_visible_side(&left, &right).is_none());
    }

    #[test]
    fn test_missing_joint_scores_zero() {
        let mut left = triple([0.9, 0.9, 0.9]);
        left.c = None;
        assert!((left.score() - 1.8).abs() < 1e-6);
        assert!(left.visible().is_none());
    }

    #[test]
    fn test_visible_requires_threshold() {
        assert!(triple([0.9, 0.9, 0.9]).visible().is_some());
        assert!(triple([0.9, 0.4, 0.9]).visible().is_none());
    }

    #[test]
    fn test_from_flat_maps_indices() {
        let pose = PoseLandmarks::from_flat(&flat_frame()).unwrap();
        let knee = pose.left_knee.unwrap();
        assert!((knee.x - LEFT_KNEE as f32 / 100.0).abs() < 1e-6);
        let shoulder = pose.right_shoulder.unwrap();
        assert!((shoulder.x - RIGHT_SHOULDER as f32 / 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_flat_wrong_length() {
        assert!(PoseLandmarks::from_flat(&[0.0; 12]).is_none());
    }

    #[test]
    fn test_from_flat_non_finite_becomes_absent() {
        let mut data = flat_frame();
        data[LEFT_HIP * 3 + 1] = f32::NAN;
        let pose = PoseLandmarks::from_flat(&data).unwrap();
        assert!(pose.left_hip.is_none());
        assert!(pose.right_hip.is_some());
    }

    #[test]
    fn test_from_raw_short_list() {
        let raw = vec![RawLandmark { x: 0.5, y: 0.5, z: 0.0, visibility: 0.9 }; 20];
        let pose = PoseLandmarks::from_raw(&raw);
        assert!(pose.left_shoulder.is_some());
        assert!(pose.left_hip.is_none());
        assert!(pose.right_ankle.is_none());
    }

    #[test]
    fn test_visibility_clamped() {
        let raw = vec![RawLandmark { x: 0.5, y: 0.5, z: 0.0, visibility: 1.7 }; 33];
        let pose = PoseLandmarks::from_raw(&raw);
        assert_eq!(pose.left_knee.unwrap().visibility, 1.0);
    }

    #[test]
    fn test_pose_results_json() {
        let json = r#"{"poseLandmarks":[{"x":0.1,"y":0.2,"z":-0.3,"visibility":0.99}]}"#;
        let results: PoseResults = serde_json::from_str(json).unwrap();
        let pose = results.landmarks().unwrap();
        assert!(pose.left_shoulder.is_none());

        let empty: PoseResults = serde_json::from_str("{}").unwrap();
        assert!(empty.landmarks().is_none());
    }

    #[test]
    fn test_shoulder_y_needs_both_visible() {
        let mut pose = PoseLandmarks {
            left_shoulder: Some(Landmark::new(0.4, 0.30, 0.9)),
            right_shoulder: Some(Landmark::new(0.6, 0.40, 0.9)),
            ..Default::default()
        };
        assert!((pose.shoulder_y().unwrap() - 0.35).abs() < 1e-6);

        pose.right_shoulder = Some(Landmark::new(0.6, 0.40, 0.2));
        assert!(pose.shoulder_y().is_none());

        pose.right_shoulder = None;
        assert!(pose.shoulder_y().is_none());
    }
}

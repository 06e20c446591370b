//! Squat strategies: knee angle (full body) and shoulder height (upper body)

use super::{FrameContext, Reading, RepDetector, Zone};
use crate::exercises::{
    ExerciseVariant, KNEE_LOWERED_BELOW, KNEE_RAISED_ABOVE, SHOULDER_LOWERED_OFFSET,
    SHOULDER_RAISED_OFFSET,
};
use crate::geometry::joint_angle;
use crate::landmarks::{PoseLandmarks, Side, select_visible_side};

/// Knee angle of a usable leg, the better-visible one when both are
pub struct FullBodySquat;

impl FullBodySquat {
    fn zone(angle: f32) -> Zone {
        if angle < KNEE_LOWERED_BELOW {
            Zone::Lowered
        } else if angle > KNEE_RAISED_ABOVE {
            Zone::Raised
        } else {
            Zone::Band
        }
    }
}

impl RepDetector for FullBodySquat {
    fn variant(&self) -> ExerciseVariant {
        ExerciseVariant::SquatFullBody
    }

    fn classify(&self, pose: &PoseLandmarks, _ctx: &FrameContext) -> Option<Reading> {
        let (_, (hip, knee, ankle)) =
            select_visible_side(&pose.leg(Side::Left), &pose.leg(Side::Right))?;
        let angle = joint_angle(hip.point(), knee.point(), ankle.point())?;
        Some(Reading {
            value: angle,
            zone: Self::zone(angle),
        })
    }
}

/// Mean shoulder height against the calibrated standing baseline
pub struct UpperBodySquat;

impl UpperBodySquat {
    // y grows downward
    fn zone(y: f32, baseline: f32) -> Zone {
        if y > baseline + SHOULDER_LOWERED_OFFSET {
            Zone::Lowered
        } else if y < baseline + SHOULDER_RAISED_OFFSET {
            Zone::Raised
        } else {
            Zone::Band
        }
    }
}

impl RepDetector for UpperBodySquat {
    fn variant(&self) -> ExerciseVariant {
        ExerciseVariant::SquatUpperBody
    }

    fn classify(&self, pose: &PoseLandmarks, ctx: &FrameContext) -> Option<Reading> {
        let baseline = ctx.baseline?;
        let y = pose.shoulder_y()?;
        Some(Reading {
            value: y,
            zone: Self::zone(y, baseline),
        })
    }
}

//! Push-up strategy: shoulders dropping toward the elbow line

use super::{FrameContext, Reading, RepDetector, Zone};
use crate::exercises::{ExerciseVariant, PUSHUP_RAISE_MARGIN};
use crate::landmarks::PoseLandmarks;

/// Mean shoulder height against a target line above the elbows.
/// The line's offset comes from the current difficulty, read every frame.
pub struct Pushup;

impl Pushup {
    fn zone(shoulder_y: f32, target_y: f32) -> Zone {
        if shoulder_y > target_y {
            Zone::Lowered
        } else if shoulder_y < target_y - PUSHUP_RAISE_MARGIN {
            Zone::Raised
        } else {
            Zone::Band
        }
    }
}

impl RepDetector for Pushup {
    fn variant(&self) -> ExerciseVariant {
        ExerciseVariant::Pushup
    }

    fn classify(&self, pose: &PoseLandmarks, ctx: &FrameContext) -> Option<Reading> {
        let shoulder_y = pose.shoulder_y()?;
        let elbow_y = pose.elbow_y()?;
        let target_y = elbow_y - ctx.difficulty.offset();
        Some(Reading {
            value: shoulder_y,
            zone: Self::zone(shoulder_y, target_y),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::PushupDifficulty;
    use crate::landmarks::Landmark;

    fn arms(shoulder_y: f32, elbow_y: f32) -> PoseLandmarks {
        PoseLandmarks {
            left_shoulder: Some(Landmark::new(0.3, shoulder_y, 0.9)),
            right_shoulder: Some(Landmark::new(0.7, shoulder_y, 0.9)),
            left_elbow: Some(Landmark::new(0.3, elbow_y, 0.9)),
            right_elbow: Some(Landmark::new(0.7, elbow_y, 0.9)),
            ..Default::default()
        }
    }

    fn ctx(difficulty: PushupDifficulty) -> FrameContext {
        FrameContext {
            baseline: None,
            difficulty,
        }
    }

    #[test]
    fn test_level1_zones() {
        // Elbows at 0.70, target line at 0.60
        let ctx = ctx(PushupDifficulty::Level1);
        let zone = |y| Pushup.classify(&arms(y, 0.70), &ctx).unwrap().zone;
        assert_eq!(zone(0.62), Zone::Lowered);
        assert_eq!(zone(0.55), Zone::Band);
        assert_eq!(zone(0.45), Zone::Raised);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let target_y = 0.70 - PushupDifficulty::Level2.offset();
        assert_eq!(Pushup::zone(target_y, target_y), Zone::Band);
        assert_eq!(Pushup::zone(target_y - PUSHUP_RAISE_MARGIN, target_y), Zone::Band);
    }

    #[test]
    fn test_difficulty_moves_target() {
        // 0.58 is below the Level1 line (0.60) but past the Level3 line (0.50)
        let pose = arms(0.58, 0.70);
        let easy = Pushup.classify(&pose, &ctx(PushupDifficulty::Level1)).unwrap();
        let hard = Pushup.classify(&pose, &ctx(PushupDifficulty::Level3)).unwrap();
        assert_eq!(easy.zone, Zone::Band);
        assert_eq!(hard.zone, Zone::Lowered);
    }

    #[test]
    fn test_missing_elbow_skips() {
        let mut pose = arms(0.6, 0.7);
        pose.right_elbow = None;
        assert!(Pushup.classify(&pose, &ctx(PushupDifficulty::Level1)).is_none());
    }

    #[test]
    fn test_ignores_baseline() {
        let pose = arms(0.62, 0.70);
        let with_baseline = FrameContext {
            baseline: Some(0.1),
            difficulty: PushupDifficulty::Level1,
        };
        let reading = Pushup.classify(&pose, &with_baseline).unwrap();
        assert_eq!(reading.zone, Zone::Lowered);
    }
}

//! Exercise variants and their detection thresholds

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Countdown before detection starts, in seconds
pub const COUNTDOWN_SECS: u32 = 3;

/// Minimum landmark visibility for a joint to drive detection
pub const MIN_VISIBILITY: f32 = 0.5;

/// Full-body squat: knee angle below this enters LOWERED (degrees)
pub const KNEE_LOWERED_BELOW: f32 = 100.0;
/// Full-body squat: knee angle above this completes the rep (degrees)
pub const KNEE_RAISED_ABOVE: f32 = 160.0;

/// Upper-body squat: shoulders below baseline + this enter LOWERED
pub const SHOULDER_LOWERED_OFFSET: f32 = 0.10;
/// Upper-body squat: shoulders above baseline + this complete the rep
pub const SHOULDER_RAISED_OFFSET: f32 = 0.03;

/// Push-up: shoulders must rise this far above the target line to complete the rep
pub const PUSHUP_RAISE_MARGIN: f32 = 0.10;

/// Detection mode, chosen once per counter instance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseVariant {
    #[serde(rename = "full_body")]
    SquatFullBody, // knee angle
    #[serde(rename = "upper_body")]
    SquatUpperBody, // shoulder height against baseline
    Pushup,         // shoulder drop relative to elbows
}

impl ExerciseVariant {
    /// Stable tag used in storage and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseVariant::SquatFullBody => "full_body",
            ExerciseVariant::SquatUpperBody => "upper_body",
            ExerciseVariant::Pushup => "pushup",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExerciseVariant::SquatFullBody => "Squat (full body)",
            ExerciseVariant::SquatUpperBody => "Squat (upper body)",
            ExerciseVariant::Pushup => "Push-up",
        }
    }

    /// All variants for iteration
    pub fn all() -> &'static [ExerciseVariant] {
        &[
            ExerciseVariant::SquatFullBody,
            ExerciseVariant::SquatUpperBody,
            ExerciseVariant::Pushup,
        ]
    }
}

impl fmt::Display for ExerciseVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "squat_full_body" | "full_body" => Ok(ExerciseVariant::SquatFullBody),
            "squat_upper_body" | "upper_body" => Ok(ExerciseVariant::SquatUpperBody),
            "pushup" | "push_up" => Ok(ExerciseVariant::Pushup),
            other => anyhow::bail!("unknown exercise variant: {}", other),
        }
    }
}

/// Push-up depth requirement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PushupDifficulty {
    #[default]
    Level1,
    Level2,
    Level3,
}

impl PushupDifficulty {
    /// How far above the elbow line the shoulders count as lowered
    pub fn offset(&self) -> f32 {
        match self {
            PushupDifficulty::Level1 => 0.10,
            PushupDifficulty::Level2 => 0.15,
            PushupDifficulty::Level3 => 0.20,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(PushupDifficulty::Level1),
            2 => Some(PushupDifficulty::Level2),
            3 => Some(PushupDifficulty::Level3),
            _ => None,
        }
    }
}

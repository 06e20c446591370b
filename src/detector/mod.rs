//! Detector module - per-variant repetition strategies
//!
//! Features:
//! - Two-phase hysteresis machine shared by all variants
//! - One strategy per exercise variant, chosen once per counter
//! - Countdown calibration of the standing baseline

pub mod calibration;
pub mod pushup;
pub mod squat;

pub use calibration::Calibration;
pub use pushup::Pushup;
pub use squat::{FullBodySquat, UpperBodySquat};

use crate::exercises::{ExerciseVariant, PushupDifficulty};
use crate::landmarks::PoseLandmarks;

/// Whether the tracked body part is currently down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Raised,
    Lowered,
}

/// Where a measurement falls relative to the variant's thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// Past the "enter lowered" threshold
    Lowered,
    /// Past the "exit lowered" threshold
    Raised,
    /// Inside the hysteresis band
    Band,
}

/// One evaluated frame: the measured value and its zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub value: f32,
    pub zone: Zone,
}

/// What a phase update did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Lowered,
    Completed,
}

impl Phase {
    /// Advance the machine. Only LOWERED → RAISED completes a repetition.
    pub fn advance(self, zone: Zone) -> (Phase, Transition) {
        match (self, zone) {
            (Phase::Raised, Zone::Lowered) => (Phase::Lowered, Transition::Lowered),
            (Phase::Lowered, Zone::Raised) => (Phase::Raised, Transition::Completed),
            (phase, _) => (phase, Transition::Stay),
        }
    }
}

/// State a strategy may read but does not own
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameContext {
    /// Frozen calibration value, if one was captured
    pub baseline: Option<f32>,
    pub difficulty: PushupDifficulty,
}

/// A detection strategy for one exercise variant
pub trait RepDetector: Send {
    fn variant(&self) -> ExerciseVariant;

    /// Measure the frame. `None` means required landmarks were missing.
    fn classify(&self, pose: &PoseLandmarks, ctx: &FrameContext) -> Option<Reading>;
}

/// Build the strategy for a variant
pub fn detector_for(variant: ExerciseVariant) -> Box<dyn RepDetector> {
    match variant {
        ExerciseVariant::SquatFullBody => Box::new(FullBodySquat),
        ExerciseVariant::SquatUpperBody => Box::new(UpperBodySquat),
        ExerciseVariant::Pushup => Box::new(Pushup),
    }
}

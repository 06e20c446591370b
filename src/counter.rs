//! Repetition counter - one instance per activation of one exercise variant
//!
//! Frames go in one at a time through [`RepCounter::process_frame`]; the
//! countdown advances through [`RepCounter::tick`], once per second. The
//! count only ever grows, and only on a LOWERED → RAISED transition.

use anyhow::Result;
use tracing::{debug, info};

use crate::db::{SessionAccumulator, WorkoutSession};
use crate::detector::{Calibration, FrameContext, Phase, RepDetector, Transition, detector_for};
use crate::exercises::{ExerciseVariant, PushupDifficulty};
use crate::landmarks::PoseLandmarks;

/// Feedback for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Countdown running, seconds left
    Calibrating(u32),
    /// Required joints missing or not visible
    ShowBody,
    /// Entered the lowered position, now stand/push back up
    GoUp,
    /// Repetition completed, new total
    Counted(u32),
    Paused,
}

/// Outcome of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameResult {
    /// 0 or 1
    pub count_delta: u32,
    pub phase: Phase,
    /// Frame could not be evaluated (missing landmarks)
    pub skipped: bool,
    pub cue: Option<Cue>,
}

pub struct RepCounter {
    detector: Box<dyn RepDetector>,
    calibration: Calibration,
    phase: Phase,
    count: u32,
    difficulty: PushupDifficulty,
    paused: bool,
    flushed: bool,
}

impl RepCounter {
    /// Fresh instance: count 0, phase RAISED, countdown armed
    pub fn start(variant: ExerciseVariant, difficulty: PushupDifficulty) -> Self {
        info!("Starting {} counter", variant);
        Self {
            detector: detector_for(variant),
            calibration: Calibration::new(),
            phase: Phase::Raised,
            count: 0,
            difficulty,
            paused: false,
            flushed: false,
        }
    }

    pub fn variant(&self) -> ExerciseVariant {
        self.detector.variant()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn countdown(&self) -> u32 {
        self.calibration.countdown()
    }

    pub fn baseline(&self) -> Option<f32> {
        self.calibration.baseline()
    }

    pub fn difficulty(&self) -> PushupDifficulty {
        self.difficulty
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_torn_down(&self) -> bool {
        self.flushed
    }

    fn result(&self, count_delta: u32, skipped: bool, cue: Option<Cue>) -> FrameResult {
        FrameResult {
            count_delta,
            phase: self.phase,
            skipped,
            cue,
        }
    }

    /// Run one frame through calibration or the phase machine
    pub fn process_frame(&mut self, pose: &PoseLandmarks) -> FrameResult {
        if self.flushed {
            return self.result(0, false, None);
        }
        if self.paused {
            return self.result(0, false, Some(Cue::Paused));
        }

        if self.calibration.is_counting_down() {
            self.calibration.update_baseline(pose);
            let left = self.calibration.countdown();
            return self.result(0, false, Some(Cue::Calibrating(left)));
        }

        let ctx = FrameContext {
            baseline: self.calibration.baseline(),
            difficulty: self.difficulty,
        };
        let Some(reading) = self.detector.classify(pose, &ctx) else {
            debug!("Frame skipped: landmarks missing for {}", self.variant());
            return self.result(0, true, Some(Cue::ShowBody));
        };

        let (phase, transition) = self.phase.advance(reading.zone);
        self.phase = phase;

        match transition {
            Transition::Stay => self.result(0, false, None),
            Transition::Lowered => {
                debug!("{} lowered at {:.3}", self.variant(), reading.value);
                self.result(0, false, Some(Cue::GoUp))
            }
            Transition::Completed => {
                self.count += 1;
                info!("{} rep {} at {:.3}", self.variant(), self.count, reading.value);
                self.result(1, false, Some(Cue::Counted(self.count)))
            }
        }
    }

    /// One second of wall time. Frozen while paused.
    pub fn tick(&mut self) {
        if self.paused || self.flushed {
            return;
        }
        self.calibration.tick();
    }

    pub fn pause(&mut self) {
        if !self.paused {
            debug!("{} counter paused", self.variant());
            self.paused = true;
        }
    }

    /// Continue where pause left off, no recalibration
    pub fn resume(&mut self) {
        if self.paused {
            debug!("{} counter resumed", self.variant());
            self.paused = false;
        }
    }

    /// Re-arm the countdown and return to RAISED, keeping the count
    pub fn recalibrate(&mut self) {
        info!("Recalibrating {} counter (count {})", self.variant(), self.count);
        self.calibration.reset();
        self.phase = Phase::Raised;
    }

    /// Applies from the next frame on
    pub fn set_difficulty(&mut self, difficulty: PushupDifficulty) {
        self.difficulty = difficulty;
    }

    /// Stop counting and hand a non-zero count to the accumulator, at most once.
    ///
    /// A failed write leaves the counter live so the caller can retry.
    pub fn teardown(
        &mut self,
        accumulator: &mut dyn SessionAccumulator,
    ) -> Result<Option<WorkoutSession>> {
        if self.flushed {
            return Ok(None);
        }

        let session = if self.count > 0 {
            Some(accumulator.record_session(self.count, self.variant())?)
        } else {
            None
        };

        self.flushed = true;
        info!("{} counter torn down with {} reps", self.variant(), self.count);
        Ok(session)
    }
}

//! Workout controller - owns the active counter and the session store
//!
//! Switching variants tears down the running counter (flushing its count)
//! and starts a fresh one with its own countdown, phase and count.

use anyhow::Result;
use tracing::info;

use crate::counter::{FrameResult, RepCounter};
use crate::db::{SessionAccumulator, WorkoutSession};
use crate::exercises::{ExerciseVariant, PushupDifficulty};
use crate::landmarks::PoseLandmarks;

pub struct Workout<A: SessionAccumulator> {
    accumulator: A,
    counter: Option<RepCounter>,
    difficulty: PushupDifficulty,
    saved: Vec<WorkoutSession>,
}

impl<A: SessionAccumulator> Workout<A> {
    pub fn new(accumulator: A) -> Self {
        Self {
            accumulator,
            counter: None,
            difficulty: PushupDifficulty::default(),
            saved: Vec::new(),
        }
    }

    /// Flush whatever is running and start counting `variant` from zero
    pub fn start(&mut self, variant: ExerciseVariant) -> Result<()> {
        self.flush()?;
        self.counter = Some(RepCounter::start(variant, self.difficulty));
        Ok(())
    }

    /// Same as [`Workout::start`]. If the flush fails the current counter stays active.
    pub fn switch_variant(&mut self, variant: ExerciseVariant) -> Result<()> {
        if let Some(current) = self.counter.as_ref().filter(|c| !c.is_torn_down()) {
            info!("Switching {} -> {}", current.variant(), variant);
        }
        self.start(variant)
    }

    /// Tear down the active counter. Safe to call repeatedly.
    pub fn end(&mut self) -> Result<()> {
        self.flush()
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(counter) = self.counter.as_mut()
            && let Some(session) = counter.teardown(&mut self.accumulator)?
        {
            self.saved.push(session);
        }
        Ok(())
    }

    /// `None` when nothing has been started
    pub fn process_frame(&mut self, pose: &PoseLandmarks) -> Option<FrameResult> {
        self.counter.as_mut().map(|c| c.process_frame(pose))
    }

    pub fn tick(&mut self) {
        if let Some(counter) = self.counter.as_mut() {
            counter.tick();
        }
    }

    pub fn pause(&mut self) {
        if let Some(counter) = self.counter.as_mut() {
            counter.pause();
        }
    }

    pub fn resume(&mut self) {
        if let Some(counter) = self.counter.as_mut() {
            counter.resume();
        }
    }

    pub fn recalibrate(&mut self) {
        if let Some(counter) = self.counter.as_mut() {
            counter.recalibrate();
        }
    }

    /// Remembered for later counters too
    pub fn set_difficulty(&mut self, difficulty: PushupDifficulty) {
        self.difficulty = difficulty;
        if let Some(counter) = self.counter.as_mut() {
            counter.set_difficulty(difficulty);
        }
    }

    pub fn counter(&self) -> Option<&RepCounter> {
        self.counter.as_ref()
    }

    /// Sessions persisted during this workout, oldest first
    pub fn saved_sessions(&self) -> &[WorkoutSession] {
        &self.saved
    }

    pub fn accumulator(&self) -> &A {
        &self.accumulator
    }
}

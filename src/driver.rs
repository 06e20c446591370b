//! Frame pump - feeds a workout from a bounded queue
//!
//! A producer (camera + pose model, or a recording) pushes [`Command`]s into
//! the queue. The pump processes each one to completion before taking the
//! next, and ticks the countdown once per second in between.

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

use crate::db::SessionAccumulator;
use crate::exercises::{ExerciseVariant, PushupDifficulty};
use crate::landmarks::PoseLandmarks;
use crate::workout::Workout;

/// Queue depth between producer and pump
pub const QUEUE_CAPACITY: usize = 64;

/// Countdown tick interval
const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub enum Command {
    Frame(PoseLandmarks),
    Pause,
    Resume,
    Recalibrate,
    SwitchVariant(ExerciseVariant),
    SetDifficulty(PushupDifficulty),
    End,
}

/// What happened during one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub frames: u64,
    pub skipped: u64,
    pub reps: u32,
}

pub fn channel() -> (mpsc::Sender<Command>, mpsc::Receiver<Command>) {
    mpsc::channel(QUEUE_CAPACITY)
}

/// Pump commands into `workout` until `End` or the producer hangs up.
/// The active counter is torn down on the way out.
pub async fn run<A: SessionAccumulator>(
    workout: &mut Workout<A>,
    mut rx: mpsc::Receiver<Command>,
) -> Result<Summary> {
    let mut summary = Summary::default();
    let mut ticker = interval_at(Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            command = rx.recv() => {
                let Some(command) = command else {
                    debug!("Producer closed the queue");
                    break;
                };
                match command {
                    Command::Frame(pose) => {
                        if let Some(result) = workout.process_frame(&pose) {
                            summary.frames += 1;
                            if result.skipped {
                                summary.skipped += 1;
                            }
                            summary.reps += result.count_delta;
                        }
                    }
                    Command::Pause => workout.pause(),
                    Command::Resume => workout.resume(),
                    Command::Recalibrate => workout.recalibrate(),
                    Command::SwitchVariant(variant) => {
                        if let Err(e) = workout.switch_variant(variant) {
                            warn!("Switch to {} failed, keeping current counter: {:#}", variant, e);
                        }
                    }
                    Command::SetDifficulty(difficulty) => workout.set_difficulty(difficulty),
                    Command::End => break,
                }
            }
            _ = ticker.tick() => workout.tick(),
        }
    }

    workout.end()?;
    info!(
        "Run finished: {} frames, {} skipped, {} reps",
        summary.frames, summary.skipped, summary.reps
    );
    Ok(summary)
}

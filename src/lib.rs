//! repcount - Exercise repetition counter
//!
//! Turns a stream of pose landmarks into counted squats and push-ups.

pub mod counter;
pub mod db;
pub mod detector;
pub mod driver;
pub mod exercises;
pub mod geometry;
pub mod landmarks;
pub mod workout;

pub use counter::{Cue, FrameResult, RepCounter};
pub use db::{Database, SessionAccumulator, WorkoutSession};
pub use exercises::{ExerciseVariant, PushupDifficulty};
pub use landmarks::PoseLandmarks;
pub use workout::Workout;

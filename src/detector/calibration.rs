//! Countdown calibration
//!
//! While the countdown runs, every frame with both shoulders visible
//! overwrites the baseline. The last value before expiry is the one kept;
//! nothing is averaged, so the user's settling movement doesn't leak in.

use tracing::info;

use crate::exercises::COUNTDOWN_SECS;
use crate::landmarks::PoseLandmarks;

#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    countdown: u32,
    baseline: Option<f32>,
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new()
    }
}

impl Calibration {
    /// Armed countdown, no baseline yet
    pub fn new() -> Self {
        Self {
            countdown: COUNTDOWN_SECS,
            baseline: None,
        }
    }

    /// Seconds left before detection starts
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn is_counting_down(&self) -> bool {
        self.countdown > 0
    }

    pub fn baseline(&self) -> Option<f32> {
        self.baseline
    }

    /// Capture the current shoulder height while the countdown runs.
    /// Returns true if the baseline was overwritten.
    pub fn update_baseline(&mut self, pose: &PoseLandmarks) -> bool {
        if !self.is_counting_down() {
            return false;
        }
        match pose.shoulder_y() {
            Some(y) => {
                self.baseline = Some(y);
                true
            }
            None => false,
        }
    }

    /// One second elapsed. Stays at 0 once reached.
    pub fn tick(&mut self) {
        if self.countdown == 0 {
            return;
        }
        self.countdown -= 1;
        if self.countdown == 0 {
            match self.baseline {
                Some(y) => info!("Calibration done, baseline y = {:.3}", y),
                None => info!("Calibration done, no baseline captured"),
            }
        }
    }

    /// Re-arm the countdown; the next window captures a fresh baseline
    pub fn reset(&mut self) {
        self.countdown = COUNTDOWN_SECS;
        self.baseline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Landmark;

    fn shoulders(y: f32) -> PoseLandmarks {
        PoseLandmarks {
            left_shoulder: Some(Landmark::new(0.4, y, 0.9)),
            right_shoulder: Some(Landmark::new(0.6, y, 0.9)),
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_armed() {
        let calibration = Calibration::new();
        assert_eq!(calibration.countdown(), COUNTDOWN_SECS);
        assert!(calibration.is_counting_down());
        assert!(calibration.baseline().is_none());
    }

    #[test]
    fn test_baseline_last_writer_wins() {
        let mut calibration = Calibration::new();
        for y in [0.40, 0.38, 0.41] {
            assert!(calibration.update_baseline(&shoulders(y)));
            calibration.tick();
        }
        assert!(!calibration.is_counting_down());

        // After expiry the baseline is frozen
        assert!(!calibration.update_baseline(&shoulders(0.50)));
        assert_eq!(calibration.baseline(), Some(0.41));
    }

    #[test]
    fn test_missing_shoulders_keep_previous_value() {
        let mut calibration = Calibration::new();
        calibration.update_baseline(&shoulders(0.40));
        assert!(!calibration.update_baseline(&PoseLandmarks::default()));
        assert_eq!(calibration.baseline(), Some(0.40));
    }

    #[test]
    fn test_countdown_stays_at_zero() {
        let mut calibration = Calibration::new();
        for _ in 0..10 {
            calibration.tick();
        }
        assert_eq!(calibration.countdown(), 0);
    }

    #[test]
    fn test_reset_rearms() {
        let mut calibration = Calibration::new();
        calibration.update_baseline(&shoulders(0.40));
        for _ in 0..COUNTDOWN_SECS {
            calibration.tick();
        }
        calibration.reset();
        assert_eq!(calibration.countdown(), COUNTDOWN_SECS);
        assert!(calibration.baseline().is_none());
        assert!(calibration.update_baseline(&shoulders(0.30)));
        assert_eq!(calibration.baseline(), Some(0.30));
    }
}

//! Countdown timers with randomised delays.
//!
//! Every timer here is advanced explicitly with the frame delta. A cancelled
//! timer never fires, and a timer fires synchronously within the tick that
//! takes it to zero.

use bevy::prelude::*;
use rand::Rng;
use std::time::Duration;

/// Uniform draw from `[min, max]`, tolerating an inverted or empty range.
pub fn uniform_delay(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    if hi - lo <= f32::EPSILON {
        return lo.max(0.0);
    }
    rng.gen_range(lo..=hi).max(0.0)
}

// ─── RandomDelay ─────────────────────────────────────────────────────────────

/// A delay timer whose duration is redrawn from `[min, max]` each time it is
/// armed. Repeating timers re-arm themselves with a fresh draw after firing.
#[derive(Debug, Clone)]
pub struct RandomDelay {
    pub min: f32,
    pub max: f32,
    pub repeating: bool,
    timer: Option<Timer>,
}

impl RandomDelay {
    pub fn one_shot(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            repeating: false,
            timer: None,
        }
    }

    pub fn repeating(min: f32, max: f32) -> Self {
        Self {
            repeating: true,
            ..Self::one_shot(min, max)
        }
    }

    /// Start (or restart) the countdown with a freshly drawn delay.
    /// Returns the drawn delay in seconds.
    pub fn arm(&mut self, rng: &mut impl Rng) -> f32 {
        let secs = uniform_delay(rng, self.min, self.max);
        self.arm_exact(secs);
        secs
    }

    /// Start the countdown with a fixed delay, ignoring the range.
    pub fn arm_exact(&mut self, secs: f32) {
        self.timer = Some(Timer::from_seconds(secs.max(0.0), TimerMode::Once));
    }

    pub fn cancel(&mut self) {
        self.timer = None;
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    pub fn remaining(&self) -> Option<f32> {
        self.timer.as_ref().map(|t| t.remaining_secs())
    }

    /// Advance by `dt` seconds. Returns true on the tick the delay elapses.
    pub fn tick(&mut self, dt: f32, rng: &mut impl Rng) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        timer.tick(Duration::from_secs_f32(dt.max(0.0)));
        if !timer.finished() {
            return false;
        }
        if self.repeating {
            self.arm(rng);
        } else {
            self.timer = None;
        }
        true
    }
}

// ─── EscalationTimer ─────────────────────────────────────────────────────────

/// Fires when a condition has persisted past a randomised threshold.
///
/// `hold` must be called every tick the condition is true and `release` when
/// it clears. Releasing before the threshold cancels the countdown. It fires
/// at most once per episode of the condition; firing draws the threshold used
/// for the next episode.
#[derive(Debug, Clone)]
pub struct EscalationTimer {
    pub min_threshold: f32,
    pub max_threshold: f32,
    threshold: f32,
    elapsed: f32,
    active: bool,
    fired: bool,
}

impl EscalationTimer {
    pub fn new(min_threshold: f32, max_threshold: f32, rng: &mut impl Rng) -> Self {
        Self {
            min_threshold,
            max_threshold,
            threshold: uniform_delay(rng, min_threshold, max_threshold),
            elapsed: 0.0,
            active: false,
            fired: false,
        }
    }

    /// Start with a known first threshold; later ones are drawn from the range.
    pub fn with_threshold(min_threshold: f32, max_threshold: f32, threshold: f32) -> Self {
        Self {
            min_threshold,
            max_threshold,
            threshold: threshold.max(0.0),
            elapsed: 0.0,
            active: false,
            fired: false,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True once the current episode has fired.
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Condition is present this tick. Returns true when the threshold is crossed.
    pub fn hold(&mut self, dt: f32, rng: &mut impl Rng) -> bool {
        self.active = true;
        if self.fired {
            return false;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed < self.threshold {
            return false;
        }
        self.fired = true;
        self.elapsed = 0.0;
        self.threshold = uniform_delay(rng, self.min_threshold, self.max_threshold);
        true
    }

    /// Condition cleared. The countdown is discarded; the threshold is kept.
    pub fn release(&mut self) {
        self.active = false;
        self.fired = false;
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_one_shot_fires_once_then_disarms() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut delay = RandomDelay::one_shot(2.0, 8.0);
        let secs = delay.arm(&mut rng);
        assert!((2.0..=8.0).contains(&secs));

        let mut fired = 0;
        for _ in 0..600 {
            if delay.tick(1.0 / 60.0, &mut rng) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert!(!delay.is_armed());
    }

    #[test]
    fn test_cancelled_delay_never_fires() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut delay = RandomDelay::one_shot(0.5, 0.5);
        delay.arm(&mut rng);
        assert!(!delay.tick(0.4, &mut rng));
        delay.cancel();
        assert!(!delay.tick(1.0, &mut rng));
    }

    #[test]
    fn test_repeating_delay_rearms() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut delay = RandomDelay::repeating(1.0, 1.0);
        delay.arm(&mut rng);
        assert!(delay.tick(1.0, &mut rng));
        assert!(delay.is_armed());
        assert!(!delay.tick(0.5, &mut rng));
        assert!(delay.tick(0.5, &mut rng));
    }

    #[test]
    fn test_escalation_release_cancels_countdown() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut timer = EscalationTimer::new(8.0, 15.0, &mut rng);
        assert!((8.0..=15.0).contains(&timer.threshold()));
        assert!(!timer.hold(7.9, &mut rng));
        timer.release();
        assert_eq!(timer.elapsed(), 0.0);
        assert!(!timer.hold(7.9, &mut rng));
    }

    #[test]
    fn test_escalation_fires_after_threshold_and_redraws() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut timer = EscalationTimer::new(8.0, 15.0, &mut rng);
        let mut fired_at = None;
        for i in 1..=16 {
            if timer.hold(1.0, &mut rng) {
                fired_at = Some(i);
                break;
            }
        }
        let fired_at = fired_at.unwrap();
        assert!((8..=15).contains(&fired_at));
        assert_eq!(timer.elapsed(), 0.0);
        assert!((8.0..=15.0).contains(&timer.threshold()));
        assert!(timer.has_fired());
    }

    #[test]
    fn test_escalation_fires_once_per_episode() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut timer = EscalationTimer::new(8.0, 8.0, &mut rng);
        assert!(timer.hold(8.0, &mut rng));
        for _ in 0..30 {
            assert!(!timer.hold(1.0, &mut rng));
        }
        timer.release();
        assert!(!timer.has_fired());
        assert!(timer.hold(8.0, &mut rng));
    }
}

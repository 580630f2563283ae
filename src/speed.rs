//! Wall-clock difficulty ramp: the tick interval shrinks every SPEED_INTERVAL down to a floor.

use std::time::{Duration, Instant};

/// Tick interval at difficulty 3; each lower difficulty adds SPEED_PER_DIFFICULTY_MS.
pub const BASE_SPEED_MS: u64 = 180;
const SPEED_PER_DIFFICULTY_MS: u64 = 100;
/// Amount shaved off the interval per speed-up.
pub const SPEED_STEP_MS: u64 = 20;
/// Wall-clock time between speed-ups.
pub const SPEED_INTERVAL: Duration = Duration::from_secs(20);
/// The interval never drops below this.
pub const MIN_SPEED_MS: u64 = 60;

/// Starting tick interval for a difficulty in 1..=3.
pub fn initial_speed_ms(difficulty: u32) -> u64 {
    BASE_SPEED_MS + u64::from(3u32.saturating_sub(difficulty)) * SPEED_PER_DIFFICULTY_MS
}

#[derive(Debug, Clone)]
pub struct SpeedScheduler {
    speed_ms: u64,
    last_speedup: Instant,
    /// Relaxed mode keeps the starting speed for the whole run.
    ramp: bool,
}

impl SpeedScheduler {
    pub fn new(difficulty: u32, now: Instant, ramp: bool) -> Self {
        Self {
            speed_ms: initial_speed_ms(difficulty),
            last_speedup: now,
            ramp,
        }
    }

    /// Current delay between ticks in ms. Smaller is faster.
    #[inline]
    pub fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }

    /// Apply a speed-up if SPEED_INTERVAL has passed since the last one.
    /// Returns true when the interval actually changed.
    pub fn update(&mut self, now: Instant) -> bool {
        if !self.ramp || now.saturating_duration_since(self.last_speedup) < SPEED_INTERVAL {
            return false;
        }
        self.last_speedup = now;
        let next = self.speed_ms.saturating_sub(SPEED_STEP_MS).max(MIN_SPEED_MS);
        let changed = next != self.speed_ms;
        self.speed_ms = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_speed_by_difficulty() {
        assert_eq!(initial_speed_ms(1), 380);
        assert_eq!(initial_speed_ms(2), 280);
        assert_eq!(initial_speed_ms(3), 180);
    }

    #[test]
    fn test_no_change_before_interval() {
        let t0 = Instant::now();
        let mut s = SpeedScheduler::new(3, t0, true);
        assert!(!s.update(t0 + Duration::from_secs(19)));
        assert_eq!(s.speed_ms(), 180);
        assert!(s.update(t0 + Duration::from_secs(20)));
        assert_eq!(s.speed_ms(), 160);
    }

    #[test]
    fn test_interval_restarts_after_speedup() {
        let t0 = Instant::now();
        let mut s = SpeedScheduler::new(3, t0, true);
        assert!(s.update(t0 + Duration::from_secs(25)));
        // 39s is only 14s after the last speed-up.
        assert!(!s.update(t0 + Duration::from_secs(39)));
        assert!(s.update(t0 + Duration::from_secs(45)));
        assert_eq!(s.speed_ms(), 140);
    }

    #[test]
    fn test_monotonic_and_floored() {
        let t0 = Instant::now();
        let mut s = SpeedScheduler::new(1, t0, true);
        let mut prev = s.speed_ms();
        for secs in 0..2000 {
            s.update(t0 + Duration::from_secs(secs));
            assert!(s.speed_ms() <= prev);
            assert!(s.speed_ms() >= MIN_SPEED_MS);
            prev = s.speed_ms();
        }
        assert_eq!(s.speed_ms(), MIN_SPEED_MS);
    }

    #[test]
    fn test_relaxed_never_ramps() {
        let t0 = Instant::now();
        let mut s = SpeedScheduler::new(2, t0, false);
        assert!(!s.update(t0 + Duration::from_secs(600)));
        assert_eq!(s.speed_ms(), 280);
    }
}

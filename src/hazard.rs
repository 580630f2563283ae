//! The hunter: a pursuing hazard that appears on a random timer and ends the run on contact.

use crate::vector::{Bounds, Vector2I};
use rand::Rng;
use std::time::{Duration, Instant};

/// Shortest wait between the hunter leaving and reappearing.
pub const MIN_RESPAWN_SECS: u64 = 10;
/// Longest wait between the hunter leaving and reappearing.
pub const MAX_RESPAWN_SECS: u64 = 30;
/// How long the hunter chases before giving up.
pub const LIFESPAN: Duration = Duration::from_secs(10);
/// The hunter moves on one tick out of this many.
const STEP_EVERY: u32 = 2;

/// What happened to the hunter during one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardEvent {
    Idle,
    Activated,
    Moved,
    Expired,
    Contact,
}

#[derive(Debug, Clone)]
pub struct Hazard {
    /// Some while active. Never rendered or collision-tested when None.
    position: Option<Vector2I>,
    activated_at: Option<Instant>,
    /// Start of the current inactive stretch.
    inactive_since: Instant,
    /// Randomized wait before the next activation.
    respawn_after: Duration,
    pub lifespan: Duration,
    /// Ticks seen while active; the hunter steps on every STEP_EVERY-th one.
    step_counter: u32,
}

impl Hazard {
    pub fn new<R: Rng>(now: Instant, rng: &mut R) -> Self {
        Self {
            position: None,
            activated_at: None,
            inactive_since: now,
            respawn_after: roll_respawn_delay(rng),
            lifespan: LIFESPAN,
            step_counter: 0,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.position.is_some()
    }

    #[inline]
    pub fn position(&self) -> Option<Vector2I> {
        self.position
    }

    /// Delay that must pass after `inactive_since` before the next activation.
    #[cfg(test)]
    pub fn respawn_after(&self) -> Duration {
        self.respawn_after
    }

    /// Time left before the hunter gives up, if active.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.activated_at
            .map(|t| self.lifespan.saturating_sub(now.saturating_duration_since(t)))
    }

    /// Place the hunter on a random cell other than the player's.
    pub fn activate<R: Rng>(&mut self, player: Vector2I, bounds: Bounds, now: Instant, rng: &mut R) {
        let mut pos = Vector2I::new(rng.gen_range(0..bounds.width), rng.gen_range(0..bounds.height));
        if pos == player {
            pos.x = (pos.x + bounds.width / 2).rem_euclid(bounds.width);
            if pos == player {
                pos.y = (pos.y + bounds.height / 2).rem_euclid(bounds.height);
            }
        }
        self.activate_at(pos, now);
    }

    pub fn activate_at(&mut self, pos: Vector2I, now: Instant) {
        self.position = Some(pos);
        self.activated_at = Some(now);
        self.step_counter = 0;
    }

    pub fn deactivate<R: Rng>(&mut self, now: Instant, rng: &mut R) {
        self.position = None;
        self.activated_at = None;
        self.inactive_since = now;
        self.respawn_after = roll_respawn_delay(rng);
        self.step_counter = 0;
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.activated_at
            .is_some_and(|t| now.saturating_duration_since(t) >= self.lifespan)
    }

    /// One step toward `target` on each axis independently, on every other call.
    /// Returns true if the hunter moved.
    pub fn step_toward(&mut self, target: Vector2I, bounds: Bounds) -> bool {
        let Some(pos) = self.position else {
            return false;
        };
        self.step_counter = self.step_counter.wrapping_add(1);
        if self.step_counter % STEP_EVERY != 0 {
            return false;
        }
        let next = (pos + (target - pos).signum()).clamp_to(bounds);
        self.position = Some(next);
        next != pos
    }

    /// Run one tick of the lifecycle against the player's current cell.
    pub fn update<R: Rng>(
        &mut self,
        player: Vector2I,
        bounds: Bounds,
        now: Instant,
        rng: &mut R,
    ) -> HazardEvent {
        if !self.is_active() {
            if now.saturating_duration_since(self.inactive_since) >= self.respawn_after {
                self.activate(player, bounds, now, rng);
                return HazardEvent::Activated;
            }
            return HazardEvent::Idle;
        }
        let moved = self.step_toward(player, bounds);
        if self.position == Some(player) {
            return HazardEvent::Contact;
        }
        if self.is_expired(now) {
            self.deactivate(now, rng);
            return HazardEvent::Expired;
        }
        if moved { HazardEvent::Moved } else { HazardEvent::Idle }
    }
}

fn roll_respawn_delay<R: Rng>(rng: &mut R) -> Duration {
    Duration::from_secs(rng.gen_range(MIN_RESPAWN_SECS..=MAX_RESPAWN_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const BOUNDS: Bounds = Bounds::new(160, 40);

    fn active_at(pos: Vector2I, now: Instant, rng: &mut StdRng) -> Hazard {
        let mut h = Hazard::new(now, rng);
        h.activate_at(pos, now);
        h
    }

    #[test]
    fn test_starts_inactive_with_delay_in_window() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let h = Hazard::new(Instant::now(), &mut rng);
            assert!(!h.is_active());
            let secs = h.respawn_after().as_secs();
            assert!((MIN_RESPAWN_SECS..=MAX_RESPAWN_SECS).contains(&secs));
        }
    }

    #[test]
    fn test_activation_time_falls_in_window() {
        let mut rng = StdRng::seed_from_u64(2);
        let player = Vector2I::new(80, 39);
        for _ in 0..20 {
            let t0 = Instant::now();
            let mut h = Hazard::new(t0, &mut rng);
            let mut activated = None;
            for secs in 0..=35 {
                let now = t0 + Duration::from_secs(secs);
                if h.update(player, BOUNDS, now, &mut rng) == HazardEvent::Activated {
                    activated = Some(secs);
                    break;
                }
            }
            let secs = activated.expect("hunter should appear within 35s");
            assert!((MIN_RESPAWN_SECS..=MAX_RESPAWN_SECS).contains(&secs));
            let pos = h.position().unwrap();
            assert!(BOUNDS.contains(pos));
            assert_ne!(pos, player);
        }
    }

    #[test]
    fn test_moves_every_other_tick_sign_only() {
        let mut rng = StdRng::seed_from_u64(3);
        let t0 = Instant::now();
        let mut h = active_at(Vector2I::new(10, 10), t0, &mut rng);
        let target = Vector2I::new(50, 5);
        assert!(!h.step_toward(target, BOUNDS));
        assert_eq!(h.position(), Some(Vector2I::new(10, 10)));
        assert!(h.step_toward(target, BOUNDS));
        assert_eq!(h.position(), Some(Vector2I::new(11, 9)));
        h.step_toward(target, BOUNDS);
        h.step_toward(target, BOUNDS);
        assert_eq!(h.position(), Some(Vector2I::new(12, 8)));
    }

    #[test]
    fn test_stays_in_bounds_while_chasing() {
        let mut rng = StdRng::seed_from_u64(4);
        let t0 = Instant::now();
        let mut h = active_at(Vector2I::new(0, 0), t0, &mut rng);
        for _ in 0..400 {
            h.step_toward(Vector2I::new(159, 39), BOUNDS);
            assert!(BOUNDS.contains(h.position().unwrap()));
        }
        assert_eq!(h.position(), Some(Vector2I::new(159, 39)));
    }

    #[test]
    fn test_contact_when_reaching_player() {
        let mut rng = StdRng::seed_from_u64(5);
        let t0 = Instant::now();
        let player = Vector2I::new(12, 12);
        let mut h = active_at(Vector2I::new(10, 10), t0, &mut rng);
        let mut events = Vec::new();
        for _ in 0..4 {
            events.push(h.update(player, BOUNDS, t0, &mut rng));
        }
        assert_eq!(
            events,
            vec![
                HazardEvent::Idle,
                HazardEvent::Moved,
                HazardEvent::Idle,
                HazardEvent::Contact
            ]
        );
    }

    #[test]
    fn test_expires_after_lifespan_and_rolls_new_delay() {
        let mut rng = StdRng::seed_from_u64(6);
        let t0 = Instant::now();
        let mut h = active_at(Vector2I::new(0, 0), t0, &mut rng);
        let player = Vector2I::new(150, 39);
        let before = t0 + LIFESPAN - Duration::from_millis(1);
        assert_ne!(h.update(player, BOUNDS, before, &mut rng), HazardEvent::Expired);
        assert!(h.is_active());
        let at = t0 + LIFESPAN;
        assert_eq!(h.update(player, BOUNDS, at, &mut rng), HazardEvent::Expired);
        assert!(!h.is_active());
        assert_eq!(h.position(), None);
        assert_eq!(h.remaining(at), None);
        // Reappears only after the fresh randomized delay.
        assert_eq!(h.update(player, BOUNDS, at, &mut rng), HazardEvent::Idle);
        let again = at + h.respawn_after();
        assert_eq!(h.update(player, BOUNDS, again, &mut rng), HazardEvent::Activated);
    }
}

//! Spawn policy: what drops in at the top row each tick.

use crate::item::{FallingItem, ItemKind, ROLL_RANGE};
use crate::vector::{Bounds, Vector2I};
use rand::Rng;

/// Base item capacity before the difficulty bonus and slack.
pub const MAX_ITEMS: usize = 6;
/// Extra slots on top of MAX_ITEMS + difficulty.
const CAPACITY_SLACK: usize = 6;
/// Waves only form while fewer than this many bones are falling.
pub const WAVE_HARMFUL_LIMIT: usize = 12;
/// Largest group of bones spawned by one wave.
pub const MAX_WAVE: usize = 3;

#[derive(Debug, Clone)]
pub struct SpawnPolicy {
    /// Chance in percent (0..=100) that a spawn attempt happens on a given tick.
    pub chance: u32,
    /// Allow bones to arrive in groups.
    pub waves: bool,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self {
            chance: 100,
            waves: true,
        }
    }
}

impl SpawnPolicy {
    /// Upper bound on active items; spawning stops once it is reached.
    pub fn capacity(difficulty: u32) -> usize {
        MAX_ITEMS + difficulty as usize + CAPACITY_SLACK
    }

    /// Add zero or more items at row 0. Returns how many were spawned.
    pub fn spawn<R: Rng>(
        &self,
        items: &mut Vec<FallingItem>,
        bounds: Bounds,
        difficulty: u32,
        rng: &mut R,
    ) -> usize {
        let capacity = Self::capacity(difficulty);
        if items.len() >= capacity || self.chance == 0 {
            return 0;
        }
        if self.chance < 100 && rng.gen_range(0..100) >= self.chance {
            return 0;
        }
        let kind = ItemKind::from_roll(rng.gen_range(0..ROLL_RANGE));
        let group = if kind.is_harmful() && self.waves && harmful_count(items) < WAVE_HARMFUL_LIMIT {
            rng.gen_range(1..=MAX_WAVE)
        } else {
            1
        };
        let group = group.min(capacity - items.len());
        // Columns in [0, width-1); a one-column field still has column 0.
        let max_x = (bounds.width - 1).max(1);
        for _ in 0..group {
            let x = rng.gen_range(0..max_x);
            items.push(FallingItem::new(Vector2I::new(x, 0), kind));
        }
        group
    }
}

pub fn harmful_count(items: &[FallingItem]) -> usize {
    items.iter().filter(|i| i.kind.is_harmful()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const BOUNDS: Bounds = Bounds::new(160, 40);

    #[test]
    fn test_capacity_formula() {
        assert_eq!(SpawnPolicy::capacity(1), 13);
        assert_eq!(SpawnPolicy::capacity(3), 15);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut rng = StdRng::seed_from_u64(7);
        let policy = SpawnPolicy::default();
        for difficulty in 1..=3 {
            let mut items = Vec::new();
            for _ in 0..500 {
                policy.spawn(&mut items, BOUNDS, difficulty, &mut rng);
                assert!(items.len() <= SpawnPolicy::capacity(difficulty));
            }
            assert_eq!(items.len(), SpawnPolicy::capacity(difficulty));
        }
    }

    #[test]
    fn test_spawns_on_top_row_inside_columns() {
        let mut rng = StdRng::seed_from_u64(11);
        let policy = SpawnPolicy::default();
        let mut items = Vec::new();
        while items.len() < SpawnPolicy::capacity(2) {
            policy.spawn(&mut items, BOUNDS, 2, &mut rng);
        }
        for item in &items {
            assert_eq!(item.position.y, 0);
            assert!(item.position.x >= 0 && item.position.x < BOUNDS.width - 1);
            assert_eq!(item.fall_timer, 0);
        }
    }

    #[test]
    fn test_zero_chance_spawns_nothing() {
        let mut rng = StdRng::seed_from_u64(3);
        let policy = SpawnPolicy {
            chance: 0,
            waves: true,
        };
        let mut items = Vec::new();
        for _ in 0..100 {
            assert_eq!(policy.spawn(&mut items, BOUNDS, 3, &mut rng), 0);
        }
        assert!(items.is_empty());
    }

    #[test]
    fn test_only_bones_come_in_groups() {
        let mut rng = StdRng::seed_from_u64(99);
        let policy = SpawnPolicy::default();
        let mut saw_wave = false;
        for _ in 0..300 {
            let mut items = Vec::new();
            let n = policy.spawn(&mut items, BOUNDS, 1, &mut rng);
            assert!((1..=MAX_WAVE).contains(&n));
            if n > 1 {
                saw_wave = true;
                assert!(items.iter().all(|i| i.kind.is_harmful()));
            }
        }
        assert!(saw_wave);
    }

    #[test]
    fn test_no_waves_when_disabled() {
        let mut rng = StdRng::seed_from_u64(5);
        let policy = SpawnPolicy {
            chance: 100,
            waves: false,
        };
        for _ in 0..300 {
            let mut items = Vec::new();
            assert_eq!(policy.spawn(&mut items, BOUNDS, 1, &mut rng), 1);
        }
    }

    #[test]
    fn test_no_waves_past_harmful_limit() {
        let mut rng = StdRng::seed_from_u64(21);
        let policy = SpawnPolicy::default();
        for _ in 0..300 {
            let mut items: Vec<FallingItem> = (0..WAVE_HARMFUL_LIMIT)
                .map(|x| FallingItem::new(Vector2I::new(x as i32, 5), ItemKind::Bone))
                .collect();
            // Difficulty 3 leaves three free slots, enough for a full wave.
            let n = policy.spawn(&mut items, BOUNDS, 3, &mut rng);
            assert_eq!(n, 1);
        }
    }
}

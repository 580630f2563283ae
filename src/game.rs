//! Game state: player, falling items, hunter, speed ramp, score and lives.

use crate::hazard::{Hazard, HazardEvent};
use crate::input::Action;
use crate::item::{FallingItem, ItemKind};
use crate::spawn::SpawnPolicy;
use crate::speed::SpeedScheduler;
use crate::vector::{Bounds, Vector2I};
use crate::{GameConfig, Movement};
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Instant;
use thiserror::Error;

/// Default playfield size in cells.
pub const WIDTH: i32 = 160;
pub const HEIGHT: i32 = 40;
/// Lives at the start of a run.
pub const START_LIVES: u32 = 3;
/// Items within this Chebyshev distance of the player are caught.
pub const CATCH_RADIUS: i32 = 1;
/// Popups float for this long before disappearing.
const POPUP_LIFETIME_MS: u32 = 1500;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    OutOfLives,
    Caught,
    Quit,
}

/// "+20" floating up from where a carrot or cabbage was caught.
#[derive(Debug, Clone)]
pub struct ScorePopup {
    pub position: Vector2I,
    pub amount: u32,
    pub kind: ItemKind,
    pub age_ms: u32,
}

#[derive(Debug)]
pub struct GameState {
    pub bounds: Bounds,
    pub movement: Movement,
    pub player: Vector2I,
    pub score: u32,
    pub lives: u32,
    /// 1..=3, fixed for the run.
    pub difficulty: u32,
    pub items: Vec<FallingItem>,
    pub hazard: Hazard,
    pub hazard_enabled: bool,
    pub spawner: SpawnPolicy,
    pub speed: SpeedScheduler,
    pub game_over: bool,
    pub end_cause: Option<EndCause>,
    pub started_at: Instant,
    pub ticks: u64,
    pub caught: u32,
    pub popups: Vec<ScorePopup>,
    rng: StdRng,
}

impl GameState {
    pub fn new(
        difficulty: u32,
        bounds: Bounds,
        config: &GameConfig,
        now: Instant,
    ) -> Result<Self, GameError> {
        if !(1..=3).contains(&difficulty) {
            return Err(GameError::InvalidConfiguration(format!(
                "difficulty {difficulty} is outside 1..=3"
            )));
        }
        if bounds.width < 2 || bounds.height < 2 {
            return Err(GameError::InvalidConfiguration(format!(
                "playfield {}x{} is smaller than 2x2",
                bounds.width, bounds.height
            )));
        }
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let hazard = Hazard::new(now, &mut rng);
        info!(
            "new run: difficulty {difficulty}, {}x{} field, seed {:?}, {:?} movement",
            bounds.width, bounds.height, config.seed, config.movement
        );
        Ok(Self {
            bounds,
            movement: config.movement,
            player: Vector2I::new(bounds.width / 2, bounds.bottom_row()),
            score: 0,
            lives: START_LIVES,
            difficulty,
            items: Vec::new(),
            hazard,
            hazard_enabled: config.hazard,
            spawner: SpawnPolicy {
                chance: config.spawn_chance.min(100),
                waves: config.waves,
            },
            speed: SpeedScheduler::new(difficulty, now, config.speed_ramp),
            game_over: false,
            end_cause: None,
            started_at: now,
            ticks: 0,
            caught: 0,
            popups: Vec::new(),
            rng,
        })
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// Current delay between ticks in ms.
    #[inline]
    pub fn game_speed(&self) -> u64 {
        self.speed.speed_ms()
    }

    /// Advance the simulation by one tick. No-op once the game is over.
    pub fn tick(&mut self, action: Action, now: Instant) {
        if self.game_over {
            return;
        }
        if action == Action::Quit {
            self.end(EndCause::Quit);
            return;
        }
        self.ticks += 1;
        self.move_player(action);
        self.advance_items();
        if self.game_over {
            return;
        }
        self.spawner
            .spawn(&mut self.items, self.bounds, self.difficulty, &mut self.rng);
        if self.speed.update(now) {
            debug!("speed up: {} ms per tick", self.speed.speed_ms());
        }
        if self.hazard_enabled {
            self.update_hazard(now);
        }
    }

    fn move_player(&mut self, action: Action) {
        let dir = match (action, self.movement) {
            (Action::MoveLeft, _) => Vector2I::new(-1, 0),
            (Action::MoveRight, _) => Vector2I::new(1, 0),
            (Action::MoveUp, Movement::Free) => Vector2I::new(0, -1),
            (Action::MoveDown, Movement::Free) => Vector2I::new(0, 1),
            _ => return,
        };
        let next = self.player + dir;
        if self.bounds.contains(next) {
            self.player = next;
        }
    }

    /// Drop every item, resolve catches, then remove caught items and those past the
    /// player's row or the bottom row in one pass.
    fn advance_items(&mut self) {
        let bottom = self.bounds.bottom_row();
        let player = self.player;
        let mut hits = Vec::new();
        self.items.retain_mut(|item| {
            item.fall();
            if item.position.chebyshev(player) <= CATCH_RADIUS {
                hits.push((item.kind, item.position));
                return false;
            }
            item.position.y <= player.y && item.position.y <= bottom
        });
        // Bones first, so a run that ends this tick banks nothing else.
        hits.sort_by_key(|(kind, _)| !kind.is_harmful());
        for (kind, at) in hits {
            self.catch(kind, at);
        }
    }

    fn catch(&mut self, kind: ItemKind, at: Vector2I) {
        // Anything else caught on the tick the last life went is discarded.
        if self.game_over {
            return;
        }
        if kind.is_harmful() {
            self.lives = self.lives.saturating_sub(1);
            debug!("hit by a bone at {at:?}, {} lives left", self.lives);
            if self.lives == 0 {
                self.end(EndCause::OutOfLives);
            }
            return;
        }
        let amount = kind.points(self.difficulty);
        self.score += amount;
        self.caught += 1;
        self.popups.push(ScorePopup {
            position: at,
            amount,
            kind,
            age_ms: 0,
        });
    }

    fn update_hazard(&mut self, now: Instant) {
        match self.hazard.update(self.player, self.bounds, now, &mut self.rng) {
            HazardEvent::Activated => {
                debug!("hunter appeared at {:?}", self.hazard.position());
            }
            HazardEvent::Expired => debug!("hunter gave up"),
            HazardEvent::Contact => {
                self.lives = 0;
                self.end(EndCause::Caught);
            }
            HazardEvent::Moved | HazardEvent::Idle => {}
        }
    }

    fn end(&mut self, cause: EndCause) {
        self.game_over = true;
        self.end_cause = Some(cause);
        info!(
            "game over ({cause:?}) after {} ticks: score {}, lives {}",
            self.ticks, self.score, self.lives
        );
    }

    pub fn tick_popups(&mut self, delta_ms: u32) {
        self.popups.retain_mut(|p| {
            let old_steps = p.age_ms / 150;
            p.age_ms += delta_ms;
            let new_steps = p.age_ms / 150;
            if new_steps > old_steps && p.position.y > 0 {
                p.position.y -= 1;
            }
            p.age_ms < POPUP_LIFETIME_MS
        });
    }
}

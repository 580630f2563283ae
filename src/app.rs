//! App: terminal init, main loop, frame pacing and key handling.

use crate::game::GameState;
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::vector::Bounds;
use crate::{Args, Difficulty, GameConfig};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::info;
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

/// Redraw cadence between ticks, so popups and the damage flash animate smoothly.
const FRAME_MS: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    GameOver,
}

/// Main menu entries, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Play(Difficulty),
    Exit,
}

impl MenuEntry {
    pub const ALL: [Self; 4] = [
        Self::Play(Difficulty::Easy),
        Self::Play(Difficulty::Medium),
        Self::Play(Difficulty::Hard),
        Self::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Play(d) => d.label(),
            Self::Exit => "Exit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    pub selected: usize,
    pub animation_start: Instant,
}

impl MenuState {
    fn new(difficulty: Difficulty) -> Self {
        Self {
            selected: MenuEntry::ALL
                .iter()
                .position(|e| *e == MenuEntry::Play(difficulty))
                .unwrap_or(0),
            animation_start: Instant::now(),
        }
    }

    pub fn entry(&self) -> MenuEntry {
        MenuEntry::ALL[self.selected % MenuEntry::ALL.len()]
    }

    fn up(&mut self) {
        self.selected = (self.selected + MenuEntry::ALL.len() - 1) % MenuEntry::ALL.len();
    }

    fn down(&mut self) {
        self.selected = (self.selected + 1) % MenuEntry::ALL.len();
    }
}

pub struct App {
    args: Args,
    config: GameConfig,
    theme: Theme,
    /// Playfield size clamped to the terminal so board + border + sidebar fit.
    bounds: Bounds,
    difficulty: Difficulty,
    state: GameState,
    screen: Screen,
    paused: bool,
    /// Latest input since the previous tick; consumed by the next tick.
    pending: Option<Action>,
    last_tick: Instant,
    last_frame: Instant,
    menu_state: MenuState,
    /// Best score this session (not persisted).
    best_score: u32,
    new_best: bool,
    /// TachyonFX flash over the playfield when a life is lost.
    damage_effect: Option<Effect>,
    damage_effect_process_time: Option<Instant>,
}

impl App {
    pub fn new(args: Args, config: GameConfig, theme: Theme) -> Result<Self> {
        let bounds = Bounds::new(i32::from(args.width.max(2)), i32::from(args.height.max(2)));
        let difficulty = args.difficulty;
        let now = Instant::now();
        let state = GameState::new(difficulty.level(), bounds, &config, now)?;
        let screen = if args.no_menu {
            Screen::Playing
        } else {
            Screen::Menu
        };
        Ok(Self {
            args,
            config,
            theme,
            bounds,
            difficulty,
            state,
            screen,
            paused: false,
            pending: None,
            last_tick: now,
            last_frame: now,
            menu_state: MenuState::new(difficulty),
            best_score: 0,
            new_best: false,
            damage_effect: None,
            damage_effect_process_time: None,
        })
    }

    fn reset_game(&mut self) -> Result<()> {
        let now = Instant::now();
        self.state = GameState::new(self.difficulty.level(), self.bounds, &self.config, now)?;
        self.screen = Screen::Playing;
        self.paused = false;
        self.pending = None;
        self.last_tick = now;
        self.new_best = false;
        self.damage_effect = None;
        self.damage_effect_process_time = None;
        Ok(())
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size},
        };

        // Size playfield to fit terminal before touching it; respect --width/--height when they fit
        let (term_cols, term_rows) = size()?;
        let fitted = fit_bounds(self.args.width, self.args.height, term_cols, term_rows);
        if fitted != self.bounds {
            info!(
                "playfield clamped to {}x{} for a {}x{} terminal",
                fitted.width, fitted.height, term_cols, term_rows
            );
            self.bounds = fitted;
            self.reset_game()?;
            if !self.args.no_menu {
                self.screen = Screen::Menu;
            }
        }

        enable_raw_mode()?;
        let result = self.enter_and_run();

        // Restore, whatever happened after raw mode was entered
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn enter_and_run(&mut self) -> Result<()> {
        let mut stdout = std::io::stdout();
        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        self.run_loop(&mut terminal)
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    &crate::ui::View {
                        screen: self.screen,
                        state: &self.state,
                        theme: &self.theme,
                        paused: self.paused,
                        menu_state: &self.menu_state,
                        best_score: self.best_score,
                        new_best: self.new_best,
                        now,
                    },
                    &mut self.damage_effect,
                    &mut self.damage_effect_process_time,
                );
            })?;

            if self.damage_effect.as_ref().is_some_and(Effect::done) {
                self.damage_effect = None;
                self.damage_effect_process_time = None;
            }

            let delta_ms = now.duration_since(self.last_frame).as_millis().min(u128::from(u32::MAX)) as u32;
            self.last_frame = now;
            self.state.tick_popups(delta_ms);

            // Frame pacer: the next tick is due one game-speed interval after the last one.
            let playing = self.screen == Screen::Playing && !self.paused;
            let tick_due = self.last_tick + self.state.speed.frame_delay();
            let timeout = if playing {
                tick_due
                    .saturating_duration_since(Instant::now())
                    .min(Duration::from_millis(FRAME_MS))
            } else {
                Duration::from_millis(FRAME_MS)
            };

            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    let Event::Key(key) = event::read()? else {
                        continue;
                    };
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }
                    let action = key_to_action(key);
                    if !self.handle_key(action, key.code)? {
                        return Ok(());
                    }
                }
            }

            if self.screen == Screen::Playing && !self.paused && Instant::now() >= tick_due {
                self.step(Instant::now());
            }
        }
    }

    /// Returns false when the app should exit.
    fn handle_key(&mut self, action: Action, code: KeyCode) -> Result<bool> {
        match self.screen {
            Screen::Menu => match action {
                Action::Quit => return Ok(false),
                Action::MoveUp | Action::MoveLeft => self.menu_state.up(),
                Action::MoveDown | Action::MoveRight => self.menu_state.down(),
                Action::Confirm => match self.menu_state.entry() {
                    MenuEntry::Play(d) => {
                        self.difficulty = d;
                        self.reset_game()?;
                    }
                    MenuEntry::Exit => return Ok(false),
                },
                _ => {}
            },
            Screen::Playing => match action {
                Action::Pause => self.paused = !self.paused,
                Action::Quit => {
                    self.state.tick(Action::Quit, Instant::now());
                    self.finish_run();
                }
                a if a.is_move() && !self.paused => self.pending = Some(a),
                _ => {}
            },
            Screen::GameOver => match (action, code) {
                (Action::Quit, _) => return Ok(false),
                (_, KeyCode::Char('r' | 'R')) => self.reset_game()?,
                (Action::Confirm, _) | (_, KeyCode::Char('m' | 'M')) => {
                    self.menu_state = MenuState::new(self.difficulty);
                    self.screen = Screen::Menu;
                }
                _ => {}
            },
        }
        Ok(true)
    }

    /// One simulation tick with the latest pending input.
    fn step(&mut self, now: Instant) {
        self.last_tick = now;
        let lives_before = self.state.lives;
        let action = self.pending.take().unwrap_or(Action::None);
        self.state.tick(action, now);
        if self.state.lives < lives_before && !self.args.no_animation {
            self.damage_effect = Some(crate::ui::damage_flash(&self.theme));
            self.damage_effect_process_time = None;
        }
        if self.state.is_over() {
            self.finish_run();
        }
    }

    fn finish_run(&mut self) {
        if self.state.score > self.best_score {
            self.best_score = self.state.score;
            self.new_best = true;
        }
        self.screen = Screen::GameOver;
    }
}

/// Requested playfield size, shrunk so board, border and sidebar fit the terminal.
fn fit_bounds(width: u16, height: u16, term_cols: u16, term_rows: u16) -> Bounds {
    let (fit_w, fit_h) = crate::ui::playfield_size_for_terminal(term_cols, term_rows);
    Bounds::new(
        i32::from(width.min(fit_w).max(2)),
        i32::from(height.min(fit_h).max(2)),
    )
}

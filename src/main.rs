//! Rabbit Catcher: catch falling carrots, dodge bones and outrun the hunter in the terminal.

mod app;
mod game;
mod hazard;
mod input;
mod item;
mod spawn;
mod speed;
mod theme;
mod ui;
mod vector;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::path::Path;

/// Rules derived from the CLI that change how the simulation plays.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub movement: Movement,
    pub hazard: bool,
    pub waves: bool,
    pub speed_ramp: bool,
    pub spawn_chance: u32,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            movement: Movement::Free,
            hazard: true,
            waves: true,
            speed_ramp: true,
            spawn_chance: 100,
            seed: None,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        init_logging(path)?;
    }
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        log::warn!("falling back to default theme: {e}");
        theme::Theme::default_for_palette(args.palette)
    });
    let config = GameConfig {
        movement: if args.classic {
            Movement::Horizontal
        } else {
            Movement::Free
        },
        hazard: !args.no_hazard,
        waves: !args.no_waves,
        speed_ramp: !args.relaxed,
        spawn_chance: args.spawn_chance.min(100),
        seed: args.seed,
    };
    let mut app = App::new(args, config, theme)?;
    app.run()?;
    Ok(())
}

/// The game owns the terminal, so log lines only go to a file.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

/// Catch carrots and cabbages, dodge bones and stay away from the hunter.
#[derive(Debug, Parser)]
#[command(
    name = "rabbit-catcher",
    version,
    about = "Real-time terminal arcade game: catch falling carrots, dodge bones, outrun the hunter.",
    long_about = "Rabbit Catcher is a real-time arcade game for the terminal.\n\n\
        Steer the rabbit to catch carrots (20 x difficulty) and cabbages (10 x difficulty). \
        Bones cost a life; lose all three and the run is over. Every so often a hunter \
        appears and chases you: if it reaches your cell the run ends at once. \
        The game speeds up every 20 seconds.\n\n\
        CONTROLS:\n  Arrows / WASD / hjkl  Move    P  Pause    Q / Esc  Quit\n\n\
        Use --classic for the bottom-row-only variant."
)]
pub struct Args {
    /// Difficulty: easy, medium or hard. Scales points, item count and starting speed.
    #[arg(short, long, default_value = "easy")]
    pub difficulty: Difficulty,

    /// Skip the main menu and start immediately.
    #[arg(long)]
    pub no_menu: bool,

    /// Playfield width in cells (clamped to the terminal).
    #[arg(long, default_value_t = game::WIDTH as u16, value_name = "COLS")]
    pub width: u16,

    /// Playfield height in cells (clamped to the terminal).
    #[arg(long, default_value_t = game::HEIGHT as u16, value_name = "ROWS")]
    pub height: u16,

    /// Classic mode: the rabbit stays on the bottom row and only moves left/right.
    #[arg(long)]
    pub classic: bool,

    /// Disable the hunter.
    #[arg(long)]
    pub no_hazard: bool,

    /// Bones always fall one at a time instead of in waves.
    #[arg(long)]
    pub no_waves: bool,

    /// Relaxed mode: the game never speeds up.
    #[arg(long)]
    pub relaxed: bool,

    /// Chance in percent that new items spawn on a given tick.
    #[arg(long, default_value = "100", value_name = "PERCENT")]
    pub spawn_chance: u32,

    /// Seed for the random generator (reproducible runs).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]="value"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Disable the damage flash.
    #[arg(long)]
    pub no_animation: bool,

    /// Write logs to this file (level from RUST_LOG, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<std::path::PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Numeric difficulty used by the scoring and capacity formulas.
    pub fn level(self) -> u32 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

/// How the rabbit may move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Movement {
    /// All four directions.
    #[default]
    Free,
    /// Left/right only, pinned to the bottom row.
    Horizontal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let args = Args::parse_from(["rabbit-catcher"]);
        assert_eq!(args.difficulty, Difficulty::Easy);
        assert_eq!(args.width, 160);
        assert_eq!(args.height, 40);
        assert_eq!(args.spawn_chance, 100);
        assert!(!args.classic);
    }

    #[test]
    fn test_cli_flags() {
        let args = Args::parse_from([
            "rabbit-catcher",
            "-d",
            "hard",
            "--classic",
            "--no-hazard",
            "--seed",
            "7",
            "--palette",
            "contrast",
        ]);
        assert_eq!(args.difficulty.level(), 3);
        assert!(args.classic);
        assert!(args.no_hazard);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.palette, Palette::HighContrast);
    }

    #[test]
    fn test_clap_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}

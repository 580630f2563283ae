//! Layout and drawing: menu, playfield, sidebar, pause and game over.

use crate::app::{MenuEntry, MenuState, Screen};
use crate::game::{EndCause, GameState};
use crate::item::ItemKind;
use crate::theme::Theme;
use crate::vector::Vector2I;
use crate::Movement;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

const SIDEBAR_WIDTH: u16 = 26;
/// Rows the sidebar sections need (stats, hunter, legend and gaps).
const SIDEBAR_HEIGHT: u16 = 22;
/// Length of the red flash after losing a life.
const DAMAGE_FLASH_MS: u32 = 350;

const PLAYER_GLYPH: &str = "@";
const HAZARD_GLYPH: &str = "&";
const HEART: &str = "♥";

/// Largest playfield (cells) that fits next to the sidebar with its border.
pub fn playfield_size_for_terminal(term_cols: u16, term_rows: u16) -> (u16, u16) {
    (
        term_cols.saturating_sub(2).saturating_sub(SIDEBAR_WIDTH),
        term_rows.saturating_sub(2),
    )
}

/// Everything the renderer reads for one frame. Never mutated by drawing.
pub struct View<'a> {
    pub screen: Screen,
    pub state: &'a GameState,
    pub theme: &'a Theme,
    pub paused: bool,
    pub menu_state: &'a MenuState,
    pub best_score: u32,
    pub new_best: bool,
    pub now: Instant,
}

/// Fade from red back to the normal colours over the playfield.
pub fn damage_flash(theme: &Theme) -> Effect {
    fx::fade_from(theme.heart, theme.heart, (DAMAGE_FLASH_MS, Interpolation::QuadOut))
}

/// Draw current screen. While a damage flash is running it is applied over the playfield.
pub fn draw(
    frame: &mut Frame,
    view: &View,
    damage_effect: &mut Option<Effect>,
    damage_process_time: &mut Option<Instant>,
) {
    let area = frame.area();
    match view.screen {
        Screen::Menu => draw_menu(frame, view, area),
        Screen::Playing => {
            let playfield = draw_game(frame, view, area);
            if view.paused {
                draw_pause_overlay(frame, view.theme, area);
            }
            if let Some(effect) = damage_effect {
                let delta = damage_process_time
                    .map(|t| view.now.saturating_duration_since(t))
                    .unwrap_or(std::time::Duration::ZERO);
                let delta_ms = delta.as_millis().min(u128::from(u32::MAX)) as u32;
                *damage_process_time = Some(view.now);
                frame.render_effect(effect, playfield, TfxDuration::from_millis(delta_ms));
            }
        }
        Screen::GameOver => {
            draw_game(frame, view, area);
            draw_game_over(frame, view, area);
        }
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_menu(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let popup_w = 40u16;
    let popup_h = 16u16;
    let popup = centered(area, popup_w, popup_h);

    let title = Line::from(vec![
        Span::styled(" Rabbit ", Style::default().fg(theme.item_color(0)).bold()),
        Span::styled(" Catcher! ", Style::default().fg(theme.main_fg).bold()),
    ]);
    let highlight = Style::default().fg(Color::Black).bg(theme.title).bold();
    let normal = Style::default().fg(theme.main_fg);

    let mut lines = vec![Line::from(""), title, Line::from("")];
    for (i, entry) in MenuEntry::ALL.iter().enumerate() {
        let selected = i == view.menu_state.selected;
        let marker = if selected { ">" } else { " " };
        let style = if selected { highlight } else { normal };
        let style = if *entry == MenuEntry::Exit && !selected {
            Style::default().fg(Color::Rgb(255, 80, 80))
        } else {
            style
        };
        lines.push(Line::from(Span::styled(
            format!(" {marker} {:<8} ", entry.label()),
            style,
        )));
    }
    lines.extend([
        Line::from(""),
        Line::from(vec![
            Span::styled(PLAYER_GLYPH, Style::default().fg(theme.player).bold()),
            Span::from(" you   "),
            Span::styled(HAZARD_GLYPH, Style::default().fg(theme.hazard).bold()),
            Span::from(" hunter"),
        ]),
        legend_line(theme),
        Line::from(""),
        Line::from(vec![
            Span::styled(" ↕ ", Style::default().fg(theme.title)),
            Span::from("SELECT   "),
            Span::styled(" ENTER ", Style::default().fg(theme.title)),
            Span::from("PLAY"),
        ]),
    ]);

    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );

    // Startup animation: slide in from bottom
    let elapsed = view
        .now
        .saturating_duration_since(view.menu_state.animation_start)
        .as_millis() as f32;
    let t = (elapsed / 400.0).min(1.0);
    let eased = 1.0 - (1.0 - t).powi(3);
    let mut anim_popup = popup;
    anim_popup.y += ((1.0 - eased) * 8.0) as u16;
    anim_popup.height = anim_popup
        .height
        .min((area.y + area.height).saturating_sub(anim_popup.y));

    p.render(anim_popup, frame.buffer_mut());
}

fn legend_line(theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    for kind in ItemKind::ALL {
        spans.push(Span::styled(
            kind.glyph(),
            Style::default().fg(theme.item_color(kind.color_index())).bold(),
        ));
        spans.push(Span::from(format!(" {}  ", kind.label().to_lowercase())));
    }
    Line::from(spans)
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered(area, 28, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P - Resume    Q - Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let state = view.state;
    let popup = centered(area, 34, 11);
    let reason = match state.end_cause {
        Some(EndCause::Caught) => " Caught by the hunter! ",
        Some(EndCause::Quit) => " Run abandoned ",
        _ => " Out of lives ",
    };
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(Span::styled(reason, Style::default().fg(theme.hazard))),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Score: {}   Best: {} ", state.score, view.best_score),
            Style::default().fg(theme.main_fg),
        )),
    ];
    if view.new_best && state.score > 0 {
        lines.push(Line::from(Span::styled(
            " New record! ",
            Style::default().fg(Color::Yellow).bold(),
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " R - Restart  M - Menu  Q - Quit ",
        Style::default().fg(theme.main_fg),
    )));
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
            .title(Span::styled(" Rabbit Catcher ", theme.title)),
    );
    p.render(popup, frame.buffer_mut());
}

/// Draw playfield + sidebar centred in the area. Returns the playfield rect (with border).
fn draw_game(frame: &mut Frame, view: &View, area: Rect) -> Rect {
    let state = view.state;
    let pw = state.bounds.width as u16 + 2;
    let ph = state.bounds.height as u16 + 2;

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(pw + SIDEBAR_WIDTH),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph.max(SIDEBAR_HEIGHT)),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);

    let playfield = Rect {
        height: ph.min(inner[0].height),
        ..inner[0]
    };
    draw_playfield(frame, view, playfield);
    draw_sidebar(frame, view, inner[1]);
    playfield
}

fn draw_playfield(frame: &mut Frame, view: &View, area: Rect) {
    let state = view.state;
    let theme = view.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg));
    let board = block.inner(area);
    block.render(area, frame.buffer_mut());

    let buf = frame.buffer_mut();
    for y in board.y..board.y + board.height {
        for x in board.x..board.x + board.width {
            buf[(x, y)].set_symbol(" ").set_style(Style::default().bg(theme.bg));
        }
    }

    let mut put = |pos: Vector2I, symbol: &str, style: Style| {
        if pos.x < 0 || pos.y < 0 {
            return;
        }
        let (x, y) = (board.x + pos.x as u16, board.y + pos.y as u16);
        if x < board.x + board.width && y < board.y + board.height {
            buf[(x, y)].set_symbol(symbol).set_style(style);
        }
    };

    for item in &state.items {
        let color = theme.item_color(item.kind.color_index());
        put(
            item.position,
            item.kind.glyph(),
            Style::default().fg(color).bg(theme.bg).bold(),
        );
    }
    put(
        state.player,
        PLAYER_GLYPH,
        Style::default().fg(theme.player).bg(theme.bg).bold(),
    );
    if let Some(pos) = state.hazard.position() {
        put(
            pos,
            HAZARD_GLYPH,
            Style::default().fg(theme.hazard).bg(theme.bg).bold(),
        );
    }

    for popup in &state.popups {
        let x = board.x + popup.position.x.max(0) as u16;
        let y = board.y + popup.position.y.max(0) as u16;
        if x < board.x + board.width && y < board.y + board.height {
            let label = format!("+{}", popup.amount);
            let max_len = (board.x + board.width - x) as usize;
            let label: String = label.chars().take(max_len).collect();
            let color = theme.item_color(popup.kind.color_index());
            frame
                .buffer_mut()
                .set_string(x, y, label, Style::default().fg(color).bg(theme.bg).bold());
        }
    }
}

fn draw_sidebar(frame: &mut Frame, view: &View, area: Rect) {
    let state = view.state;
    let theme = view.theme;
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Stats
            Constraint::Length(1), // gap
            Constraint::Length(5), // Hunter
            Constraint::Length(1), // gap
            Constraint::Length(6), // Legend
        ])
        .split(area);

    // --- Stats ---
    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" Rabbit Catcher ", title_style));
    let stats_inner = stats_block.inner(chunks[0]);
    stats_block.render(chunks[0], frame.buffer_mut());
    let hearts = HEART.repeat(state.lives as usize);
    let elapsed = view.now.saturating_duration_since(state.started_at).as_secs();
    let mode = match state.movement {
        Movement::Free => "free",
        Movement::Horizontal => "classic",
    };
    let stats_lines = vec![
        Line::from(vec![
            Span::styled("Lives: ", title_style),
            Span::styled(hearts, Style::default().fg(theme.heart)),
        ]),
        Line::from(vec![
            Span::styled("Score: ", title_style),
            Span::styled(state.score.to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Best: ", title_style),
            Span::styled(view.best_score.to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Difficulty: ", title_style),
            Span::styled(format!("{} ({mode})", state.difficulty), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Speed: ", title_style),
            Span::styled(format!("{} ms", state.game_speed()), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Time: ", title_style),
            Span::styled(format!("{:02}:{:02}", elapsed / 60, elapsed % 60), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Caught: ", title_style),
            Span::styled(state.caught.to_string(), fg_style),
        ]),
    ];
    Paragraph::new(Text::from(stats_lines)).render(stats_inner, frame.buffer_mut());

    // --- Hunter: remaining chase time ---
    let hunter_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let hunter_inner = hunter_block.inner(chunks[2]);
    hunter_block.render(chunks[2], frame.buffer_mut());
    let hunter_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(hunter_inner);
    let (label, ratio) = if !state.hazard_enabled {
        (Span::styled("Hunter: off", Style::default().fg(theme.inactive_fg)), 0.0)
    } else if let Some(left) = state.hazard.remaining(view.now) {
        let ratio = left.as_secs_f64() / state.hazard.lifespan.as_secs_f64().max(f64::EPSILON);
        (
            Span::styled(
                format!("Hunter: {}s left", left.as_secs() + 1),
                Style::default().fg(theme.hazard).bold(),
            ),
            ratio.clamp(0.0, 1.0),
        )
    } else {
        (Span::styled("Hunter: lurking", Style::default().fg(theme.inactive_fg)), 0.0)
    };
    Paragraph::new(Line::from(label)).render(hunter_layout[0], frame.buffer_mut());
    Gauge::default()
        .ratio(ratio)
        .gauge_style(Style::default().fg(theme.hazard))
        .render(hunter_layout[1], frame.buffer_mut());

    // --- Legend ---
    let legend_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let legend_inner = legend_block.inner(chunks[4]);
    legend_block.render(chunks[4], frame.buffer_mut());
    let mut legend: Vec<Line> = ItemKind::ALL
        .iter()
        .map(|kind| {
            let effect = if kind.is_harmful() {
                "-1 life".to_string()
            } else {
                format!("+{}", kind.points(state.difficulty))
            };
            Line::from(vec![
                Span::styled(
                    kind.glyph(),
                    Style::default().fg(theme.item_color(kind.color_index())).bold(),
                ),
                Span::styled(format!(" {:<8}{effect}", kind.label()), fg_style),
            ])
        })
        .collect();
    legend.push(Line::from(Span::styled(
        "P pause  Q quit",
        Style::default().fg(theme.inactive_fg),
    )));
    Paragraph::new(Text::from(legend)).render(legend_inner, frame.buffer_mut());
}

//! Layout and drawing: board, active piece, next preview, score, game-over panel.

use crate::app::Screen;
use crate::catalog::Rgba;
use crate::game::Game;
use crate::piece::Occupancy;
use crate::theme::{Theme, to_color};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Each board cell is two terminal columns wide so tiles look square.
const CELL_WIDTH: u16 = 2;
/// Next-piece preview is a fixed 4×4 cell canvas.
const PREVIEW_CELLS: u16 = 4;
const SIDEBAR_WIDTH: u16 = PREVIEW_CELLS * CELL_WIDTH + 6;
/// Board fade on game over.
const GAME_OVER_FADE_MS: u32 = 600;

const TILE: &str = "[]";
const EMPTY: &str = "  ";

/// Playfield size including border, in terminal cells.
fn playfield_size(game: &Game) -> (u16, u16) {
    let w = u16::try_from(game.board.width()).unwrap_or(u16::MAX);
    let h = u16::try_from(game.board.height()).unwrap_or(u16::MAX);
    (w.saturating_mul(CELL_WIDTH).saturating_add(2), h.saturating_add(2))
}

/// Smallest terminal (cols, rows) that shows the playfield and sidebar unclipped.
pub fn required_area(game: &Game) -> (u16, u16) {
    let (pw, ph) = playfield_size(game);
    (pw.saturating_add(SIDEBAR_WIDTH), ph.max(PREVIEW_CELLS + 6))
}

/// Split `area` into centred playfield and sidebar rects.
fn layout(area: Rect, game: &Game) -> (Rect, Rect) {
    let (pw, ph) = playfield_size(game);
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(pw),
            Constraint::Length(SIDEBAR_WIDTH),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = |r: Rect| {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Fill(1), Constraint::Length(ph), Constraint::Fill(1)])
            .split(r)[1]
    };
    (vert(horiz[1]), vert(horiz[2]))
}

/// Board grid inside the playfield border.
pub fn board_rect(area: Rect, game: &Game) -> Rect {
    let (playfield, _) = layout(area, game);
    Rect {
        x: playfield.x + 1,
        y: playfield.y + 1,
        width: playfield.width.saturating_sub(2),
        height: playfield.height.saturating_sub(2),
    }
}

/// Tile style: the piece colour framing a lighter centre (half-alpha colour
/// over white).
fn tile_style(color: Rgba) -> Style {
    let inner = color.with_alpha(128).over(Rgba::rgb(255, 255, 255));
    Style::default().fg(to_color(inner)).bg(to_color(color))
}

/// Paint one cell at grid position (gx, gy) inside `rect`; clipped to `rect`.
fn paint_cell(buf: &mut Buffer, rect: Rect, gx: i32, gy: i32, style: Style, symbol: &str) {
    if gx < 0 || gy < 0 {
        return;
    }
    let x = rect.x + gx as u16 * CELL_WIDTH;
    let y = rect.y + gy as u16;
    if x + CELL_WIDTH <= rect.x + rect.width && y < rect.y + rect.height {
        buf.set_string(x, y, symbol, style);
    }
}

fn paint_occupancy(buf: &mut Buffer, rect: Rect, occupancy: &Occupancy, ox: i32, oy: i32) {
    for (y, row) in occupancy.iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            if let Some(cell) = cell {
                paint_cell(buf, rect, ox + x as i32, oy + y as i32, tile_style(cell.color), TILE);
            }
        }
    }
}

/// Draw the current screen. On game over the board fades (TachyonFX) under
/// the score panel; `effect` / `effect_time` carry the fade between frames.
pub fn draw(
    frame: &mut Frame,
    game: &Game,
    theme: &Theme,
    screen: Screen,
    effect: &mut Option<Effect>,
    effect_time: &mut Option<Instant>,
    now: Instant,
) {
    let area = frame.area();
    let bg = Style::default().bg(to_color(theme.bg));
    Block::default().style(bg).render(area, frame.buffer_mut());

    let (playfield, sidebar) = layout(area, game);
    draw_playfield(frame, game, theme, playfield);
    draw_sidebar(frame, game, theme, sidebar);

    if screen == Screen::GameOver {
        apply_game_over_effect(frame, game, theme, effect, effect_time, now);
        draw_game_over(frame, game, theme, playfield);
    }
}

fn draw_playfield(frame: &mut Frame, game: &Game, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(to_color(theme.div_line)).bg(to_color(theme.bg)))
        .title(Span::styled(" falltris ", Style::default().fg(to_color(theme.title))));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let buf = frame.buffer_mut();
    let empty = Style::default().bg(to_color(theme.bg));
    for (y, row) in game.board.rows().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let (style, symbol) = match cell {
                Some(cell) => (tile_style(cell.color), TILE),
                None => (empty, EMPTY),
            };
            paint_cell(buf, inner, x as i32, y as i32, style, symbol);
        }
    }

    if let Some(piece) = &game.active {
        paint_occupancy(buf, inner, piece.occupancy(), piece.x, piece.y);
    }
}

fn draw_sidebar(frame: &mut Frame, game: &Game, theme: &Theme, area: Rect) {
    let border_style = Style::default().fg(to_color(theme.div_line)).bg(to_color(theme.bg));
    let title_style = Style::default().fg(to_color(theme.title));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(PREVIEW_CELLS + 2),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .split(area);

    let next_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" Next ", title_style));
    let next_inner = next_block.inner(chunks[0]);
    next_block.render(chunks[0], frame.buffer_mut());
    let canvas = Rect {
        x: next_inner.x + next_inner.width.saturating_sub(PREVIEW_CELLS * CELL_WIDTH) / 2,
        y: next_inner.y,
        width: (PREVIEW_CELLS * CELL_WIDTH).min(next_inner.width),
        height: PREVIEW_CELLS.min(next_inner.height),
    };
    paint_occupancy(frame.buffer_mut(), canvas, game.next.occupancy(), 0, 0);

    let score_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" Score ", title_style));
    Paragraph::new(Line::from(Span::styled(
        game.score.to_string(),
        Style::default().fg(to_color(theme.main_fg)).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(score_block)
    .render(chunks[2], frame.buffer_mut());
}

/// Fade the board toward a dim alert tint. The effect never completes so the
/// board stays dimmed behind the panel.
fn apply_game_over_effect(
    frame: &mut Frame,
    game: &Game,
    theme: &Theme,
    effect: &mut Option<Effect>,
    effect_time: &mut Option<Instant>,
    now: Instant,
) {
    let board = board_rect(frame.area(), game);
    let delta = effect_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u128::from(u32::MAX)) as u32;
    *effect_time = Some(now);

    if effect.is_none() {
        let fg = to_color(theme.alert);
        let bg = to_color(theme.alert.with_alpha(48).over(theme.bg));
        let fade = fx::fade_to(fg, bg, (GAME_OVER_FADE_MS, Interpolation::Linear)).with_area(board);
        *effect = Some(fx::never_complete(fade));
    }
    if let Some(effect) = effect {
        frame.render_effect(effect, board, TfxDuration::from_millis(delta_ms));
    }
}

fn draw_game_over(frame: &mut Frame, game: &Game, theme: &Theme, playfield: Rect) {
    let popup_w = playfield.width.saturating_sub(2).max(16);
    let popup_h = 7u16;
    let area = frame.area();
    let popup = Rect {
        x: playfield.x + playfield.width.saturating_sub(popup_w) / 2,
        y: playfield.y + playfield.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    }
    .intersection(area);
    let fg = Style::default().fg(to_color(theme.main_fg));
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default()
                .fg(to_color(theme.bg))
                .bg(to_color(theme.alert))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(format!(" Score: {} ", game.score), fg)),
        Line::from(Span::styled(" R Restart  Q Quit ", fg)),
    ];
    Clear.render(popup, frame.buffer_mut());
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(to_color(theme.div_line)).bg(to_color(theme.bg)))
                .style(Style::default().bg(to_color(theme.bg))),
        )
        .render(popup, frame.buffer_mut());
}

/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable frame of the
/// round.  No game logic is performed; this module only translates the
/// frame into terminal commands and maps terminal cells back to play-area
/// pixels for mouse clicks.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use shooting_gallery::entities::{Frame, GameOverReason, Target, TargetKind};
use shooting_gallery::session::Renderer;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_AMMO: Color = Color::White;
const C_HUD_AMMO_EMPTY: Color = Color::Red;
const C_HUD_TIME: Color = Color::Cyan;
const C_TARGET_NORMAL: Color = Color::Green;
const C_TARGET_FAST: Color = Color::Yellow;
const C_TARGET_FAKE: Color = Color::Magenta;
const C_TARGET_BONUS: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

// ── Cell ↔ pixel mapping ─────────────────────────────────────────────────────

/// Terminal geometry.  The play area occupies rows `2..height-2` and
/// columns `1..width-1`; the rest is HUD, border and hint line.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    fn play_cols(&self) -> f32 {
        self.width.saturating_sub(2).max(1) as f32
    }

    fn play_rows(&self) -> f32 {
        self.height.saturating_sub(4).max(1) as f32
    }

    /// Play-area pixel → terminal cell (may lie outside the play area).
    fn to_cell(&self, frame: &Frame<'_>, px: f32, py: f32) -> (i32, i32) {
        let col = 1.0 + px / frame.screen_width * self.play_cols();
        let row = 2.0 + py / frame.screen_height * self.play_rows();
        (col.floor() as i32, row.floor() as i32)
    }

    /// Terminal cell → play-area pixel at the cell's centre.  `None` for
    /// cells outside the play area.
    pub fn to_play(&self, col: u16, row: u16, screen_width: f32, screen_height: f32) -> Option<(f32, f32)> {
        let (c, r) = (col as i32 - 1, row as i32 - 2);
        if c < 0 || r < 0 || c as f32 >= self.play_cols() || r as f32 >= self.play_rows() {
            return None;
        }
        let px = (c as f32 + 0.5) / self.play_cols() * screen_width;
        let py = (r as f32 + 0.5) / self.play_rows() * screen_height;
        Some((px, py))
    }

    fn in_play(&self, col: i32, row: i32) -> bool {
        col >= 1
            && row >= 2
            && (col as f32) < 1.0 + self.play_cols()
            && (row as f32) < 2.0 + self.play_rows()
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

pub struct TerminalRenderer<W: Write> {
    out: W,
    viewport: Viewport,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, viewport: Viewport) -> Self {
        Self { out, viewport }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, frame: &Frame<'_>) -> std::io::Result<()> {
        render(&mut self.out, self.viewport, frame)
    }
}

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, view: Viewport, frame: &Frame<'_>) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, view, frame)?;

    for target in frame.targets.iter().filter(|t| !t.hit) {
        draw_target(out, view, frame, target)?;
    }

    draw_controls_hint(out, view)?;

    if frame.paused {
        draw_centered(out, view, view.height / 2, "║  PAUSED  ║", Color::White)?;
    }
    if frame.game_over {
        draw_game_over(out, view, frame)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: Viewport, frame: &Frame<'_>) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>5}", frame.score)))?;

    // Ammo, centred; red once empty
    let ammo_str = format!(
        "Ammo: {}{}",
        "●".repeat(frame.ammo as usize),
        "○".repeat(frame.max_ammo.saturating_sub(frame.ammo) as usize)
    );
    let ax = (view.width / 2).saturating_sub(ammo_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(ax, 0))?;
    out.queue(style::SetForegroundColor(if frame.ammo > 0 {
        C_HUD_AMMO
    } else {
        C_HUD_AMMO_EMPTY
    }))?;
    out.queue(Print(&ammo_str))?;

    // Time, right-aligned
    let time_str = match frame.time_limit_seconds {
        Some(limit) => format!("Time: {}s / {}s", frame.elapsed_seconds, limit),
        None => format!("Time: {}s", frame.elapsed_seconds),
    };
    let tx = view
        .width
        .saturating_sub(time_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(tx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TIME))?;
    out.queue(Print(&time_str))?;

    Ok(())
}

// ── Targets ───────────────────────────────────────────────────────────────────

fn target_style(kind: TargetKind) -> (Color, char) {
    match kind {
        TargetKind::Normal => (C_TARGET_NORMAL, '▓'),
        TargetKind::Fast => (C_TARGET_FAST, '≫'),
        TargetKind::Fake => (C_TARGET_FAKE, '✕'),
        TargetKind::Bonus => (C_TARGET_BONUS, '★'),
    }
}

/// Draw a target as a block of glyphs covering its bounding box, clipped to
/// the play area.
fn draw_target<W: Write>(
    out: &mut W,
    view: Viewport,
    frame: &Frame<'_>,
    target: &Target,
) -> std::io::Result<()> {
    let (left, top) = view.to_cell(frame, target.x, target.y);
    let (right, bottom) = view.to_cell(
        frame,
        target.x + frame.target_width,
        target.y + frame.target_height,
    );
    let (color, glyph) = target_style(target.kind);
    out.queue(style::SetForegroundColor(color))?;

    for row in top..bottom.max(top + 1) {
        for col in left..right.max(left + 1) {
            if view.in_play(col, row) {
                out.queue(cursor::MoveTo(col as u16, row as u16))?;
                out.queue(Print(glyph))?;
            }
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("CLICK : Shoot   P / SPACE : Pause   Q : Quit"))?;
    Ok(())
}

fn draw_centered<W: Write>(
    out: &mut W,
    view: Viewport,
    row: u16,
    msg: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (view.width / 2).saturating_sub(msg.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(msg))?;
    Ok(())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

pub fn draw_menu<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let cy = view.height / 2;

    draw_centered(out, view, cy.saturating_sub(4), "◎  SHOOTING  GALLERY  ◎", Color::Cyan)?;
    draw_centered(out, view, cy.saturating_sub(1), "Click or press any key to start", Color::White)?;

    let legend: &[(TargetKind, &str)] = &[
        (TargetKind::Normal, " Normal  +1"),
        (TargetKind::Fast, " Fast    +2"),
        (TargetKind::Fake, " Fake    -1"),
        (TargetKind::Bonus, " Bonus   +3, +1 ammo"),
    ];
    for (i, (kind, desc)) in legend.iter().enumerate() {
        let (color, glyph) = target_style(*kind);
        let row = cy + 1 + i as u16;
        out.queue(cursor::MoveTo((view.width / 2).saturating_sub(10), row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(*desc))?;
    }

    draw_centered(out, view, cy + 6, "Q : Quit", C_HINT)?;
    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, view: Viewport, frame: &Frame<'_>) -> std::io::Result<()> {
    let reason = match frame.game_over_reason {
        Some(GameOverReason::TimeUp) => "Time is up",
        Some(GameOverReason::OutOfAmmo) | None => "Out of ammo",
    };
    let score_line = format!("Your score: {:>5}", frame.score);

    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║     GAME  OVER     ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];
    let start_row = (view.height / 2).saturating_sub(3);
    for (i, (msg, color)) in lines.iter().enumerate() {
        draw_centered(out, view, start_row + i as u16, msg, *color)?;
    }
    let next = start_row + lines.len() as u16;
    draw_centered(out, view, next, reason, Color::DarkGrey)?;
    draw_centered(out, view, next + 1, &score_line, Color::Yellow)?;
    Ok(())
}

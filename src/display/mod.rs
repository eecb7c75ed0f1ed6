//! Rendering layer.  All terminal I/O lives here.
//!
//! The simulation calls into `Terminal` through the `Hooks` trait.  No game
//! logic is performed; this module only translates the entity snapshot into
//! terminal commands, scaling the 800x600 playfield onto the terminal grid.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use invaders_sim::entities::{Entity, EntityKind};
use invaders_sim::hooks::{Hooks, SimView};
use invaders_sim::SimConfig;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_PLAYER: Color = Color::White;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_METEOR: Color = Color::DarkYellow;
const C_EXPLOSION: Color = Color::Red;
const C_MESSAGE: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

/// Frames each alien sprite frame stays up before swapping.
const ALIEN_FRAME_TICKS: u64 = 10;

/// Terminal-backed presentation collaborator.
pub struct Terminal<W: Write> {
    out: W,
    width: u16,
    height: u16,
    field_width: f64,
    field_height: f64,
    /// Renderer-local frame counter, drives cosmetic sprite swapping only.
    frame: u64,
    error: Option<io::Error>,
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W, config: &SimConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self {
            out,
            width,
            height,
            field_width: config.field_width,
            field_height: config.field_height,
            frame: 0,
            error: None,
        })
    }

    /// Surface the first I/O error raised inside a hook.
    pub fn take_error(&mut self) -> io::Result<()> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Map a playfield position to a terminal cell inside the border.
    fn cell(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        let inner_w = f64::from(self.width.saturating_sub(2));
        let inner_h = f64::from(self.height.saturating_sub(4));
        let col = 1.0 + (x / self.field_width) * inner_w;
        let row = 2.0 + (y / self.field_height) * inner_h;
        let in_bounds = col >= 1.0 && col < inner_w + 1.0 && row >= 2.0 && row < inner_h + 2.0;
        in_bounds.then(|| (col as u16, row as u16))
    }

    fn draw(&mut self, view: &SimView<'_>) -> io::Result<()> {
        self.frame += 1;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        self.draw_border()?;
        self.draw_hud(view)?;
        for entity in view.living() {
            self.draw_entity(entity)?;
        }
        if view.waiting {
            self.draw_message(view.message)?;
        }
        self.draw_controls_hint()?;

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.height.saturating_sub(1)))?;
        self.out.flush()
    }

    // ── Border ────────────────────────────────────────────────────────────────

    fn draw_border(&mut self) -> io::Result<()> {
        let w = self.width as usize;
        let h = self.height;

        self.out.queue(style::SetForegroundColor(C_BORDER))?;

        self.out.queue(cursor::MoveTo(0, 1))?;
        self.out
            .queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

        self.out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
        self.out
            .queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

        for row in 2..h.saturating_sub(2) {
            self.out.queue(cursor::MoveTo(0, row))?;
            self.out.queue(Print("│"))?;
            self.out.queue(cursor::MoveTo(self.width.saturating_sub(1), row))?;
            self.out.queue(Print("│"))?;
        }
        Ok(())
    }

    // ── HUD (row 0) ───────────────────────────────────────────────────────────

    fn draw_hud(&mut self, view: &SimView<'_>) -> io::Result<()> {
        let level_str = format!("Level : {}", view.level_label());
        let level_color = match view.level.number() {
            1 => Color::Red,
            2 => Color::DarkYellow,
            _ => Color::Green,
        };
        let lx = self
            .width
            .saturating_sub(level_str.chars().count() as u16 + 1);
        self.out.queue(cursor::MoveTo(lx, 0))?;
        self.out.queue(style::SetForegroundColor(level_color))?;
        self.out.queue(Print(&level_str))?;
        Ok(())
    }

    // ── Entities ──────────────────────────────────────────────────────────────

    fn draw_entity(&mut self, entity: &Entity) -> io::Result<()> {
        let Some((col, row)) = self.cell(entity.x, entity.y) else {
            return Ok(());
        };
        let alt = (self.frame / ALIEN_FRAME_TICKS) % 2 == 1;
        let (glyph, color) = match entity.kind() {
            EntityKind::Ship => ("/▲\\", C_PLAYER),
            EntityKind::Alien => {
                let color = match entity.asset.0 {
                    "alien_level_1" => Color::Green,
                    "alien_level_2" => Color::Magenta,
                    _ => Color::Red,
                };
                (if alt { ">▼<" } else { "<▼>" }, color)
            }
            EntityKind::PlayerShot => ("║", C_BULLET_PLAYER),
            EntityKind::AlienShot => ("↓", C_BULLET_ENEMY),
            EntityKind::Meteor => ("@", C_METEOR),
            EntityKind::Explosion => ("*", C_EXPLOSION),
        };
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(color))?;
        self.out.queue(Print(glyph))?;
        Ok(())
    }

    // ── Message overlay ───────────────────────────────────────────────────────

    fn draw_message(&mut self, message: &str) -> io::Result<()> {
        let cx = self.width / 2;
        let row = (self.height / 2).saturating_sub(1);
        for (i, line) in [message, "Press any key"].iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let col = cx.saturating_sub(line.chars().count() as u16 / 2);
            self.out.queue(cursor::MoveTo(col, row + 2 * i as u16))?;
            self.out.queue(style::SetForegroundColor(C_MESSAGE))?;
            self.out.queue(Print(*line))?;
        }
        Ok(())
    }

    // ── Controls hint (last row) ──────────────────────────────────────────────

    fn draw_controls_hint(&mut self) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(1, self.height.saturating_sub(1)))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out
            .queue(Print("← → / A D : Move   SPACE : Shoot   P : Pause   Q : Quit"))?;
        Ok(())
    }
}

impl<W: Write> Hooks for Terminal<W> {
    fn render(&mut self, view: &SimView<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.draw(view) {
            self.error = Some(err);
        }
    }

    fn explosion(&mut self, x: f64, y: f64) {
        tracing::trace!(x, y, "explosion");
    }

    fn game_over(&mut self, message: &str) {
        tracing::info!(message, "game over shown");
    }

    fn win(&mut self, message: &str) {
        tracing::info!(message, "win shown");
    }
}

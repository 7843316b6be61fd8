/// Rendering layer.  All terminal I/O lives here.
///
/// The session is rasterised into a character buffer every frame and only the
/// cells that differ from the previously emitted frame are written out.  No
/// game logic is performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::config::{HEIGHT, WIDTH};
use crate::entities::{AlienKind, GameSession, GameStatus};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_GROUND: Color = Color::DarkGrey;
const C_SHIP: Color = Color::White;
const C_ALIEN_TOP: Color = Color::Red;
const C_ALIEN_MIDDLE: Color = Color::Yellow;
const C_ALIEN_BOTTOM: Color = Color::Green;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ALIEN: Color = Color::Magenta;
const C_SCORE: Color = Color::Yellow;
const C_BANNER_WON: Color = Color::Green;
const C_BANNER_LOST: Color = Color::Red;

// ── Glyphs ────────────────────────────────────────────────────────────────────

const GROUND: char = '-';
const SHIP_SPRITE: &str = "/#\\";
const PLAYER_BULLET: &str = "o";
const ALIEN_BULLET: &str = "x";

const WON_BANNER: &str = "You Won! Press 'r' to play again or 'q' to quit";
const LOST_BANNER: &str = "Game Over! Press 'r' to restart or 'q' to quit";

fn alien_sprite(kind: AlienKind) -> (&'static str, Color) {
    match kind {
        AlienKind::Top => ("/o  o\\", C_ALIEN_TOP),
        AlienKind::Middle => ("  oo  \n<xxxx>", C_ALIEN_MIDDLE),
        AlienKind::Bottom => (" xxxx \n /oo\\", C_ALIEN_BOTTOM),
    }
}

// ── Frame buffer ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        color: Color::Reset,
    };

    /// Matches no drawable cell; marks screen contents as unknown.
    const UNKNOWN: Cell = Cell {
        ch: '\0',
        color: Color::Reset,
    };
}

/// A fixed-size grid of cells, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Cell::BLANK)
    }

    fn filled(width: usize, height: usize, cell: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![cell; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    pub fn get(&self, col: i32, row: i32) -> Option<Cell> {
        self.index(col, row).map(|i| self.cells[i])
    }

    /// Write one cell.  Coordinates outside the grid are ignored.
    pub fn set(&mut self, col: i32, row: i32, cell: Cell) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = cell;
        }
    }

    /// Blank every cell and lay the ground along the bottom row.
    pub fn clear(&mut self) {
        let ground_start = self.width * self.height.saturating_sub(1);
        for (i, cell) in self.cells.iter_mut().enumerate() {
            *cell = if i >= ground_start {
                Cell {
                    ch: GROUND,
                    color: C_GROUND,
                }
            } else {
                Cell::BLANK
            };
        }
    }

    /// Stamp a sprite with its top-left corner at `(x, y)`.  Each `\n`
    /// separated line lands on row `y + i`; anything off-grid is clipped.
    pub fn stamp(&mut self, x: i32, y: i32, sprite: &str, color: Color) {
        for (i, line) in sprite.split('\n').enumerate() {
            let row = y + i as i32;
            for (j, ch) in line.chars().enumerate() {
                self.set(x + j as i32, row, Cell { ch, color });
            }
        }
    }

    /// The glyphs of one row as a string, colours dropped.  `None` past the
    /// bottom of the grid.
    pub fn row_text(&self, row: usize) -> Option<String> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        Some(self.cells[start..start + self.width].iter().map(|c| c.ch).collect())
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

/// Double-buffered differential renderer.
pub struct Renderer {
    current: FrameBuffer,
    previous: FrameBuffer,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// The first `draw` after construction repaints every cell.
    pub fn new() -> Self {
        let (w, h) = (WIDTH as usize, HEIGHT as usize);
        Self {
            current: FrameBuffer::new(w, h),
            previous: FrameBuffer::filled(w, h, Cell::UNKNOWN),
        }
    }

    /// The most recently rasterised frame.
    pub fn frame(&self) -> &FrameBuffer {
        &self.current
    }

    /// Rebuild the current buffer from the session without emitting anything.
    pub fn rasterize(&mut self, state: &GameSession) {
        let frame = &mut self.current;
        frame.clear();

        if !state.status.is_over() {
            frame.stamp(state.ship.pos.x, state.ship.pos.y, SHIP_SPRITE, C_SHIP);
        }

        for b in state.player_bullets.iter().filter(|b| b.active) {
            frame.stamp(b.pos.x, b.pos.y, PLAYER_BULLET, C_BULLET_PLAYER);
        }
        for b in state.alien_bullets.iter().filter(|b| b.active) {
            frame.stamp(b.pos.x, b.pos.y, ALIEN_BULLET, C_BULLET_ALIEN);
        }

        for alien in state.aliens.iter().filter(|a| a.alive) {
            let (sprite, color) = alien_sprite(alien.kind);
            frame.stamp(alien.pos.x, alien.pos.y, sprite, color);
        }

        // Stamping clips the score to the frame width
        frame.stamp(0, 0, &format!("Score: {}", state.score), C_SCORE);

        if let GameStatus::GameOver { won } = state.status {
            let (banner, color) = if won {
                (WON_BANNER, C_BANNER_WON)
            } else {
                (LOST_BANNER, C_BANNER_LOST)
            };
            let width = frame.width() as i32;
            let start = (width / 2 - banner.chars().count() as i32 / 2).max(0);
            frame.stamp(start, frame.height() as i32 / 2, banner, color);
        }
    }

    /// Render one frame, writing only the cells that changed since the last
    /// call.  Returns the number of cells written.
    pub fn draw<W: Write>(&mut self, out: &mut W, state: &GameSession) -> std::io::Result<usize> {
        self.rasterize(state);

        let mut written = 0;
        let mut pen: Option<Color> = None;
        for row in 0..self.current.height {
            for col in 0..self.current.width {
                let i = row * self.current.width + col;
                let cell = self.current.cells[i];
                if cell == self.previous.cells[i] {
                    continue;
                }
                if pen != Some(cell.color) {
                    out.queue(style::SetForegroundColor(cell.color))?;
                    pen = Some(cell.color);
                }
                out.queue(cursor::MoveTo(col as u16, row as u16))?;
                out.queue(Print(cell.ch))?;
                self.previous.cells[i] = cell;
                written += 1;
            }
        }

        if written > 0 {
            out.queue(style::ResetColor)?;
        }
        out.flush()?;
        Ok(written)
    }
}

// ── Screen setup / teardown ───────────────────────────────────────────────────

/// Clear the screen and hide the cursor before the first frame.
pub fn begin<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::Hide)?;
    out.flush()
}

/// Clear the screen and bring the cursor back on the way out.
pub fn finish<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.queue(style::ResetColor)?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(cursor::Show)?;
    out.flush()
}

//! Terminal renderer
//!
//! Rasterizes a [`FrameView`] into a grid of colored character cells scaled
//! to the terminal, then writes it out with crossterm. The top line holds the
//! HUD; the rest is the playfield.

use std::io::Write;

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
};

use super::view::{FrameView, HINT, Rgb, colors, shade};
use crate::consts::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::sim::Rect;

/// Smallest terminal the playfield can be drawn in
pub const MIN_COLS: u16 = 40;
pub const MIN_ROWS: u16 = 12;

/// Mapping between terminal cells and world units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Terminal columns
    pub cols: u16,
    /// Terminal rows, including the HUD line
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    pub fn is_usable(&self) -> bool {
        self.cols >= MIN_COLS && self.rows >= MIN_ROWS
    }

    /// Rows available to the playfield
    pub fn field_rows(&self) -> u16 {
        self.rows.saturating_sub(1)
    }

    fn scale_x(&self) -> f32 {
        self.cols as f32 / WINDOW_WIDTH
    }

    fn scale_y(&self) -> f32 {
        self.field_rows() as f32 / WINDOW_HEIGHT
    }

    /// World x at the center of a terminal column
    pub fn world_x(&self, column: u16) -> f32 {
        (column as f32 + 0.5) * WINDOW_WIDTH / self.cols.max(1) as f32
    }

    /// Width of one column in world units
    pub fn cell_width(&self) -> f32 {
        WINDOW_WIDTH / self.cols.max(1) as f32
    }

    /// Cell span covered by a world rect, clipped to the playfield.
    /// Returns None if nothing of it is visible.
    fn cell_span(&self, rect: &Rect) -> Option<(u16, u16, u16, u16)> {
        let (sx, sy) = (self.scale_x(), self.scale_y());
        let c0 = (rect.left() * sx).floor().max(0.0);
        let c1 = ((rect.right() * sx).ceil() - 1.0).min(self.cols as f32 - 1.0);
        let r0 = (rect.top() * sy).floor().max(0.0);
        let r1 = ((rect.bottom() * sy).ceil() - 1.0).min(self.field_rows() as f32 - 1.0);
        if c1 < c0 || r1 < r0 {
            return None;
        }
        Some((c0 as u16, c1 as u16, r0 as u16, r1 as u16))
    }
}

/// One character cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: colors::FOREGROUND,
        }
    }
}

/// A rasterized frame: `rows` lines of `cols` cells, HUD line first
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub cols: u16,
    pub rows: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols as usize * rows as usize],
        }
    }

    pub fn get(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row as usize * self.cols as usize + col as usize)
    }

    fn set(&mut self, col: u16, row: u16, cell: Cell) {
        if col < self.cols && row < self.rows {
            self.cells[row as usize * self.cols as usize + col as usize] = cell;
        }
    }

    /// Write text starting at (col, row), clipped at the right edge
    pub fn text(&mut self, col: u16, row: u16, text: &str, fg: Rgb) {
        for (i, ch) in text.chars().enumerate() {
            self.set(col.saturating_add(i as u16), row, Cell { ch, fg });
        }
    }

    /// The characters of one line, for tests and debugging
    pub fn line(&self, row: u16) -> String {
        (0..self.cols)
            .filter_map(|col| self.get(col, row).map(|c| c.ch))
            .collect()
    }

    /// Fill the cells a world rect covers (playfield starts on row 1)
    fn fill(&mut self, viewport: &Viewport, rect: &Rect, ch: char, fg: Rgb) {
        if let Some((c0, c1, r0, r1)) = viewport.cell_span(rect) {
            for row in r0..=r1 {
                for col in c0..=c1 {
                    self.set(col, row + 1, Cell { ch, fg });
                }
            }
        }
    }
}

/// Rasterize a view for the given terminal size
pub fn rasterize(view: &FrameView, viewport: Viewport, fps: Option<u32>) -> Canvas {
    let mut canvas = Canvas::new(viewport.cols, viewport.rows);

    if !viewport.is_usable() {
        canvas.text(0, 0, "Terminal too small", colors::FOREGROUND);
        return canvas;
    }

    // Neighbouring bricks can share a cell column, so alternate shades
    for brick in &view.bricks {
        let color = if (brick.row + brick.col) % 2 == 0 {
            brick.color
        } else {
            shade(brick.color, 0.7)
        };
        canvas.fill(&viewport, &brick.rect, '█', color);
    }
    canvas.fill(&viewport, &view.paddle, '▀', colors::PADDLE);
    canvas.fill(&viewport, &view.ball, '●', colors::BALL);

    let hud = match fps {
        Some(fps) => format!("{}  FPS: {}", view.hud, fps),
        None => view.hud.clone(),
    };
    canvas.text(0, 0, &hud, colors::FOREGROUND);
    let hint_len = HINT.chars().count() as u16;
    if hud.chars().count() as u16 + 2 + hint_len <= viewport.cols {
        canvas.text(viewport.cols - hint_len, 0, HINT, colors::FOREGROUND);
    }

    if let Some(message) = view.overlay {
        let len = message.chars().count() as u16;
        let col = viewport.cols.saturating_sub(len) / 2;
        let row = 1 + viewport.field_rows() / 2;
        canvas.text(col, row, message, colors::FOREGROUND);
    }

    canvas
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb[0],
        g: rgb[1],
        b: rgb[2],
    }
}

/// Writes canvases to a terminal
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Draw a full frame. Only color changes are emitted between cells.
    pub fn draw(&mut self, canvas: &Canvas) -> std::io::Result<()> {
        queue!(self.out, SetBackgroundColor(to_color(colors::BACKGROUND)))?;
        for row in 0..canvas.rows {
            queue!(self.out, MoveTo(0, row))?;
            let mut current: Option<Rgb> = None;
            let mut run = String::with_capacity(canvas.cols as usize);
            for col in 0..canvas.cols {
                let Some(cell) = canvas.get(col, row) else {
                    continue;
                };
                if current != Some(cell.fg) {
                    if !run.is_empty() {
                        queue!(self.out, Print(&run))?;
                        run.clear();
                    }
                    queue!(self.out, SetForegroundColor(to_color(cell.fg)))?;
                    current = Some(cell.fg);
                }
                run.push(cell.ch);
            }
            if !run.is_empty() {
                queue!(self.out, Print(&run))?;
            }
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

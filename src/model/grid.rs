//! Grid model - the puzzle layout and crossword clue numbering
//!
//! A puzzle file is plain text: one row per line, a space means "no cell",
//! any other character is an active cell. Short lines are padded with blank
//! cells to the longest line. After parsing, every active cell knows which
//! of its four neighbors are active and whether it starts an across or a
//! down run, which is what assigns it a clue number.

use std::path::Path;

/// One grid position.
///
/// `num` is the crossword clue number (0 = unnumbered). The four flags say
/// whether the neighbor in that direction exists and is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub num: u32,
    pub is_l: bool,
    pub is_r: bool,
    pub is_u: bool,
    pub is_d: bool,
}

impl Cell {
    fn blank() -> Self {
        Self {
            ch: ' ',
            num: 0,
            is_l: false,
            is_r: false,
            is_u: false,
            is_d: false,
        }
    }

    /// A cell is active iff its character is not the blank marker.
    pub fn is_active(&self) -> bool {
        self.ch != ' '
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

/// A rectangular crossword grid, immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Load a grid from a puzzle file.
    ///
    /// Open/read failure surfaces the io::Error; no partial grid is produced.
    pub fn load(path: &Path) -> std::io::Result<Grid> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_text(&content))
    }

    /// Parse a grid from puzzle text. Pure and infallible; empty input
    /// yields a 0x0 grid.
    ///
    /// Each line is one row. A trailing partial line without a terminating
    /// newline is still a row; a terminating newline on the last line does
    /// not add an empty row.
    pub fn from_text(text: &str) -> Grid {
        let lines: Vec<&str> = text.lines().collect();

        let rows = lines.len();
        let cols = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        let mut cells = vec![Cell::blank(); rows * cols];

        for (r, line) in lines.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                cells[r * cols + c].ch = ch;
            }
        }

        let mut grid = Grid { rows, cols, cells };
        grid.annotate();
        grid
    }

    /// Compute adjacency flags and clue numbers for every active cell.
    ///
    /// Numbering follows standard crossword convention: a cell is numbered
    /// iff it starts an across run (no active cell to its left, one to its
    /// right) or a down run (none above, one below), scanned in row-major
    /// order with the counter starting at 1. The across check wins, so a
    /// cell starting both runs gets a single number. An isolated cell gets
    /// no number.
    fn annotate(&mut self) {
        let mut num = 1u32;

        for r in 0..self.rows {
            for c in 0..self.cols {
                if !self.cells[r * self.cols + c].is_active() {
                    continue;
                }

                let is_l = c > 0 && self.active_at(r, c - 1);
                let is_r = c + 1 < self.cols && self.active_at(r, c + 1);
                let is_u = r > 0 && self.active_at(r - 1, c);
                let is_d = r + 1 < self.rows && self.active_at(r + 1, c);

                let cell = &mut self.cells[r * self.cols + c];
                cell.is_l = is_l;
                cell.is_r = is_r;
                cell.is_u = is_u;
                cell.is_d = is_d;

                if (!is_l && is_r) || (!is_u && is_d) {
                    cell.num = num;
                    num += 1;
                }
            }
        }
    }

    fn active_at(&self, r: usize, c: usize) -> bool {
        self.cells[r * self.cols + c].is_active()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Cell at (row, col). Panics if out of bounds.
    pub fn cell(&self, r: usize, c: usize) -> &Cell {
        &self.cells[r * self.cols + c]
    }

    pub fn get(&self, r: usize, c: usize) -> Option<&Cell> {
        if r < self.rows && c < self.cols {
            Some(&self.cells[r * self.cols + c])
        } else {
            None
        }
    }

    /// Iterate all cells with their (row, col) position in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i / self.cols.max(1), i % self.cols.max(1), cell))
    }

    /// Number of active cells.
    pub fn active_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_active()).count()
    }

    /// Highest assigned clue number (0 for a grid with no numbered cells).
    pub fn max_clue(&self) -> u32 {
        self.cells.iter().map(|c| c.num).max().unwrap_or(0)
    }
}

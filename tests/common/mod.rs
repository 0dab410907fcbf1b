//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::path::PathBuf;

use gridclue::model::{AppModel, Grid};
use gridclue::theme::Theme;

/// Create a test model around a puzzle given as text
pub fn test_model(text: &str) -> AppModel {
    AppModel::new(
        Grid::from_text(text),
        PathBuf::from("/puzzles/daily.txt"),
        Theme::default(),
        800,
        800,
    )
}

/// Clue numbers in row-major order, zero for unnumbered cells
pub fn numbers(grid: &Grid) -> Vec<u32> {
    grid.iter().map(|(_, _, cell)| cell.num).collect()
}

/// The (row, col, number) triples of every numbered cell, row-major
pub fn numbered_cells(grid: &Grid) -> Vec<(usize, usize, u32)> {
    grid.iter()
        .filter(|(_, _, cell)| cell.num > 0)
        .map(|(r, c, cell)| (r, c, cell.num))
        .collect()
}

//! Application model - the complete state of the viewer
//!
//! One `AppModel` is built at startup and passed explicitly to whoever
//! needs it; there is no ambient global state.

pub mod grid;

use std::path::PathBuf;

use crate::theme::Theme;
pub use grid::{Cell, Grid};

/// Top-level application state.
#[derive(Debug)]
pub struct AppModel {
    /// The loaded puzzle. Immutable; reload swaps in a new grid wholesale.
    pub grid: Grid,
    /// Where the grid was loaded from, used for reload and the export path.
    pub puzzle_path: PathBuf,
    /// Active color theme.
    pub theme: Theme,
    /// Current window size in physical pixels.
    pub window_size: (u32, u32),
    /// Transient status line, surfaced in the window title.
    pub status: Option<String>,
}

impl AppModel {
    pub fn new(grid: Grid, puzzle_path: PathBuf, theme: Theme, width: u32, height: u32) -> Self {
        Self {
            grid,
            puzzle_path,
            theme,
            window_size: (width, height),
            status: None,
        }
    }

    /// Default SVG export destination: `crossword.svg` next to the puzzle.
    pub fn default_export_path(&self) -> PathBuf {
        self.puzzle_path.with_file_name("crossword.svg")
    }

    /// Window title: puzzle name, grid shape and any status message.
    pub fn window_title(&self) -> String {
        let name = self
            .puzzle_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "crossword".to_string());

        let base = if self.grid.is_empty() {
            format!("{} - gridclue", name)
        } else {
            format!(
                "{} ({}x{}) - gridclue",
                name,
                self.grid.rows(),
                self.grid.cols()
            )
        };

        match &self.status {
            Some(status) => format!("{} - {}", base, status),
            None => base,
        }
    }
}

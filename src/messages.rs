//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use std::path::PathBuf;

use crate::model::Grid;

/// Application-level messages
#[derive(Debug)]
pub enum AppMsg {
    /// Window was resized to (width, height) physical pixels
    Resize(u32, u32),
    /// Re-read the puzzle file from disk (R key)
    ReloadPuzzle,
    /// Async puzzle load finished
    PuzzleLoaded {
        path: PathBuf,
        result: Result<Grid, String>,
    },
    /// Export the current grid to SVG (P/E key)
    ExportSvg,
    /// Async SVG write finished
    ExportCompleted(Result<PathBuf, String>),
    /// Quit the application
    Quit,
}

/// Top-level message type
#[derive(Debug)]
pub enum Msg {
    App(AppMsg),
}

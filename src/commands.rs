//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.
//! The update function stays pure; the app shell executes these, running
//! file IO on worker threads and feeding results back as messages.

use std::path::PathBuf;

/// Commands returned by update functions
#[derive(Debug, Clone)]
pub enum Cmd {
    /// Request a full redraw of the window
    Redraw,
    /// Load the puzzle file asynchronously; completion arrives as
    /// `AppMsg::PuzzleLoaded`
    LoadPuzzle { path: PathBuf },
    /// Write an already-rendered SVG document asynchronously; completion
    /// arrives as `AppMsg::ExportCompleted`
    WriteSvg { path: PathBuf, document: String },
    /// Request application exit
    Quit,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::Redraw => true,
            Cmd::LoadPuzzle { .. } => false,
            Cmd::WriteSvg { .. } => false,
            Cmd::Quit => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// Check if this command (or any batched command) requests exit
    pub fn wants_exit(&self) -> bool {
        match self {
            Cmd::Quit => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.wants_exit()),
            _ => false,
        }
    }
}

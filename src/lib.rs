//! gridclue - crossword grid viewer
//!
//! This crate provides the grid model, layout math, SVG export and the
//! Elm-style update loop behind the gridclue binary.

pub mod cli;
pub mod commands;
pub mod config_paths;
pub mod font;
pub mod layout;
pub mod messages;
pub mod model;
pub mod svg;
pub mod theme;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use messages::Msg;
pub use model::{AppModel, Grid};
pub use theme::Theme;

//! Command-line argument parsing for the viewer
//!
//! Supports:
//! - Opening a puzzle file (defaults to crossword.txt in the working dir)
//! - Theme selection
//! - Font override
//! - Headless SVG export

use clap::Parser;
use std::path::PathBuf;

/// Default puzzle file, looked up in the working directory.
pub const DEFAULT_PUZZLE: &str = "crossword.txt";

/// A crossword grid viewer
#[derive(Parser, Debug)]
#[command(name = "gridclue", version, about = "A crossword grid viewer")]
pub struct CliArgs {
    /// Puzzle layout file to open
    #[arg(value_name = "PUZZLE")]
    pub puzzle: Option<PathBuf>,

    /// Theme id (builtin or from the user themes directory)
    #[arg(long, value_name = "ID", default_value = "classic")]
    pub theme: String,

    /// Font file to use instead of the detected system font
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Write the grid as SVG to PATH and exit without opening a window
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Puzzle file to load
    pub puzzle_path: PathBuf,
    /// Whether the user named the puzzle explicitly. A missing explicit
    /// file is a startup error; a missing default file is just a warning.
    pub puzzle_explicit: bool,
    /// Theme id to load
    pub theme_id: String,
    /// Optional font override
    pub font_path: Option<PathBuf>,
    /// Headless export destination, if any
    pub export_path: Option<PathBuf>,
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> StartupConfig {
        let puzzle_explicit = self.puzzle.is_some();
        let puzzle_path = self.puzzle.unwrap_or_else(|| PathBuf::from(DEFAULT_PUZZLE));

        StartupConfig {
            puzzle_path,
            puzzle_explicit,
            theme_id: self.theme,
            font_path: self.font,
            export_path: self.export,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(puzzle: Option<&str>) -> CliArgs {
        CliArgs {
            puzzle: puzzle.map(PathBuf::from),
            theme: "classic".to_string(),
            font: None,
            export: None,
        }
    }

    #[test]
    fn test_default_puzzle_path() {
        let config = args(None).into_config();
        assert_eq!(config.puzzle_path, PathBuf::from("crossword.txt"));
        assert!(!config.puzzle_explicit);
    }

    #[test]
    fn test_explicit_puzzle_path() {
        let config = args(Some("puzzles/sunday.txt")).into_config();
        assert_eq!(config.puzzle_path, PathBuf::from("puzzles/sunday.txt"));
        assert!(config.puzzle_explicit);
    }

    #[test]
    fn test_export_flag_carries_through() {
        let mut cli = args(None);
        cli.export = Some(PathBuf::from("out.svg"));
        assert_eq!(cli.into_config().export_path, Some(PathBuf::from("out.svg")));

        assert!(args(None).into_config().export_path.is_none());
    }

    #[test]
    fn test_parses_from_argv() {
        let cli = CliArgs::parse_from([
            "gridclue",
            "daily.txt",
            "--theme",
            "night",
            "--export",
            "daily.svg",
        ]);
        let config = cli.into_config();
        assert_eq!(config.puzzle_path, PathBuf::from("daily.txt"));
        assert_eq!(config.theme_id, "night");
        assert_eq!(config.export_path, Some(PathBuf::from("daily.svg")));
    }
}

//! Update functions for the Elm-style architecture
//!
//! `update` is the only place model state changes. It is pure over the
//! model: file IO is requested via `Cmd` and performed by the app shell.

use tracing::{info, warn};

use crate::commands::Cmd;
use crate::messages::{AppMsg, Msg};
use crate::model::AppModel;
use crate::svg;

/// Apply a message to the model, returning any side-effect command.
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::App(msg) => update_app(model, msg),
    }
}

fn update_app(model: &mut AppModel, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::Resize(width, height) => {
            model.window_size = (width, height);
            Some(Cmd::Redraw)
        }

        AppMsg::ReloadPuzzle => {
            info!("Reloading puzzle from {}", model.puzzle_path.display());
            model.status = Some("reloading...".to_string());
            // Redraw first so the status is visible while the load runs
            Some(Cmd::Batch(vec![
                Cmd::Redraw,
                Cmd::LoadPuzzle {
                    path: model.puzzle_path.clone(),
                },
            ]))
        }

        AppMsg::PuzzleLoaded { path, result } => match result {
            Ok(grid) => {
                info!(
                    "Loaded {} ({}x{}, {} cells)",
                    path.display(),
                    grid.rows(),
                    grid.cols(),
                    grid.active_count()
                );
                model.grid = grid;
                model.puzzle_path = path;
                model.status = None;
                Some(Cmd::Redraw)
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
                model.status = Some(format!("load failed: {}", e));
                Some(Cmd::Redraw)
            }
        },

        AppMsg::ExportSvg => {
            let path = model.default_export_path();
            let document = svg::render_svg(&model.grid, &model.theme);
            info!("Exporting SVG to {}", path.display());
            model.status = Some("exporting...".to_string());
            Some(Cmd::Batch(vec![
                Cmd::Redraw,
                Cmd::WriteSvg { path, document },
            ]))
        }

        AppMsg::ExportCompleted(result) => {
            match result {
                Ok(path) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| path.display().to_string());
                    model.status = Some(format!("exported {}", name));
                }
                Err(e) => {
                    warn!("SVG export failed: {}", e);
                    model.status = Some(format!("export failed: {}", e));
                }
            }
            Some(Cmd::Redraw)
        }

        AppMsg::Quit => Some(Cmd::Quit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Grid;
    use crate::theme::Theme;
    use std::path::PathBuf;

    fn test_model() -> AppModel {
        AppModel::new(
            Grid::from_text("AB\n C"),
            PathBuf::from("/puzzles/daily.txt"),
            Theme::default(),
            800,
            600,
        )
    }

    #[test]
    fn test_resize_updates_model_and_redraws() {
        let mut model = test_model();
        let cmd = update(&mut model, Msg::App(AppMsg::Resize(1024, 768)));
        assert_eq!(model.window_size, (1024, 768));
        assert!(matches!(cmd, Some(Cmd::Redraw)));
    }

    #[test]
    fn test_reload_requests_load_of_current_path() {
        let mut model = test_model();
        let cmd = update(&mut model, Msg::App(AppMsg::ReloadPuzzle));
        match cmd {
            Some(Cmd::Batch(cmds)) => match &cmds[..] {
                [Cmd::Redraw, Cmd::LoadPuzzle { path }] => {
                    assert_eq!(path, &PathBuf::from("/puzzles/daily.txt"))
                }
                other => panic!("expected redraw + load, got {:?}", other),
            },
            other => panic!("expected a batch, got {:?}", other),
        }
        assert_eq!(model.status.as_deref(), Some("reloading..."));
    }

    #[test]
    fn test_puzzle_loaded_swaps_grid() {
        let mut model = test_model();
        let cmd = update(
            &mut model,
            Msg::App(AppMsg::PuzzleLoaded {
                path: PathBuf::from("/puzzles/other.txt"),
                result: Ok(Grid::from_text("ABC")),
            }),
        );
        assert_eq!(model.grid.cols(), 3);
        assert_eq!(model.puzzle_path, PathBuf::from("/puzzles/other.txt"));
        assert!(model.status.is_none());
        assert!(matches!(cmd, Some(Cmd::Redraw)));
    }

    #[test]
    fn test_failed_load_keeps_old_grid() {
        let mut model = test_model();
        let path = model.puzzle_path.clone();
        update(
            &mut model,
            Msg::App(AppMsg::PuzzleLoaded {
                path,
                result: Err("permission denied".to_string()),
            }),
        );
        // Old grid untouched, failure surfaced in status.
        assert_eq!(model.grid.rows(), 2);
        assert!(model.status.as_deref().unwrap().contains("load failed"));
    }

    #[test]
    fn test_export_builds_document_and_targets_default_path() {
        let mut model = test_model();
        let cmd = update(&mut model, Msg::App(AppMsg::ExportSvg));
        match cmd {
            Some(Cmd::Batch(cmds)) => match &cmds[..] {
                [Cmd::Redraw, Cmd::WriteSvg { path, document }] => {
                    assert_eq!(path, &PathBuf::from("/puzzles/crossword.svg"));
                    assert!(document.contains("<svg"));
                }
                other => panic!("expected redraw + write, got {:?}", other),
            },
            other => panic!("expected a batch, got {:?}", other),
        }
    }

    #[test]
    fn test_slow_io_requests_repaint_the_status_first() {
        // Both IO-bound messages batch a redraw in front of the request,
        // so the status line shows while the worker runs.
        let mut model = test_model();
        let cmd = update(&mut model, Msg::App(AppMsg::ReloadPuzzle)).unwrap();
        assert!(cmd.needs_redraw());
        let cmd = update(&mut model, Msg::App(AppMsg::ExportSvg)).unwrap();
        assert!(cmd.needs_redraw());
    }

    #[test]
    fn test_export_completed_sets_status() {
        let mut model = test_model();
        update(
            &mut model,
            Msg::App(AppMsg::ExportCompleted(Ok(PathBuf::from(
                "/puzzles/crossword.svg",
            )))),
        );
        assert_eq!(model.status.as_deref(), Some("exported crossword.svg"));
    }

    #[test]
    fn test_export_failure_sets_status() {
        let mut model = test_model();
        update(
            &mut model,
            Msg::App(AppMsg::ExportCompleted(Err("disk full".to_string()))),
        );
        assert!(model.status.as_deref().unwrap().contains("export failed"));
    }

    #[test]
    fn test_quit_message_requests_exit() {
        let mut model = test_model();
        let cmd = update(&mut model, Msg::App(AppMsg::Quit));
        assert!(cmd.map(|c| c.wants_exit()).unwrap_or(false));
    }
}

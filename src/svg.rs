//! SVG export - renders the grid into a vector image document
//!
//! The exported document mirrors what the window renderer paints: filled
//! cells, centered characters, clue numbers at the top-left, and thick
//! run-boundary edges. Output uses a fixed 1024px raster size over a fixed
//! 192-unit logical viewBox.

use std::fmt::Write as _;
use std::path::Path;

use crate::layout::{GridLayout, EDGE_WIDTH, NUMBER_INSET};
use crate::model::Grid;
use crate::theme::Theme;

/// Raster size of the exported image, in pixels.
pub const EXPORT_PIXEL_SIZE: u32 = 1024;

/// Logical coordinate space the grid is laid out in.
pub const VIEWBOX_SIZE: f32 = 192.0;

/// Approximate baseline offset from a text's vertical center, as a
/// fraction of the font size.
const BASELINE_SHIFT: f32 = 0.35;

/// Build the SVG document for a grid. Pure; does not touch the filesystem.
pub fn render_svg(grid: &Grid, theme: &Theme) -> String {
    let layout = GridLayout::compute(VIEWBOX_SIZE, VIEWBOX_SIZE, grid);
    let colors = &theme.colors;

    let mut doc = String::new();
    let _ = writeln!(
        doc,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}" height="{0}" viewBox="0 0 {1} {1}">"#,
        EXPORT_PIXEL_SIZE, VIEWBOX_SIZE
    );
    let _ = writeln!(doc, "  <title>Crossword</title>");
    let _ = writeln!(
        doc,
        r#"  <rect width="{0}" height="{0}" fill="{1}"/>"#,
        VIEWBOX_SIZE,
        colors.background.to_hex()
    );

    if !layout.is_degenerate() {
        render_cells(&mut doc, grid, &layout, theme);
        render_edges(&mut doc, grid, &layout, theme);
    }

    doc.push_str("</svg>\n");
    doc
}

/// Write an already-rendered document to disk.
pub fn write_svg(path: &Path, document: &str) -> std::io::Result<()> {
    std::fs::write(path, document)
}

fn render_cells(doc: &mut String, grid: &Grid, layout: &GridLayout, theme: &Theme) {
    let colors = &theme.colors;
    let cs = layout.cell;

    for (r, c, cell) in grid.iter() {
        if !cell.is_active() {
            continue;
        }

        let (x, y) = layout.cell_origin(r, c);

        let _ = writeln!(
            doc,
            r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            x,
            y,
            cs,
            cs,
            colors.cell_fill.to_hex()
        );

        let char_size = layout.char_size();
        let _ = writeln!(
            doc,
            r#"  <text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{:.2}" text-anchor="middle" fill="{}">{}</text>"#,
            x + cs / 2.0,
            y + cs / 2.0 + char_size * BASELINE_SHIFT,
            char_size,
            colors.text.to_hex(),
            escape_char(cell.ch)
        );

        if cell.num > 0 {
            let num_size = layout.number_size();
            let _ = writeln!(
                doc,
                r#"  <text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{:.2}" fill="{}">{}</text>"#,
                x + NUMBER_INSET,
                y + NUMBER_INSET + num_size,
                num_size,
                colors.number.to_hex(),
                cell.num
            );
        }
    }
}

/// Edge rules, matching the window renderer: draw the left edge only at the
/// start of an across run and the top edge only at the start of a down run;
/// right and bottom edges always, so interior boundaries come from the
/// neighbor's trailing edge.
fn render_edges(doc: &mut String, grid: &Grid, layout: &GridLayout, theme: &Theme) {
    let edge = theme.colors.edge.to_hex();
    let cs = layout.cell;

    let mut line = |x1: f32, y1: f32, x2: f32, y2: f32, doc: &mut String| {
        let _ = writeln!(
            doc,
            r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{}"/>"#,
            x1, y1, x2, y2, edge, EDGE_WIDTH
        );
    };

    for (r, c, cell) in grid.iter() {
        if !cell.is_active() {
            continue;
        }

        let (x, y) = layout.cell_origin(r, c);

        if !cell.is_l {
            line(x, y, x, y + cs, doc);
        }
        line(x + cs, y, x + cs, y + cs, doc);

        if !cell.is_u {
            line(x, y, x + cs, y, doc);
        }
        line(x, y + cs, x + cs, y + cs, doc);
    }
}

fn escape_char(ch: char) -> String {
    match ch {
        '&' => "&amp;".to_string(),
        '<' => "&lt;".to_string(),
        '>' => "&gt;".to_string(),
        _ => ch.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_for(text: &str) -> String {
        render_svg(&Grid::from_text(text), &Theme::default())
    }

    #[test]
    fn test_document_header() {
        let doc = doc_for("AB\n C");
        assert!(doc.starts_with("<svg"));
        assert!(doc.contains(r#"width="1024""#));
        assert!(doc.contains(r#"viewBox="0 0 192 192""#));
        assert!(doc.contains("<title>Crossword</title>"));
        assert!(doc.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_one_rect_per_active_cell_plus_background() {
        let doc = doc_for("AB\n C");
        let rects = doc.matches("<rect").count();
        assert_eq!(rects, 3 + 1);
    }

    #[test]
    fn test_numbered_cells_emit_number_text() {
        // "AB\n C": A is clue 1 (across start), B is clue 2 (down start).
        let doc = doc_for("AB\n C");
        let texts = doc.matches("<text").count();
        // 3 characters + 2 clue numbers
        assert_eq!(texts, 5);
        assert!(doc.contains(">1</text>"));
        assert!(doc.contains(">2</text>"));
    }

    #[test]
    fn test_edge_count_follows_run_boundaries() {
        // "AB": A draws left+top+right+bottom (4); B skips its left edge (3).
        let doc = doc_for("AB");
        assert_eq!(doc.matches("<line").count(), 7);
    }

    #[test]
    fn test_empty_grid_renders_background_only() {
        let doc = doc_for("");
        assert_eq!(doc.matches("<rect").count(), 1);
        assert_eq!(doc.matches("<text").count(), 0);
        assert_eq!(doc.matches("<line").count(), 0);
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        let doc = doc_for("<&");
        assert!(doc.contains("&lt;"));
        assert!(doc.contains("&amp;"));
        assert!(!doc.contains("><</text>"));
    }

    #[test]
    fn test_write_svg_round_trips_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crossword.svg");
        let doc = doc_for("AB");
        write_svg(&path, &doc).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), doc);
    }

    #[test]
    fn test_theme_colors_flow_into_attributes() {
        let mut theme = Theme::default();
        theme.colors.cell_fill = crate::theme::Color::rgb(0x12, 0x34, 0x56);
        let doc = render_svg(&Grid::from_text("AB"), &theme);
        assert!(doc.contains(r##"fill="#123456""##));
    }
}

//! Cell geometry shared by the window renderer and the SVG exporter
//!
//! Everything here is pure math over an abstract coordinate space; the
//! window path feeds in pixels, the SVG path feeds in viewBox units.

use crate::model::Grid;

/// Fixed inset between the drawing surface edge and the grid.
pub const BORDER: f32 = 8.0;

/// Character glyph size as a fraction of the cell size.
pub const CHAR_SCALE: f32 = 0.65;

/// Clue-number glyph size as a fraction of the cell size.
pub const NUMBER_SCALE: f32 = 0.25;

/// Inset of the clue number from the cell's top-left corner.
pub const NUMBER_INSET: f32 = 2.0;

/// Stroke width of run-boundary edges, in layout units.
pub const EDGE_WIDTH: f32 = 3.0;

/// Computed placement of a grid on a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Top-left corner of cell (0, 0)
    pub origin_x: f32,
    pub origin_y: f32,
    /// Side length of one (square) cell
    pub cell: f32,
}

impl GridLayout {
    /// Fit `grid` onto a `width` x `height` surface with the fixed border
    /// inset. Cells are square: the limiting dimension wins.
    ///
    /// A degenerate grid (zero rows or columns) or a surface smaller than
    /// the border yields a zero cell size, which draws nothing.
    pub fn compute(width: f32, height: f32, grid: &Grid) -> GridLayout {
        if grid.is_empty() {
            return GridLayout {
                origin_x: BORDER,
                origin_y: BORDER,
                cell: 0.0,
            };
        }

        let cw = (width - 2.0 * BORDER) / grid.cols() as f32;
        let ch = (height - 2.0 * BORDER) / grid.rows() as f32;
        let cell = cw.min(ch).max(0.0);

        GridLayout {
            origin_x: BORDER,
            origin_y: BORDER,
            cell,
        }
    }

    /// Top-left corner of the cell at (row, col).
    pub fn cell_origin(&self, r: usize, c: usize) -> (f32, f32) {
        (
            self.origin_x + c as f32 * self.cell,
            self.origin_y + r as f32 * self.cell,
        )
    }

    /// Character glyph size for this cell size.
    pub fn char_size(&self) -> f32 {
        self.cell * CHAR_SCALE
    }

    /// Clue-number glyph size for this cell size.
    pub fn number_size(&self) -> f32 {
        self.cell * NUMBER_SCALE
    }

    /// True when there is nothing drawable.
    pub fn is_degenerate(&self) -> bool {
        self.cell <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_surface_square_grid() {
        let grid = Grid::from_text("AB\nCD");
        let layout = GridLayout::compute(116.0, 116.0, &grid);
        // (116 - 16) / 2 in both dimensions
        assert_eq!(layout.cell, 50.0);
        assert_eq!(layout.origin_x, BORDER);
        assert_eq!(layout.origin_y, BORDER);
    }

    #[test]
    fn test_limiting_dimension_wins() {
        let grid = Grid::from_text("AB\nCD");
        // Width would allow 92-unit cells, height only 42.
        let layout = GridLayout::compute(200.0, 100.0, &grid);
        assert_eq!(layout.cell, 42.0);
    }

    #[test]
    fn test_wide_grid_limited_by_width() {
        let grid = Grid::from_text("ABCD");
        let layout = GridLayout::compute(116.0, 116.0, &grid);
        assert_eq!(layout.cell, 25.0);
    }

    #[test]
    fn test_cell_origin_steps_by_cell_size() {
        let grid = Grid::from_text("AB\nCD");
        let layout = GridLayout::compute(116.0, 116.0, &grid);
        assert_eq!(layout.cell_origin(0, 0), (8.0, 8.0));
        assert_eq!(layout.cell_origin(1, 1), (58.0, 58.0));
    }

    #[test]
    fn test_empty_grid_is_degenerate() {
        let grid = Grid::from_text("");
        let layout = GridLayout::compute(800.0, 600.0, &grid);
        assert!(layout.is_degenerate());
    }

    #[test]
    fn test_tiny_surface_clamps_to_zero() {
        let grid = Grid::from_text("AB\nCD");
        let layout = GridLayout::compute(10.0, 10.0, &grid);
        assert!(layout.is_degenerate());
    }

    #[test]
    fn test_font_sizes_track_cell_size() {
        let grid = Grid::from_text("AB\nCD");
        let layout = GridLayout::compute(116.0, 116.0, &grid);
        assert_eq!(layout.char_size(), 50.0 * CHAR_SCALE);
        assert_eq!(layout.number_size(), 50.0 * NUMBER_SCALE);
    }
}

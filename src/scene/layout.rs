//! Building bounds and window grid for one surface size.

use crate::render::Rect;

pub const COLS: usize = 4;
pub const ROWS: usize = 6;
pub const CELL_COUNT: usize = COLS * ROWS;

/// Reference height the pixel constants below are tuned for.
const REFERENCE_HEIGHT: f64 = 900.0;
const MIN_BUILDING_WIDTH: f64 = 600.0;
const MAX_BUILDING_WIDTH: f64 = 1200.0;
const MARGIN: f64 = 30.0;
const PADDING: f64 = 15.0;

/// Geometry fixed between two layout events.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    /// Reference pixel in surface pixels.
    pub unit: f64,
    pub building: Rect,
    /// Window cells, row-major from the top-left.
    pub cells: Vec<Rect>,
}

impl Layout {
    pub fn compute(width: f64, height: f64) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let unit = height / REFERENCE_HEIGHT;

        let bw = (width * 0.45)
            .clamp(MIN_BUILDING_WIDTH * unit, MAX_BUILDING_WIDTH * unit)
            .min(width * 0.96);
        let bh = height * 0.65;
        let building = Rect::new((width - bw) / 2.0, height * 0.85 - bh, bw, bh);

        let margin = MARGIN * unit;
        let padding = PADDING * unit;
        let cw = (bw - margin * 2.0 - padding * (COLS - 1) as f64) / COLS as f64;
        let ch = (bh - margin * 2.0 - padding * (ROWS - 1) as f64) / ROWS as f64;

        let cells = (0..ROWS)
            .flat_map(|row| (0..COLS).map(move |col| (row, col)))
            .map(|(row, col)| {
                Rect::new(
                    building.x + margin + col as f64 * (cw + padding),
                    building.y + margin + row as f64 * (ch + padding),
                    cw.max(0.0),
                    ch.max(0.0),
                )
            })
            .collect();

        Layout { width, height, unit, building, cells }
    }
}

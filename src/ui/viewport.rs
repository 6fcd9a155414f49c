use crate::model::{Point, Size};
use ratatui::layout::Rect;

/// Smallest layout extent shown on the canvas.
pub const MIN_EXTENT: Size = Size::new(800.0, 600.0);

/// Maps the canvas cells to layout coordinates.
///
/// The visible layout spans `0..width` by `0..height`, large enough for
/// [`MIN_EXTENT`] and every element. Layout y grows downwards; the ratatui
/// canvas y grows upwards, so drawing flips it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub area: Rect,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(area: Rect, extent: Option<Size>) -> Self {
        let extent = extent.unwrap_or(MIN_EXTENT);
        Self {
            area,
            width: extent.width.max(MIN_EXTENT.width),
            height: extent.height.max(MIN_EXTENT.height),
        }
    }

    /// Layout point under the centre of a terminal cell, or `None` outside
    /// the canvas.
    #[must_use]
    pub fn to_layout(&self, column: u16, row: u16) -> Option<Point> {
        if self.area.width == 0 || self.area.height == 0 {
            return None;
        }
        let inside = (self.area.left()..self.area.right()).contains(&column)
            && (self.area.top()..self.area.bottom()).contains(&row);
        if !inside {
            return None;
        }

        let x = (f64::from(column - self.area.x) + 0.5) * self.width / f64::from(self.area.width);
        let y = (f64::from(row - self.area.y) + 0.5) * self.height / f64::from(self.area.height);
        Some(Point::new(x, y))
    }

    /// Canvas y of the bottom edge of a box at layout `y` with `height`.
    #[must_use]
    pub fn canvas_y(&self, y: f64, height: f64) -> f64 {
        self.height - y - height
    }
}

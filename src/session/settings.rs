use crate::model::{Point, Size, DEFAULT_WINDOW_NAME};

pub const DEFAULT_GRID_SIZE: f64 = 10.0;

/// Editor defaults, seeded from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSettings {
    pub window_name: String,
    pub snap_to_grid: bool,
    pub grid_size: f64,
    pub new_element_position: Point,
    pub new_element_size: Size,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            window_name: DEFAULT_WINDOW_NAME.to_string(),
            snap_to_grid: true,
            grid_size: DEFAULT_GRID_SIZE,
            new_element_position: Point::new(50.0, 50.0),
            new_element_size: Size::new(120.0, 80.0),
        }
    }
}

impl EditorSettings {
    /// Rounds `value` to the nearest grid line.
    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        (value / self.grid_size).round() * self.grid_size
    }

    /// Snaps both components when snapping is on.
    #[must_use]
    pub fn snap_point(&self, point: Point) -> Point {
        if self.snap_to_grid {
            Point::new(self.snap(point.x), self.snap(point.y))
        } else {
            point
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap() {
        let settings = EditorSettings::default();
        assert_eq!(settings.snap(14.9), 10.0);
        assert_eq!(settings.snap(15.0), 20.0);
        assert_eq!(settings.snap(-4.0), -0.0);
        assert_eq!(settings.snap(-6.0), -10.0);
    }

    #[test]
    fn test_snap_point_respects_toggle() {
        let mut settings = EditorSettings {
            grid_size: 25.0,
            ..EditorSettings::default()
        };
        assert_eq!(settings.snap_point(Point::new(30.0, 40.0)), Point::new(25.0, 50.0));

        settings.snap_to_grid = false;
        assert_eq!(settings.snap_point(Point::new(30.0, 40.0)), Point::new(30.0, 40.0));
    }
}

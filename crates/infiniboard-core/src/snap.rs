//! Grid settings and grid snapping.

use crate::constants::DEFAULT_GRID_SIZE;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Background grid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    /// Whether the grid is drawn.
    pub enabled: bool,
    /// Grid cell edge length in canvas units.
    pub size: f64,
    /// Round tool-driven coordinates to the grid.
    pub snap: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            size: DEFAULT_GRID_SIZE,
            snap: false,
        }
    }
}

/// Partial grid update; absent fields keep their value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettingsPatch {
    pub enabled: Option<bool>,
    pub size: Option<f64>,
    pub snap: Option<bool>,
}

impl GridSettings {
    pub fn apply(&mut self, patch: GridSettingsPatch) {
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(size) = patch.size.filter(|s| *s > 0.0) {
            self.size = size;
        }
        if let Some(snap) = patch.snap {
            self.snap = snap;
        }
    }

    /// Round `value` to the grid when snapping is on.
    pub fn snap_value(&self, value: f64) -> f64 {
        if self.snap {
            snap_value(value, self.size)
        } else {
            value
        }
    }

    /// Round both coordinates to the grid when snapping is on.
    pub fn snap_point(&self, point: Point) -> Point {
        if self.snap {
            snap_to_grid(point, self.size)
        } else {
            point
        }
    }
}

/// Round `value` to the nearest multiple of `grid_size`.
pub fn snap_value(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(snap_value(point.x, grid_size), snap_value(point.y, grid_size))
}

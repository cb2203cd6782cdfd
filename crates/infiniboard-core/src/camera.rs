//! Viewport (pan/zoom) transforms.

use crate::constants::{FIT_PADDING, MAX_ZOOM, MIN_ZOOM};
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Pan offset (screen pixels) and zoom factor of the canvas view.
///
/// Maps canvas space to screen space as `screen = canvas * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Partial viewport update; absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
}

impl ViewportPatch {
    pub fn pan(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            zoom: None,
        }
    }
}

/// Clamp a zoom level to the supported range.
pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

impl Viewport {
    pub fn new(x: f64, y: f64, zoom: f64) -> Self {
        Self { x, y, zoom }
    }

    /// Pan offset as a vector.
    pub fn pan(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Merge a partial update into this viewport.
    pub fn apply(&mut self, patch: ViewportPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(zoom) = patch.zoom {
            self.zoom = zoom;
        }
    }

    /// Canvas-to-screen transform (for rendering).
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan()) * Affine::scale(self.zoom)
    }

    /// Screen-to-canvas transform (for input handling).
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.pan())
    }

    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Multiply the zoom by `factor`, keeping `cursor` (screen space) fixed.
    ///
    /// `newPan = cursor - (cursor - oldPan) * (newZoom / oldZoom)`
    pub fn zoom_at(&mut self, cursor: Point, factor: f64) {
        self.zoom_to_at(cursor, self.zoom * factor);
    }

    /// Set the zoom to `level` (clamped), keeping `cursor` fixed on screen.
    pub fn zoom_to_at(&mut self, cursor: Point, level: f64) {
        let new_zoom = clamp_zoom(level);
        let ratio = new_zoom / self.zoom;
        self.x = cursor.x - (cursor.x - self.x) * ratio;
        self.y = cursor.y - (cursor.y - self.y) * ratio;
        self.zoom = new_zoom;
    }

    /// Reset pan and zoom to the identity view.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Frame `bounds` (canvas space) inside a viewport of `size` pixels.
    pub fn fit_to_bounds(&mut self, bounds: Rect, size: Size) {
        if bounds.width() <= f64::EPSILON && bounds.height() <= f64::EPSILON {
            // Single point: center it without changing zoom.
            let center = bounds.center();
            self.x = size.width / 2.0 - center.x * self.zoom;
            self.y = size.height / 2.0 - center.y * self.zoom;
            return;
        }

        let padded = Size::new(
            (size.width - FIT_PADDING * 2.0).max(1.0),
            (size.height - FIT_PADDING * 2.0).max(1.0),
        );
        let scale_x = padded.width / bounds.width().max(f64::EPSILON);
        let scale_y = padded.height / bounds.height().max(f64::EPSILON);
        self.zoom = clamp_zoom(scale_x.min(scale_y));

        let center = bounds.center();
        self.x = size.width / 2.0 - center.x * self.zoom;
        self.y = size.height / 2.0 - center.y * self.zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let vp = Viewport::default();
        assert_eq!(vp.pan(), Vec2::ZERO);
        assert!((vp.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_canvas_with_pan_and_zoom() {
        let vp = Viewport::new(50.0, 100.0, 2.0);
        let canvas = vp.screen_to_canvas(Point::new(150.0, 300.0));
        assert!((canvas.x - 50.0).abs() < 1e-10);
        assert!((canvas.y - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let vp = Viewport::new(30.0, -20.0, 1.5);
        let original = Point::new(123.0, 456.0);
        let back = vp.canvas_to_screen(vp.screen_to_canvas(original));
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_at_keeps_cursor_point_fixed() {
        let mut vp = Viewport::new(13.0, -7.0, 0.8);
        let cursor = Point::new(320.0, 240.0);
        let before = vp.screen_to_canvas(cursor);
        vp.zoom_at(cursor, 1.1);
        let after = vp.canvas_to_screen(before);
        assert!((after.x - cursor.x).abs() < 1e-9);
        assert!((after.y - cursor.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut vp = Viewport::default();
        vp.zoom_at(Point::ZERO, 0.001);
        assert!((vp.zoom - MIN_ZOOM).abs() < f64::EPSILON);
        vp.zoom_at(Point::ZERO, 1000.0);
        assert!((vp.zoom - MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_apply_patch() {
        let mut vp = Viewport::new(1.0, 2.0, 3.0);
        vp.apply(ViewportPatch::pan(10.0, 20.0));
        assert_eq!(vp, Viewport::new(10.0, 20.0, 3.0));
        vp.apply(ViewportPatch {
            zoom: Some(0.5),
            ..Default::default()
        });
        assert_eq!(vp, Viewport::new(10.0, 20.0, 0.5));
    }

    #[test]
    fn test_fit_to_bounds_centers_content() {
        let mut vp = Viewport::default();
        let size = Size::new(800.0, 600.0);
        vp.fit_to_bounds(Rect::new(0.0, 0.0, 100.0, 100.0), size);
        let center = vp.canvas_to_screen(Point::new(50.0, 50.0));
        assert!((center.x - 400.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
        assert!((vp.zoom - MAX_ZOOM).abs() < f64::EPSILON);
    }
}

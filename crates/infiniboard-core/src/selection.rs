//! Resize handles for the sole selected shape or image.

use crate::constants::{HANDLE_SIZE, MIN_RESIZE_EXTENT};
use crate::elements::{Element, ElementKind};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// One of the eight resize handles around a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::Top,
        ResizeHandle::TopRight,
        ResizeHandle::Right,
        ResizeHandle::BottomRight,
        ResizeHandle::Bottom,
        ResizeHandle::BottomLeft,
        ResizeHandle::Left,
    ];

    /// Handle position on a normalized box.
    pub fn position(self, bounds: Rect) -> Point {
        let c = bounds.center();
        match self {
            ResizeHandle::TopLeft => Point::new(bounds.x0, bounds.y0),
            ResizeHandle::Top => Point::new(c.x, bounds.y0),
            ResizeHandle::TopRight => Point::new(bounds.x1, bounds.y0),
            ResizeHandle::Right => Point::new(bounds.x1, c.y),
            ResizeHandle::BottomRight => Point::new(bounds.x1, bounds.y1),
            ResizeHandle::Bottom => Point::new(c.x, bounds.y1),
            ResizeHandle::BottomLeft => Point::new(bounds.x0, bounds.y1),
            ResizeHandle::Left => Point::new(bounds.x0, c.y),
        }
    }

    fn moves_left(self) -> bool {
        matches!(self, ResizeHandle::TopLeft | ResizeHandle::Left | ResizeHandle::BottomLeft)
    }

    fn moves_right(self) -> bool {
        matches!(self, ResizeHandle::TopRight | ResizeHandle::Right | ResizeHandle::BottomRight)
    }

    fn moves_top(self) -> bool {
        matches!(self, ResizeHandle::TopLeft | ResizeHandle::Top | ResizeHandle::TopRight)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, ResizeHandle::BottomLeft | ResizeHandle::Bottom | ResizeHandle::BottomRight)
    }
}

/// Square around a handle, in canvas units, at the given zoom.
pub fn handle_rect(handle: ResizeHandle, bounds: Rect, zoom: f64) -> Rect {
    let half = HANDLE_SIZE / zoom / 2.0;
    let p = handle.position(bounds);
    Rect::new(p.x - half, p.y - half, p.x + half, p.y + half)
}

/// Handle under `point` (canvas space), if any.
///
/// The hit area is twice the drawn handle so handles stay grabbable when
/// zoomed out.
pub fn hit_handle(bounds: Rect, point: Point, zoom: f64) -> Option<ResizeHandle> {
    let reach = HANDLE_SIZE / zoom;
    ResizeHandle::ALL.into_iter().find(|handle| {
        let p = handle.position(bounds);
        (point.x - p.x).abs() <= reach && (point.y - p.y).abs() <= reach
    })
}

/// Apply `delta` to `original` for the dragged handle.
///
/// Each axis keeps at least [`MIN_RESIZE_EXTENT`]; when the floor is hit
/// the dragged edge stops and the opposite edge stays where it was.
pub fn resize_rect(original: Rect, handle: ResizeHandle, delta: Vec2) -> Rect {
    let mut r = original.abs();
    if handle.moves_left() {
        r.x0 = (r.x0 + delta.x).min(r.x1 - MIN_RESIZE_EXTENT);
    }
    if handle.moves_right() {
        r.x1 = (r.x1 + delta.x).max(r.x0 + MIN_RESIZE_EXTENT);
    }
    if handle.moves_top() {
        r.y0 = (r.y0 + delta.y).min(r.y1 - MIN_RESIZE_EXTENT);
    }
    if handle.moves_bottom() {
        r.y1 = (r.y1 + delta.y).max(r.y0 + MIN_RESIZE_EXTENT);
    }
    r
}

/// Write a resized box back into a shape or image element.
///
/// Returns `false` for variants without resize handles.
pub fn apply_resize(element: &mut Element, rect: Rect) -> bool {
    if !element.is_resizable() {
        return false;
    }
    element.x = rect.x0;
    element.y = rect.y0;
    match &mut element.kind {
        ElementKind::Shape(s) => {
            s.width = rect.width();
            s.height = rect.height();
        }
        ElementKind::Image(img) => {
            img.width = rect.width();
            img.height = rect.height();
        }
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Image, Shape, ShapeType};

    const BOX: Rect = Rect::new(100.0, 100.0, 200.0, 150.0);

    #[test]
    fn test_bottom_right_grows_size_only() {
        let r = resize_rect(BOX, ResizeHandle::BottomRight, Vec2::new(20.0, 10.0));
        assert_eq!(r, Rect::new(100.0, 100.0, 220.0, 160.0));
    }

    #[test]
    fn test_top_left_moves_anchor() {
        let r = resize_rect(BOX, ResizeHandle::TopLeft, Vec2::new(-10.0, 20.0));
        assert_eq!(r, Rect::new(90.0, 120.0, 200.0, 150.0));
    }

    #[test]
    fn test_edge_handle_affects_one_axis() {
        let r = resize_rect(BOX, ResizeHandle::Top, Vec2::new(50.0, -30.0));
        assert_eq!(r, Rect::new(100.0, 70.0, 200.0, 150.0));
        let r = resize_rect(BOX, ResizeHandle::Right, Vec2::new(15.0, 99.0));
        assert_eq!(r, Rect::new(100.0, 100.0, 215.0, 150.0));
    }

    #[test]
    fn test_min_extent_keeps_far_edge() {
        let r = resize_rect(BOX, ResizeHandle::Left, Vec2::new(500.0, 0.0));
        assert!((r.x1 - 200.0).abs() < f64::EPSILON);
        assert!((r.width() - MIN_RESIZE_EXTENT).abs() < f64::EPSILON);

        let r = resize_rect(BOX, ResizeHandle::BottomRight, Vec2::new(-500.0, -500.0));
        assert_eq!(r, Rect::new(100.0, 100.0, 110.0, 110.0));
    }

    #[test]
    fn test_hit_handle_scales_with_zoom() {
        let near = Point::new(203.0, 153.0);
        assert_eq!(hit_handle(BOX, near, 1.0), Some(ResizeHandle::BottomRight));
        assert_eq!(hit_handle(BOX, Point::new(212.0, 150.0), 1.0), None);
        assert_eq!(hit_handle(BOX, Point::new(212.0, 150.0), 0.5), Some(ResizeHandle::BottomRight));
        assert_eq!(hit_handle(BOX, Point::new(150.0, 150.0), 1.0), Some(ResizeHandle::Bottom));
    }

    #[test]
    fn test_apply_resize_variants() {
        let mut shape = Element::new(Point::ZERO, "#000", 2.0, ElementKind::Shape(Shape::new(ShapeType::Ellipse, 1.0, 1.0)));
        assert!(apply_resize(&mut shape, BOX));
        assert_eq!(shape.position(), Point::new(100.0, 100.0));
        assert!((shape.as_shape().unwrap().width - 100.0).abs() < f64::EPSILON);

        let mut image = Element::new(Point::ZERO, "#000", 2.0, ElementKind::Image(Image::new("data:,", 1.0, 1.0)));
        assert!(apply_resize(&mut image, BOX));

        let mut line = Element::new(Point::ZERO, "#000", 2.0, ElementKind::Shape(Shape::new(ShapeType::Line, 1.0, 1.0)));
        assert!(!apply_resize(&mut line, BOX));
    }
}

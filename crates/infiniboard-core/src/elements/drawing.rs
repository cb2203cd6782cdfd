//! Freehand drawing (pen and eraser strokes).

use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A freehand stroke.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    /// Points in insertion order.
    pub points: Vec<Point>,
    /// Eraser strokes remove pixels of elements painted before them.
    #[serde(default)]
    pub is_eraser: bool,
}

impl Drawing {
    pub fn new(points: Vec<Point>, is_eraser: bool) -> Self {
        Self { points, is_eraser }
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A stroke needs at least two points to be painted.
    pub fn is_renderable(&self) -> bool {
        self.points.len() >= 2
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }

    /// Min/max box over the points, or `None` when there are no points.
    pub fn point_bounds(&self) -> Option<Rect> {
        let first = *self.points.first()?;
        let mut bounds = Rect::from_points(first, first);
        for point in &self.points[1..] {
            bounds = bounds.union_pt(*point);
        }
        Some(bounds)
    }

    /// Polyline through the points.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut points = self.points.iter();
        if let Some(first) = points.next() {
            path.move_to(*first);
            for point in points {
                path.line_to(*point);
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_bounds() {
        let drawing = Drawing::new(
            vec![Point::new(5.0, 10.0), Point::new(-3.0, 4.0), Point::new(8.0, 2.0)],
            false,
        );
        let bounds = drawing.point_bounds().unwrap();
        assert_eq!(bounds, Rect::new(-3.0, 2.0, 8.0, 10.0));
    }

    #[test]
    fn test_empty_has_no_point_bounds() {
        assert!(Drawing::default().point_bounds().is_none());
    }

    #[test]
    fn test_renderable_needs_two_points() {
        let mut drawing = Drawing::new(vec![Point::ZERO], false);
        assert!(!drawing.is_renderable());
        drawing.add_point(Point::new(1.0, 1.0));
        assert!(drawing.is_renderable());
        assert_eq!(drawing.len(), 2);
    }
}
